//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// The message sent to clients when an expense ID does not match any record.
pub const EXPENSE_NOT_FOUND: &str = "Expense not found";

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request body did not describe a valid expense.
    ///
    /// The string is intended to be shown to the client verbatim.
    #[error("{0}")]
    InvalidExpense(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the ID is
    /// correct and that the expense has not already been deleted.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the lock guarding the store.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The persistent store could not be reached when the server started.
    ///
    /// This error only occurs during startup and causes the server to fall
    /// back to in-memory storage.
    #[error("the database is unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The JSON body sent to clients when a request fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// A human readable description of what went wrong.
    pub error: String,
}

/// Create a response with a JSON [ErrorBody].
pub fn json_error(status_code: StatusCode, message: &str) -> Response {
    (
        status_code,
        Json(ErrorBody {
            error: message.to_owned(),
        }),
    )
        .into_response()
}

impl Error {
    /// Convert the error into an HTTP response with a JSON error body.
    ///
    /// `failure_message` is the generic message sent to the client for
    /// unexpected errors, e.g. "Failed to fetch expenses". The underlying error
    /// is logged and never sent to the client.
    pub fn into_json_response(self, failure_message: &str) -> Response {
        match self {
            Error::InvalidExpense(message) => json_error(StatusCode::BAD_REQUEST, &message),
            Error::NotFound => json_error(StatusCode::NOT_FOUND, EXPENSE_NOT_FOUND),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                json_error(StatusCode::INTERNAL_SERVER_ERROR, failure_message)
            }
        }
    }
}
