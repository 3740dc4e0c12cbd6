//! The calls the client makes to the expenses REST API.

use std::future::Future;

use crate::expense::{Expense, ExpenseForm, ExpenseId};

/// A request the client wants to make to the API.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    /// Fetch every expense.
    ListExpenses,
    /// Fetch a single expense.
    GetExpense(ExpenseId),
    /// Create an expense from the form.
    CreateExpense(ExpenseForm),
    /// Replace the fields of an expense with the form.
    UpdateExpense(ExpenseId, ExpenseForm),
    /// Delete an expense.
    DeleteExpense(ExpenseId),
}

/// A successful response from the API.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiReply {
    /// The list of every expense.
    Expenses(Vec<Expense>),
    /// A single fetched, created or updated expense.
    Expense(Expense),
    /// The expense was deleted.
    Deleted,
}

/// The reasons a call to the API can fail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiFailure {
    /// The server responded with a status code other than 2xx.
    ///
    /// `message` holds the `error` field of the response body, if there was one.
    #[error("the server responded with status {status}")]
    Rejected {
        /// The HTTP status code.
        status: u16,
        /// The error message sent by the server.
        message: Option<String>,
    },

    /// The request could not be sent or the response could not be read.
    #[error("the request could not be completed: {0}")]
    Transport(String),

    /// The server responded with a body the client did not expect.
    #[error("the server sent an unexpected response: {0}")]
    InvalidResponse(String),
}

impl ApiFailure {
    /// The message to show the user.
    ///
    /// Uses the server's error message if there is one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiFailure::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            _ => fallback.to_owned(),
        }
    }
}

/// The operations the client needs from the expenses REST API.
pub trait ExpenseApi {
    /// `GET /api/expenses`
    fn list_expenses(&self) -> impl Future<Output = Result<Vec<Expense>, ApiFailure>> + Send;

    /// `GET /api/expenses/{expense_id}`
    fn get_expense(&self, id: &str)
    -> impl Future<Output = Result<Expense, ApiFailure>> + Send;

    /// `POST /api/expenses`
    fn create_expense(
        &self,
        form: &ExpenseForm,
    ) -> impl Future<Output = Result<Expense, ApiFailure>> + Send;

    /// `PUT /api/expenses/{expense_id}`
    fn update_expense(
        &self,
        id: &str,
        form: &ExpenseForm,
    ) -> impl Future<Output = Result<Expense, ApiFailure>> + Send;

    /// `DELETE /api/expenses/{expense_id}`
    fn delete_expense(&self, id: &str) -> impl Future<Output = Result<(), ApiFailure>> + Send;
}

/// Make `call` with `api`.
pub async fn send<A: ExpenseApi>(api: &A, call: ApiCall) -> Result<ApiReply, ApiFailure> {
    match call {
        ApiCall::ListExpenses => api.list_expenses().await.map(ApiReply::Expenses),
        ApiCall::GetExpense(id) => api.get_expense(&id).await.map(ApiReply::Expense),
        ApiCall::CreateExpense(form) => api.create_expense(&form).await.map(ApiReply::Expense),
        ApiCall::UpdateExpense(id, form) => {
            api.update_expense(&id, &form).await.map(ApiReply::Expense)
        }
        ApiCall::DeleteExpense(id) => api.delete_expense(&id).await.map(|_| ApiReply::Deleted),
    }
}
