//! Route handlers for the expenses REST API.
//!
//! Every handler responds with JSON. Errors are sent as `{"error": "..."}`.

use axum::{
    Json,
    body::Bytes,
    extract::{FromRef, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    expense::{ExpenseFields, ExpenseForm, ExpenseStore},
    logging::has_json_content_type,
    storage::Storage,
};

/// The response header that tells clients which kind of store the server is using.
pub const STORAGE_MODE_HEADER: &str = "x-storage-mode";

/// The state needed to manage expenses.
#[derive(Debug, Clone)]
pub struct ExpenseState {
    /// The store chosen when the server started.
    pub storage: Storage,
}

impl FromRef<AppState> for ExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            storage: state.storage.clone(),
        }
    }
}

/// A route handler for listing every expense.
pub async fn list_expenses_endpoint(State(state): State<ExpenseState>) -> Response {
    match state.storage.list() {
        Ok(expenses) => (
            [(STORAGE_MODE_HEADER, state.storage.mode().as_str())],
            Json(expenses),
        )
            .into_response(),
        Err(error) => error.into_json_response("Failed to fetch expenses"),
    }
}

/// A route handler for getting a single expense, responds with 404 if it does not exist.
pub async fn get_expense_endpoint(
    State(state): State<ExpenseState>,
    Path(expense_id): Path<String>,
) -> Response {
    match state.storage.get(&expense_id) {
        Ok(expense) => Json(expense).into_response(),
        Err(error) => error.into_json_response("Failed to fetch expense"),
    }
}

/// A route handler for creating an expense, responds with 201 and the new expense.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let fields = match parse_body(&headers, &body) {
        Ok(fields) => fields,
        Err(error) => return error.into_json_response("Failed to create expense"),
    };

    match state.storage.create(fields) {
        Ok(expense) => {
            tracing::debug!("Created expense {}", expense.id);
            (StatusCode::CREATED, Json(expense)).into_response()
        }
        Err(error) => error.into_json_response("Failed to create expense"),
    }
}

/// A route handler for replacing the fields of an expense.
pub async fn update_expense_endpoint(
    State(state): State<ExpenseState>,
    Path(expense_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let fields = match parse_body(&headers, &body) {
        Ok(fields) => fields,
        Err(error) => return error.into_json_response("Failed to update expense"),
    };

    match state.storage.update(&expense_id, fields) {
        Ok(expense) => Json(expense).into_response(),
        Err(error) => error.into_json_response("Failed to update expense"),
    }
}

/// A route handler for deleting an expense, responds with 204 and no body.
pub async fn delete_expense_endpoint(
    State(state): State<ExpenseState>,
    Path(expense_id): Path<String>,
) -> Response {
    match state.storage.delete(&expense_id) {
        Ok(()) => {
            tracing::debug!("Deleted expense {expense_id}");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(error) => error.into_json_response("Failed to delete expense"),
    }
}

/// Parse and validate an expense form.
///
/// An empty body, or one that is not labelled as JSON, is treated as a form
/// with no fields.
fn parse_body(headers: &HeaderMap, body: &Bytes) -> Result<ExpenseFields, Error> {
    if body.is_empty() || !has_json_content_type(headers) {
        return ExpenseForm::default().validate();
    }

    let Json(form) = Json::<ExpenseForm>::from_bytes(body)
        .map_err(|rejection| Error::InvalidExpense(rejection.body_text()))?;

    form.validate()
}
