//! An [ExpenseApi] that sends requests through any HTTP [Service].
//!
//! With an axum [Router] the requests are handled in-process. Any other tower
//! service that speaks `Request<Body>`, such as an HTTP client connection
//! mapped to axum's body type, reaches a server over the network.

use std::fmt::Display;

use axum::{
    Router,
    body::{Body, Bytes},
    http::{Method, Request, Response, StatusCode, header::CONTENT_TYPE},
};
use serde::de::DeserializeOwned;
use tower::{Service, ServiceExt};

use crate::{
    client::api::{ApiFailure, ExpenseApi},
    endpoints::{self, format_endpoint},
    error::ErrorBody,
    expense::{Expense, ExpenseForm},
};

/// Sends API requests straight to a router without going over the network.
pub type RouterClient = ServiceClient<Router>;

/// Sends API requests to `service`, prefixing each path with a base URL.
#[derive(Debug, Clone)]
pub struct ServiceClient<S> {
    service: S,
    base_url: String,
}

impl<S> ServiceClient<S> {
    /// Create a client that sends requests with path-only URIs, e.g. `/api/expenses`.
    pub fn new(service: S) -> Self {
        Self {
            service,
            base_url: String::new(),
        }
    }

    /// Prefix every request path with `base_url`, e.g. `http://localhost:8000`.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }

    fn uri(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl<S> ServiceClient<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + Sync,
    S::Error: Display + Send,
    S::Future: Send,
{
    async fn call(
        &self,
        method: Method,
        path: &str,
        form: Option<&ExpenseForm>,
    ) -> Result<Bytes, ApiFailure> {
        let builder = Request::builder().method(method).uri(self.uri(path));
        let request = match form {
            Some(form) => {
                let body = serde_json::to_vec(form)
                    .map_err(|error| ApiFailure::Transport(error.to_string()))?;
                builder
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
            }
            None => builder.body(Body::empty()),
        }
        .map_err(|error| ApiFailure::Transport(error.to_string()))?;

        let response = self
            .service
            .clone()
            .oneshot(request)
            .await
            .map_err(|error| ApiFailure::Transport(error.to_string()))?;

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|error| ApiFailure::Transport(error.to_string()))?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(rejection(status, &body))
        }
    }
}

fn rejection(status: StatusCode, body: &[u8]) -> ApiFailure {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .map(|body| body.error);

    ApiFailure::Rejected {
        status: status.as_u16(),
        message,
    }
}

fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiFailure> {
    serde_json::from_slice(body).map_err(|error| ApiFailure::InvalidResponse(error.to_string()))
}

impl<S> ExpenseApi for ServiceClient<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + Sync,
    S::Error: Display + Send,
    S::Future: Send,
{
    async fn list_expenses(&self) -> Result<Vec<Expense>, ApiFailure> {
        let body = self.call(Method::GET, endpoints::EXPENSES_API, None).await?;
        parse_json(&body)
    }

    async fn get_expense(&self, id: &str) -> Result<Expense, ApiFailure> {
        let uri = format_endpoint(endpoints::EXPENSE, id);
        let body = self.call(Method::GET, &uri, None).await?;
        parse_json(&body)
    }

    async fn create_expense(&self, form: &ExpenseForm) -> Result<Expense, ApiFailure> {
        let body = self
            .call(Method::POST, endpoints::EXPENSES_API, Some(form))
            .await?;
        parse_json(&body)
    }

    async fn update_expense(&self, id: &str, form: &ExpenseForm) -> Result<Expense, ApiFailure> {
        let uri = format_endpoint(endpoints::EXPENSE, id);
        let body = self.call(Method::PUT, &uri, Some(form)).await?;
        parse_json(&body)
    }

    async fn delete_expense(&self, id: &str) -> Result<(), ApiFailure> {
        let uri = format_endpoint(endpoints::EXPENSE, id);
        self.call(Method::DELETE, &uri, None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        body::Body,
        http::{Request, Response},
    };
    use tower::service_fn;

    use crate::{
        AppState, build_router,
        client::api::{ApiFailure, ExpenseApi},
        expense::{ExpenseForm, MemoryExpenseStore},
        storage::Storage,
    };

    use super::{RouterClient, ServiceClient};

    fn get_seeded_client() -> RouterClient {
        let state = AppState::new(Storage::Transient(MemoryExpenseStore::with_seed_data()));

        RouterClient::new(build_router(state))
    }

    #[tokio::test]
    async fn lists_expenses() {
        let client = get_seeded_client();

        let expenses = client.list_expenses().await.unwrap();

        assert_eq!(expenses.len(), 3);
        assert_eq!(expenses[2].description, "Movie tickets");
    }

    #[tokio::test]
    async fn creates_and_fetches_expense() {
        let client = get_seeded_client();

        let created = client
            .create_expense(&ExpenseForm::new("Coffee", 4.5, "Food"))
            .await
            .unwrap();
        let fetched = client.get_expense(&created.id).await.unwrap();

        assert_eq!(created, fetched);
    }

    #[tokio::test]
    async fn error_body_becomes_rejection_message() {
        let client = get_seeded_client();

        let got = client.delete_expense("999").await;

        assert_eq!(
            got,
            Err(ApiFailure::Rejected {
                status: 404,
                message: Some("Expense not found".to_owned()),
            })
        );
    }

    #[tokio::test]
    async fn invalid_form_is_rejected() {
        let client = get_seeded_client();

        let got = client
            .update_expense("1", &ExpenseForm::default())
            .await;

        assert!(
            matches!(got, Err(ApiFailure::Rejected { status: 400, .. })),
            "want 400 rejection, got {got:?}"
        );
    }

    #[tokio::test]
    async fn base_url_prefixes_request_uris() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();
        let service = service_fn(move |request: Request<Body>| {
            let recorder = recorder.clone();
            async move {
                recorder.lock().unwrap().push(request.uri().to_string());
                Ok::<_, std::io::Error>(Response::new(Body::from("[]")))
            }
        });
        let client = ServiceClient::new(service).with_base_url("http://localhost:8000/");

        let expenses = client.list_expenses().await.unwrap();

        assert!(expenses.is_empty());
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["http://localhost:8000/api/expenses".to_owned()]
        );
    }

    #[tokio::test]
    async fn absolute_uris_reach_router() {
        let state = AppState::new(Storage::Transient(MemoryExpenseStore::with_seed_data()));
        let client =
            RouterClient::new(build_router(state)).with_base_url("http://localhost:8000");

        let expense = client.get_expense("2").await.unwrap();

        assert_eq!(expense.description, "Gas");
    }

    #[tokio::test]
    async fn service_errors_are_transport_failures() {
        let service = service_fn(|_: Request<Body>| async {
            Err::<Response<Body>, _>(std::io::Error::other("connection refused"))
        });
        let client = ServiceClient::new(service);

        let got = client.delete_expense("1").await;

        assert_eq!(
            got,
            Err(ApiFailure::Transport("connection refused".to_owned()))
        );
    }

    #[tokio::test]
    async fn unexpected_body_is_invalid_response() {
        let service = service_fn(|_: Request<Body>| async {
            Ok::<_, std::io::Error>(Response::new(Body::from("<h1>Expenses</h1>")))
        });
        let client = ServiceClient::new(service);

        let got = client.list_expenses().await;

        assert!(
            matches!(got, Err(ApiFailure::InvalidResponse(_))),
            "want invalid response, got {got:?}"
        );
    }
}
