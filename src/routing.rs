//! Application router configuration.

use axum::{Router, middleware, routing::get};
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::{
    AppState, endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, get_expense_endpoint,
        list_expenses_endpoint, update_expense_endpoint,
    },
    logging::logging_middleware,
};

/// Return a router with all the app's routes.
///
/// Requests that do not match an API route are served from the static file
/// directory, so `/` serves the client's `index.html`.
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .route(
            endpoints::EXPENSES_API,
            get(list_expenses_endpoint).post(create_expense_endpoint),
        )
        .route(
            endpoints::EXPENSE,
            get(get_expense_endpoint)
                .put(update_expense_endpoint)
                .delete(delete_expense_endpoint),
        )
        .layer(middleware::from_fn(logging_middleware))
        .fallback_service(static_files)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum_test::TestServer;

    use crate::{AppState, expense::MemoryExpenseStore, storage::Storage};

    use super::build_router;

    fn get_test_server(static_dir: &str) -> TestServer {
        let state = AppState::new(Storage::Transient(MemoryExpenseStore::new()))
            .with_static_dir(static_dir);

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn serves_index_from_static_dir() {
        let static_dir = std::env::temp_dir().join(format!("expense-static-{}", std::process::id()));
        std::fs::create_dir_all(&static_dir).unwrap();
        std::fs::write(static_dir.join("index.html"), "<h1>Expenses</h1>").unwrap();
        let server = get_test_server(static_dir.to_str().unwrap());

        let response = server.get("/").await;

        response.assert_status_ok();
        response.assert_text("<h1>Expenses</h1>");
        std::fs::remove_dir_all(&static_dir).unwrap();
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let server = get_test_server("/this/directory/does/not/exist");

        server
            .get("/api/unknown")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn responses_allow_cross_origin_requests() {
        let server = get_test_server("/this/directory/does/not/exist");

        let response = server
            .get(crate::endpoints::EXPENSES_API)
            .add_header(
                HeaderName::from_static("origin"),
                HeaderValue::from_static("http://localhost:3000"),
            )
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.headers().get("access-control-allow-origin"),
            Some(&HeaderValue::from_static("*"))
        );
    }
}
