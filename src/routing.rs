//! Application router configuration.

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::services::ServeDir;

use crate::{
    AppState, endpoints,
    expense::{get_add_expense_page, get_expenses_page, post_add_expense},
    html::error_view,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::EXPENSES_VIEW, get(get_expenses_page))
        .route(
            endpoints::ADD_EXPENSE_VIEW,
            get(get_add_expense_page).post(post_add_expense),
        )
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        error_view(
            "Not Found",
            "404",
            "Something's missing.",
            "Sorry, we can't find that page.",
        ),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum_test::TestServer;

    use crate::{
        AppState, endpoints,
        expense::{ExpenseForm, test_utils::FakeExpenseClient},
        pagination::PaginationConfig,
    };

    use super::build_router;

    fn test_server(client: Arc<FakeExpenseClient>) -> TestServer {
        let state = AppState::new(client, PaginationConfig::default());

        TestServer::new(build_router(state))
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = test_server(Arc::new(FakeExpenseClient::default()));

        server
            .get("/does-not-exist")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn added_expense_appears_in_list() {
        let client = Arc::new(FakeExpenseClient::default());
        let server = test_server(client.clone());

        server
            .post(endpoints::ADD_EXPENSE_VIEW)
            .form(&ExpenseForm {
                amount: "4.20".to_owned(),
                description: "Flat white".to_owned(),
                date: "2024-02-15".to_owned(),
                category: "coffee".to_owned(),
                payment_method: "cash".to_owned(),
            })
            .await
            .assert_status_see_other();

        let response = server.get(endpoints::EXPENSES_VIEW).await;

        response.assert_status_ok();
        assert!(response.text().contains("Flat white"));
        assert_eq!(client.fetch_calls(), 1);
    }

    #[tokio::test]
    async fn add_expense_page_is_served() {
        let server = test_server(Arc::new(FakeExpenseClient::default()));

        server
            .get(endpoints::ADD_EXPENSE_VIEW)
            .await
            .assert_status_ok();
    }
}
