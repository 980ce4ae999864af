//! Application router configuration.

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    AppState, endpoints,
    logging::logging_middleware,
    not_found::get_404_not_found,
    payment::{create_transaction_endpoint, list_transactions_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::GYM_TRANSACTIONS,
            get(list_transactions_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS_API,
            post(create_transaction_endpoint),
        )
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{AppState, Payment, TransactionUI, endpoints, format_endpoint};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "Asia/Kolkata")
            .expect("Could not create app state.");

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn created_payment_is_listed_for_its_gym() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "gym_id": "g1",
                "user_id": "u1",
                "amount": 1499.0,
                "method": "upi",
                "plan": "Quarterly",
                "currency": "USD",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let payment = response.json::<Payment>();
        assert_eq!(payment.currency, "INR", "currency in the input should be ignored");
        assert_eq!(payment.status, "completed");

        let response = server
            .get(&format_endpoint(endpoints::GYM_TRANSACTIONS, "g1"))
            .await;

        response.assert_status_ok();
        let transactions = response.json::<Vec<TransactionUI>>();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].id, payment.id);
        assert_eq!(transactions[0].member_name, "Guest");
        assert_eq!(transactions[0].plan, "Quarterly");
        assert_eq!(transactions[0].method, "upi");
        assert_eq!(transactions[0].amount, 1499.0);
    }

    #[tokio::test]
    async fn other_gyms_payments_are_not_listed() {
        let server = get_test_server();
        server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({"gym_id": "g1", "user_id": "u1", "amount": 10.0}))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .get(&format_endpoint(endpoints::GYM_TRANSACTIONS, "g2"))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!([]));
    }

    #[tokio::test]
    async fn empty_user_id_is_bad_request() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({"gym_id": "g1", "user_id": " ", "amount": 10.0}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({"error": "user_id must not be empty"}));
    }

    #[tokio::test]
    async fn missing_amount_is_json_bad_request() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({"gym_id": "g1", "user_id": "u1"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        let message = body["error"].as_str().unwrap_or_default();
        assert!(message.contains("amount"), "got body {body}");
    }

    #[tokio::test]
    async fn wrongly_typed_amount_is_json_bad_request() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({"gym_id": "g1", "user_id": "u1", "amount": "a lot"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert!(body["error"].is_string(), "got body {body}");
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let server = get_test_server();

        let response = server.get("/api/coffee").await;

        response.assert_status_not_found();
        let body = response.json::<Value>();
        assert!(body.get("error").is_some(), "got body {body}");
    }
}
