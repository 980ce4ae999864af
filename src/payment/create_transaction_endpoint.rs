//! Defines the endpoint for recording a new payment.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    Error,
    payment::{CreateTransactionInput, Payment},
};

use super::list_transactions_endpoint::PaymentState;

/// A route handler for recording a new payment, responds with the stored
/// payment and `201 Created` on success.
///
/// Fields the request does not control, such as the currency, are ignored if
/// sent. A body that is not valid JSON for [CreateTransactionInput] is a
/// [Error::InvalidRequestBody].
pub async fn create_transaction_endpoint(
    State(state): State<PaymentState>,
    input: Result<Json<CreateTransactionInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Payment>), Error> {
    let Json(input) = input.map_err(|rejection| {
        tracing::debug!("rejected create transaction body: {rejection}");
        Error::InvalidRequestBody(rejection.body_text())
    })?;

    let payment = state.service.create_transaction(input)?;

    Ok((StatusCode::CREATED, Json(payment)))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{
        Error, GymId, LocalTimezone, SQLitePaymentStore, UserId,
        db::initialize,
        payment::{CreateTransactionInput, list_transactions_endpoint::PaymentState},
    };

    use super::create_transaction_endpoint;

    fn get_test_state() -> PaymentState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        PaymentState::new(
            SQLitePaymentStore::new(Arc::new(Mutex::new(conn))),
            LocalTimezone::from_name("UTC").unwrap(),
        )
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let state = get_test_state();
        let input = CreateTransactionInput {
            gym_id: GymId::new("g1"),
            user_id: UserId::new("u1"),
            amount: 500.0,
            method: Some("card".to_owned()),
            plan: Some("Monthly".to_owned()),
            status: None,
        };

        let (status, Json(payment)) =
            create_transaction_endpoint(State(state), Ok(Json(input)))
                .await
                .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(payment.id, 1);
        assert_eq!(payment.currency, "INR");
        assert_eq!(payment.status, "completed");
        assert_eq!(payment.description.as_deref(), Some("Monthly"));
    }

    #[tokio::test]
    async fn rejects_empty_user_id() {
        let state = get_test_state();
        let input = CreateTransactionInput {
            gym_id: GymId::new("g1"),
            user_id: UserId::new(""),
            amount: 500.0,
            method: None,
            plan: None,
            status: None,
        };

        let got = create_transaction_endpoint(State(state), Ok(Json(input))).await;

        assert_eq!(
            got.map(|(status, Json(payment))| (status, payment)),
            Err(Error::EmptyId("user_id"))
        );
    }
}
