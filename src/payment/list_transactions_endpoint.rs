//! Defines the endpoint for listing a gym's payments.

use axum::{
    Json,
    extract::{FromRef, Path, State},
};

use crate::{
    AppState, Error, GymId, LocalTimezone, SQLitePaymentStore,
    payment::{PaymentService, TransactionUI},
};

/// The state needed to list or create payments.
#[derive(Debug, Clone)]
pub struct PaymentState {
    /// The payment service backed by the application database.
    pub service: PaymentService<SQLitePaymentStore>,
}

impl PaymentState {
    /// Create the state from a store and the timezone to display dates in.
    pub fn new(store: SQLitePaymentStore, timezone: LocalTimezone) -> Self {
        Self {
            service: PaymentService::new(store, timezone),
        }
    }
}

impl FromRef<AppState> for PaymentState {
    fn from_ref(state: &AppState) -> Self {
        Self::new(
            SQLitePaymentStore::new(state.db_connection.clone()),
            state.local_timezone,
        )
    }
}

/// A route handler that returns a gym's payments as JSON, most recent first.
pub async fn list_transactions_endpoint(
    State(state): State<PaymentState>,
    Path(gym_id): Path<GymId>,
) -> Result<Json<Vec<TransactionUI>>, Error> {
    state.service.list_transactions(&gym_id).map(Json)
}
