//! Gymdesk is the data-access layer for a gym-management admin dashboard.
//!
//! This library reads and writes payment records through a [RecordStore],
//! reshapes them into the [TransactionUI] values the dashboard displays, and
//! declares the membership and plan domain types.
//!
//! The library also provides a small JSON API (see [build_router]) so the
//! dashboard can reach these operations over HTTP.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod db;
mod endpoints;
mod ids;
mod logging;
mod membership;
mod not_found;
mod payment;
mod routing;
mod store;
mod timezone;

pub use app_state::AppState;
pub use db::{create_profile, initialize as initialize_db};
pub use endpoints::format_endpoint;
pub use ids::{BranchId, GymId, MembershipId, PaymentId, PlanId, UserId};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use membership::{
    Discount, Membership, MembershipPlan, MembershipPricing, MembershipStatus, NewMembership,
    PlanSnapshot, RenewalReminder,
};
pub use payment::{
    CreateTransactionInput, DEFAULT_CURRENCY, DEFAULT_PAYMENT_METHOD, DEFAULT_STATUS,
    GENERAL_PAYMENT_PLAN, GUEST_MEMBER_NAME, NewPayment, Payment, PaymentRow, PaymentService,
    PaymentState, PaymentStatus, StoredAmount, TransactionKind, TransactionUI, normalize_row,
};
pub use routing::build_router;
pub use store::{PaymentQuery, RecordStore, SQLitePaymentStore, SortOrder, StoreError};
pub use timezone::LocalTimezone;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The record store reported a failure.
    ///
    /// The store's error is carried unchanged so callers see exactly what the
    /// store reported. Nothing in this crate retries store calls.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A required identifier was empty.
    ///
    /// The string names the offending field, e.g. "gym_id".
    #[error("{0} must not be empty")]
    EmptyId(&'static str),

    /// A request body could not be read as the expected JSON.
    ///
    /// The string is the reason the body was rejected, e.g. a missing field.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// A payment amount was NaN or infinite.
    #[error("{0} is not a valid payment amount")]
    InvalidAmount(f64),

    /// A stored amount could not be read as a number.
    #[error("payment {id} has an amount that is not a number: \"{value}\"")]
    MalformedAmount {
        /// The ID of the payment with the bad amount.
        id: PaymentId,
        /// The text the store returned for the amount.
        value: String,
    },

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// A plan or membership price was negative or not a finite number.
    #[error("{0} is not a valid price")]
    InvalidPrice(f64),

    /// A discount was negative, over 100%, or larger than the price it applies to.
    #[error("invalid discount: {0}")]
    InvalidDiscount(String),

    /// A membership's final price does not match its price minus its discount.
    #[error("final price {got} does not match the discounted price {want}")]
    FinalPriceMismatch {
        /// The final price that was provided.
        got: f64,
        /// The final price implied by the price and discount.
        want: f64,
    },

    /// A membership ends before it starts, or a plan has a zero duration.
    #[error("invalid membership period: {0}")]
    InvalidDateRange(String),

    /// Tried to subscribe to a plan that is no longer offered.
    #[error("the plan \"{0}\" is not active")]
    InactivePlan(String),

    /// Tried to move a membership to a status it cannot reach from its current one.
    #[error("a membership cannot go from {from} to {to}")]
    InvalidStatusTransition {
        /// The membership's current status.
        from: MembershipStatus,
        /// The status that was requested.
        to: MembershipStatus,
    },
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::EmptyId(_)
            | Error::InvalidRequestBody(_)
            | Error::InvalidAmount(_)
            | Error::InvalidPrice(_)
            | Error::InvalidDiscount(_)
            | Error::FinalPriceMismatch { .. }
            | Error::InvalidDateRange(_)
            | Error::InactivePlan(_) => StatusCode::BAD_REQUEST,
            Error::InvalidStatusTransition { .. } => StatusCode::CONFLICT,
            Error::InvalidTimezoneError(timezone) => {
                tracing::error!("Could not get local timezone \"{timezone}\"");

                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                        ensure the timezone has been set to valid, canonical timezone string"
                    ),
                );
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);

                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred, check the server logs for more details.",
                );
            }
        };

        error_response(status, &self.to_string())
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
