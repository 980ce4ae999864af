//! Defines the record store trait that payments are read from and written to.

mod sqlite;

pub use sqlite::SQLitePaymentStore;

use crate::{
    GymId,
    payment::{NewPayment, Payment, PaymentRow},
};

/// Handles the creation and retrieval of payment records.
///
/// Implementations own durability, indexing and transactional guarantees.
/// Callers get back exactly what the store reports, errors included.
pub trait RecordStore {
    /// Retrieve payments joined with the paying user's display name, in the
    /// way defined by `query`.
    fn query_payments(&self, query: &PaymentQuery) -> Result<Vec<PaymentRow>, StoreError>;

    /// Insert a single payment and return the stored record, including any
    /// store-assigned ID.
    fn insert_payment(&self, payment: NewPayment) -> Result<Payment, StoreError>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn query_payments(&self, query: &PaymentQuery) -> Result<Vec<PaymentRow>, StoreError> {
        (**self).query_payments(query)
    }

    fn insert_payment(&self, payment: NewPayment) -> Result<Payment, StoreError> {
        (**self).insert_payment(payment)
    }
}

/// Defines how payments should be fetched from [RecordStore::query_payments].
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentQuery {
    /// Only include payments made to this gym.
    pub gym_id: GymId,
    /// Selects up to the first N (`limit`) payments.
    pub limit: Option<u64>,
    /// Orders payments by transaction date in the order `sort_date`. None returns payments in the
    /// order they are stored.
    pub sort_date: Option<SortOrder>,
}

impl PaymentQuery {
    /// All payments for `gym_id`, most recent first.
    pub fn latest_for_gym(gym_id: GymId) -> Self {
        Self {
            gym_id,
            limit: None,
            sort_date: Some(SortOrder::Descending),
        }
    }
}

/// The order to sort payments in a [PaymentQuery].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Sort in order of increasing value.
    Ascending,
    /// Sort in order of decreasing value.
    Descending,
}

/// Failures reported by a [RecordStore].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StoreError {
    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    LockPoisoned,

    /// The record broke a constraint of the store, e.g. a required column was missing.
    #[error("a store constraint failed: {0}")]
    ConstraintViolation(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    Sql(rusqlite::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(sql_error, description)
                if sql_error.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::ConstraintViolation(
                    description.unwrap_or_else(|| sql_error.to_string()),
                )
            }
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                StoreError::Sql(error)
            }
        }
    }
}
