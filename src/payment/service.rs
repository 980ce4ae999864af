//! Lists and records payments through an injected [RecordStore].

use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    Error, GymId, LocalTimezone, UserId,
    store::{PaymentQuery, RecordStore},
};

use super::{
    core::{DEFAULT_CURRENCY, DEFAULT_STATUS, NewPayment, Payment},
    normalize::{TransactionUI, normalize_row},
};

/// The request to record a new payment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateTransactionInput {
    /// The gym that received the payment.
    pub gym_id: GymId,
    /// The user that made the payment.
    pub user_id: UserId,
    /// The amount paid. May be negative, e.g. for refunds.
    pub amount: f64,
    /// How the payment was made, e.g. "card".
    #[serde(default)]
    pub method: Option<String>,
    /// The plan the payment is for. Stored as the payment description.
    #[serde(default)]
    pub plan: Option<String>,
    /// The payment status. Defaults to "completed".
    #[serde(default)]
    pub status: Option<String>,
}

impl CreateTransactionInput {
    /// Check the required fields are present.
    ///
    /// Business rules such as duplicate payments are left to the store.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyId] if the gym or user ID is empty,
    /// - or [Error::InvalidAmount] if the amount is NaN or infinite.
    pub fn validate(&self) -> Result<(), Error> {
        if self.gym_id.is_empty() {
            return Err(Error::EmptyId("gym_id"));
        }

        if self.user_id.is_empty() {
            return Err(Error::EmptyId("user_id"));
        }

        if !self.amount.is_finite() {
            return Err(Error::InvalidAmount(self.amount));
        }

        Ok(())
    }

    /// Build the record to store, stamped with `now`.
    ///
    /// The currency is always [DEFAULT_CURRENCY].
    fn into_new_payment(self, now: OffsetDateTime) -> NewPayment {
        NewPayment {
            gym_id: self.gym_id,
            user_id: self.user_id,
            amount: self.amount,
            currency: DEFAULT_CURRENCY.to_owned(),
            status: self.status.unwrap_or_else(|| DEFAULT_STATUS.to_owned()),
            payment_method: self.method,
            description: self.plan,
            transaction_date: now,
        }
    }
}

/// Reads payments for display and records new ones.
///
/// Every call is a single store round trip. Store errors are returned as
/// [Error::Store] without retrying.
#[derive(Debug, Clone)]
pub struct PaymentService<S> {
    store: S,
    timezone: LocalTimezone,
}

impl<S: RecordStore> PaymentService<S> {
    /// Create a service that reads and writes through `store` and displays
    /// dates and times in `timezone`.
    pub fn new(store: S, timezone: LocalTimezone) -> Self {
        Self { store, timezone }
    }

    /// List a gym's payments for display, most recent first.
    ///
    /// The order is the order the store returned the rows in.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyId] if `gym_id` is empty,
    /// - [Error::Store] if the store query failed,
    /// - or [Error::MalformedAmount] if a stored amount is not a number.
    ///
    /// Either every payment is returned or none are.
    pub fn list_transactions(&self, gym_id: &GymId) -> Result<Vec<TransactionUI>, Error> {
        if gym_id.is_empty() {
            return Err(Error::EmptyId("gym_id"));
        }

        let rows = self
            .store
            .query_payments(&PaymentQuery::latest_for_gym(gym_id.clone()))?;

        tracing::debug!("fetched {} payments for gym {gym_id}", rows.len());

        rows.into_iter()
            .map(|row| normalize_row(row, &self.timezone))
            .collect()
    }

    /// Record a new payment made now and return it as stored.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyId] or [Error::InvalidAmount] if `input` is invalid,
    /// - or [Error::Store] if the insert failed.
    pub fn create_transaction(&self, input: CreateTransactionInput) -> Result<Payment, Error> {
        input.validate()?;

        let payment = self
            .store
            .insert_payment(input.into_new_payment(OffsetDateTime::now_utc()))?;

        tracing::info!(
            "recorded payment {} of {} {} for gym {}",
            payment.id,
            payment.amount,
            payment.currency,
            payment.gym_id
        );

        Ok(payment)
    }
}
