//! Defines the payment records exchanged with the record store.

use std::fmt::Display;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ValueRef};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::OffsetDateTime;

use crate::{GymId, PaymentId, UserId};

/// The currency every new payment is recorded in.
///
/// Callers cannot choose the currency of a payment.
pub const DEFAULT_CURRENCY: &str = "INR";

/// The status given to new payments when the caller does not supply one.
pub const DEFAULT_STATUS: &str = "completed";

// ============================================================================
// MODELS
// ============================================================================

/// A payment as it is stored, i.e. money a user paid to a gym.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// The ID the store assigned to the payment.
    pub id: PaymentId,
    /// The gym that received the payment.
    pub gym_id: GymId,
    /// The user that made the payment.
    pub user_id: UserId,
    /// The amount paid.
    pub amount: f64,
    /// The ISO 4217 code of the currency the amount is in.
    pub currency: String,
    /// Free-form status, usually one of "success", "pending", "failed" or "completed".
    pub status: String,
    /// How the payment was made, e.g. "cash" or "card".
    pub payment_method: Option<String>,
    /// What the payment was for, usually a plan name.
    pub description: Option<String>,
    /// When the payment was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub transaction_date: OffsetDateTime,
}

/// A payment that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    /// The gym that received the payment.
    pub gym_id: GymId,
    /// The user that made the payment.
    pub user_id: UserId,
    /// The amount paid.
    pub amount: f64,
    /// The ISO 4217 code of the currency the amount is in.
    pub currency: String,
    /// Free-form status.
    pub status: String,
    /// How the payment was made.
    pub payment_method: Option<String>,
    /// What the payment was for.
    pub description: Option<String>,
    /// When the payment was recorded.
    pub transaction_date: OffsetDateTime,
}

/// A payment as returned by a listing query, joined with the display name of
/// the user that paid.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRow {
    /// The ID the store assigned to the payment.
    pub id: PaymentId,
    /// The gym that received the payment.
    pub gym_id: GymId,
    /// The user that made the payment.
    pub user_id: UserId,
    /// The amount paid, as the store returned it.
    pub amount: StoredAmount,
    /// The ISO 4217 code of the currency the amount is in.
    pub currency: String,
    /// Free-form status, as stored.
    pub status: String,
    /// How the payment was made.
    pub payment_method: Option<String>,
    /// What the payment was for.
    pub description: Option<String>,
    /// When the payment was recorded.
    pub transaction_date: OffsetDateTime,
    /// The paying user's display name.
    ///
    /// None when the user has no profile or the profile has no name.
    pub member_name: Option<String>,
}

/// An amount as a store hands it back: either a number or numeric-looking text.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredAmount {
    /// The store returned a number.
    Number(f64),
    /// The store returned text, e.g. a decimal column serialized as "499.99".
    Text(String),
}

impl StoredAmount {
    /// Coerce the amount to a number.
    ///
    /// Returns None if the amount is text that does not parse as a finite number.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            StoredAmount::Number(number) => Some(*number),
            StoredAmount::Text(text) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|number| number.is_finite()),
        }
    }
}

impl Display for StoredAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoredAmount::Number(number) => number.fmt(f),
            StoredAmount::Text(text) => text.fmt(f),
        }
    }
}

impl FromSql for StoredAmount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(integer) => Ok(StoredAmount::Number(integer as f64)),
            ValueRef::Real(real) => Ok(StoredAmount::Number(real)),
            ValueRef::Text(text) => Ok(StoredAmount::Text(
                String::from_utf8_lossy(text).into_owned(),
            )),
            ValueRef::Null | ValueRef::Blob(_) => Err(FromSqlError::InvalidType),
        }
    }
}

/// The status of a payment as shown to the dashboard.
///
/// The dashboard understands "success", "pending" and "failed". Stores may
/// hold other values (new payments default to "completed"), and those are
/// kept verbatim in [PaymentStatus::Other] rather than rejected or relabelled.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    /// The payment went through.
    Success,
    /// The payment has not settled yet.
    Pending,
    /// The payment was declined or errored.
    Failed,
    /// Any other status, exactly as stored.
    Other(String),
}

impl PaymentStatus {
    /// The status as it is stored.
    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Success => "success",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Other(status) => status,
        }
    }

    /// Whether the status is one of the three the dashboard understands.
    pub fn is_recognised(&self) -> bool {
        !matches!(self, PaymentStatus::Other(_))
    }
}

impl From<String> for PaymentStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "success" => PaymentStatus::Success,
            "pending" => PaymentStatus::Pending,
            "failed" => PaymentStatus::Failed,
            _ => PaymentStatus::Other(status),
        }
    }
}

impl From<&str> for PaymentStatus {
    fn from(status: &str) -> Self {
        status.to_owned().into()
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PaymentStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PaymentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(PaymentStatus::from)
    }
}
