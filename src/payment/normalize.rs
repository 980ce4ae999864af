//! Reshapes stored payment rows into the values the dashboard displays.

use serde::{Deserialize, Serialize};

use crate::{Error, GymId, LocalTimezone, PaymentId};

use super::core::{PaymentRow, PaymentStatus};

/// Shown when the paying user has no display name.
pub const GUEST_MEMBER_NAME: &str = "Guest";

/// Shown when a payment has no description.
pub const GENERAL_PAYMENT_PLAN: &str = "General Payment";

/// Shown when a payment has no payment method.
pub const DEFAULT_PAYMENT_METHOD: &str = "cash";

/// What a payment was for.
///
/// Every payment is currently classified as a membership payment: the store
/// does not record a kind yet, so this is a constant rather than something
/// read from the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// A payment towards a gym membership.
    #[default]
    Membership,
}

/// A payment ready for display in the dashboard.
///
/// The serialized field names are relied on by the dashboard and must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionUI {
    /// The ID of the payment.
    pub id: PaymentId,
    /// The gym that received the payment.
    pub gym_id: GymId,
    /// The paying user's display name, or "Guest".
    pub member_name: String,
    /// What the payment was for, always [TransactionKind::Membership].
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The payment description, or "General Payment".
    pub plan: String,
    /// The amount paid.
    pub amount: f64,
    /// How the payment was made, or "cash".
    pub method: String,
    /// The stored status, unchanged.
    pub status: PaymentStatus,
    /// The local date of the payment, e.g. "Oct 5, 2025".
    pub date: String,
    /// The local time of the payment, e.g. "03:07 PM".
    pub time: String,
}

/// Build the display value for a single stored payment.
///
/// Missing display names, descriptions and payment methods are replaced with
/// defaults, the amount is coerced to a number and the timestamp is split into
/// a date and a time in `timezone`. The status is passed through as stored,
/// even when it is not one the dashboard recognises.
///
/// # Errors
/// Returns [Error::MalformedAmount] if the stored amount is text that is not a number.
pub fn normalize_row(row: PaymentRow, timezone: &LocalTimezone) -> Result<TransactionUI, Error> {
    let amount = row.amount.to_number().ok_or_else(|| Error::MalformedAmount {
        id: row.id,
        value: row.amount.to_string(),
    })?;

    if !PaymentStatus::from(row.status.as_str()).is_recognised() {
        tracing::debug!(
            "payment {} has status \"{}\" which the dashboard does not recognise",
            row.id,
            row.status
        );
    }

    Ok(TransactionUI {
        id: row.id,
        gym_id: row.gym_id,
        member_name: non_empty_or(row.member_name, GUEST_MEMBER_NAME),
        kind: TransactionKind::Membership,
        plan: non_empty_or(row.description, GENERAL_PAYMENT_PLAN),
        amount,
        method: non_empty_or(row.payment_method, DEFAULT_PAYMENT_METHOD),
        status: PaymentStatus::from(row.status),
        date: timezone.display_date(row.transaction_date),
        time: timezone.display_time(row.transaction_date),
    })
}

/// Empty strings count as missing, the same as NULL.
fn non_empty_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_owned())
}
