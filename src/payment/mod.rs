//! Payments made to gyms.
//!
//! This module contains everything related to payments:
//! - The stored `Payment` record and the `PaymentRow` returned by listings
//! - `normalize_row`, which reshapes rows into `TransactionUI` for the dashboard
//! - `PaymentService`, which lists and records payments through a record store
//! - Route handlers for the payment endpoints

mod core;
mod create_transaction_endpoint;
mod list_transactions_endpoint;
mod normalize;
mod service;

#[cfg(test)]
mod test_utils;

pub use core::{
    DEFAULT_CURRENCY, DEFAULT_STATUS, NewPayment, Payment, PaymentRow, PaymentStatus,
    StoredAmount,
};
pub use create_transaction_endpoint::create_transaction_endpoint;
pub use list_transactions_endpoint::{PaymentState, list_transactions_endpoint};
pub use normalize::{
    DEFAULT_PAYMENT_METHOD, GENERAL_PAYMENT_PLAN, GUEST_MEMBER_NAME, TransactionKind,
    TransactionUI, normalize_row,
};
pub use service::{CreateTransactionInput, PaymentService};
