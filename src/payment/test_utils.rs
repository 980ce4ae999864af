//! In-memory record stores for testing the payment service without SQLite.

use std::sync::Mutex;

use time::OffsetDateTime;

use crate::{
    GymId, PaymentId, UserId,
    store::{PaymentQuery, RecordStore, StoreError},
};

use super::core::{NewPayment, Payment, PaymentRow, StoredAmount};

/// A store that keeps rows in a vector and records every query it receives.
///
/// Rows are returned in insertion order, never sorted, so tests can check
/// that callers keep the store's order.
#[derive(Debug, Default)]
pub struct FakeStore {
    rows: Mutex<Vec<PaymentRow>>,
    queries: Mutex<Vec<PaymentQuery>>,
}

impl FakeStore {
    pub fn with_rows(rows: Vec<PaymentRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
            queries: Mutex::default(),
        }
    }

    pub fn queries(&self) -> Vec<PaymentQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn payments(&self) -> Vec<PaymentRow> {
        self.rows.lock().unwrap().clone()
    }
}

impl RecordStore for FakeStore {
    fn query_payments(&self, query: &PaymentQuery) -> Result<Vec<PaymentRow>, StoreError> {
        self.queries.lock().unwrap().push(query.clone());

        let rows = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.gym_id == query.gym_id)
            .cloned()
            .collect();

        Ok(rows)
    }

    fn insert_payment(&self, payment: NewPayment) -> Result<Payment, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.len() as PaymentId + 1;

        rows.push(PaymentRow {
            id,
            gym_id: payment.gym_id.clone(),
            user_id: payment.user_id.clone(),
            amount: StoredAmount::Number(payment.amount),
            currency: payment.currency.clone(),
            status: payment.status.clone(),
            payment_method: payment.payment_method.clone(),
            description: payment.description.clone(),
            transaction_date: payment.transaction_date,
            member_name: None,
        });

        Ok(Payment {
            id,
            gym_id: payment.gym_id,
            user_id: payment.user_id,
            amount: payment.amount,
            currency: payment.currency,
            status: payment.status,
            payment_method: payment.payment_method,
            description: payment.description,
            transaction_date: payment.transaction_date,
        })
    }
}

/// A store whose every call fails with a constraint violation carrying `message`.
#[derive(Debug)]
pub struct FailingStore {
    message: String,
}

impl FailingStore {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
        }
    }
}

impl RecordStore for FailingStore {
    fn query_payments(&self, _query: &PaymentQuery) -> Result<Vec<PaymentRow>, StoreError> {
        Err(StoreError::ConstraintViolation(self.message.clone()))
    }

    fn insert_payment(&self, _payment: NewPayment) -> Result<Payment, StoreError> {
        Err(StoreError::ConstraintViolation(self.message.clone()))
    }
}

/// A fully populated row for gym "g1".
pub fn payment_row(id: PaymentId, transaction_date: OffsetDateTime) -> PaymentRow {
    PaymentRow {
        id,
        gym_id: GymId::new("g1"),
        user_id: UserId::new(format!("u{id}")),
        amount: StoredAmount::Number(100.0 * id as f64),
        currency: "INR".to_owned(),
        status: "success".to_owned(),
        payment_method: Some("card".to_owned()),
        description: Some("Monthly".to_owned()),
        transaction_date,
        member_name: Some(format!("Member {id}")),
    }
}
