//! Implements a SQLite backed payment store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, params_from_iter, types::Value};
use time::UtcOffset;

use crate::{
    payment::{NewPayment, Payment, PaymentRow},
    store::{PaymentQuery, RecordStore, SortOrder, StoreError},
};

/// Stores payments in a SQLite database.
///
/// The database must have been set up with [crate::initialize_db], which adds
/// the payment and profile tables.
#[derive(Debug, Clone)]
pub struct SQLitePaymentStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLitePaymentStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl RecordStore for SQLitePaymentStore {
    /// Retrieve the payments for a gym, joined with each payer's display name.
    ///
    /// Payments from users without a profile are still returned, with no
    /// display name. Payments with the same date are ordered by ID in the same
    /// direction as the date so the order is stable.
    ///
    /// # Errors
    /// This function will return a:
    /// - [StoreError::LockPoisoned] if the database lock cannot be acquired,
    /// - or [StoreError::Sql] if there is some other SQL error.
    fn query_payments(&self, query: &PaymentQuery) -> Result<Vec<PaymentRow>, StoreError> {
        let mut query_string = String::from(
            "SELECT payments.id, payments.gym_id, payments.user_id, payments.amount, \
            payments.currency, payments.status, payments.payment_method, payments.description, \
            payments.transaction_date, profile.display_name \
            FROM payments \
            LEFT JOIN profile ON payments.user_id = profile.id \
            WHERE payments.gym_id = ?1",
        );
        let mut query_parameters = vec![Value::Text(query.gym_id.to_string())];

        match query.sort_date {
            Some(SortOrder::Ascending) => {
                query_string.push_str(" ORDER BY payments.transaction_date ASC, payments.id ASC")
            }
            Some(SortOrder::Descending) => {
                query_string.push_str(" ORDER BY payments.transaction_date DESC, payments.id DESC")
            }
            None => {}
        }

        if let Some(limit) = query.limit {
            query_string.push_str(" LIMIT ?2");
            query_parameters.push(Value::Integer(limit_parameter(limit)));
        }

        let connection = self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            StoreError::LockPoisoned
        })?;

        let mut statement = connection.prepare(&query_string)?;
        let rows = statement
            .query_map(params_from_iter(query_parameters.iter()), map_payment_row)?
            .map(|row_result| row_result.map_err(StoreError::from))
            .collect();

        rows
    }

    /// Create a new payment in the database.
    ///
    /// The transaction date is stored in UTC so that dates sort in time order.
    ///
    /// # Errors
    /// This function will return a:
    /// - [StoreError::LockPoisoned] if the database lock cannot be acquired,
    /// - [StoreError::ConstraintViolation] if the payment breaks a table constraint,
    /// - or [StoreError::Sql] if there is some other SQL error.
    fn insert_payment(&self, payment: NewPayment) -> Result<Payment, StoreError> {
        let connection = self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            StoreError::LockPoisoned
        })?;

        let payment = connection
            .prepare(
                "INSERT INTO payments (gym_id, user_id, amount, currency, status, payment_method, description, transaction_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 RETURNING id, gym_id, user_id, amount, currency, status, payment_method, description, transaction_date",
            )?
            .query_row(
                (
                    payment.gym_id,
                    payment.user_id,
                    payment.amount,
                    payment.currency,
                    payment.status,
                    payment.payment_method,
                    payment.description,
                    payment.transaction_date.to_offset(UtcOffset::UTC),
                ),
                map_stored_payment_row,
            )?;

        Ok(payment)
    }
}

/// SQLite treats a negative LIMIT as no limit, so limits past `i64::MAX` are clamped.
fn limit_parameter(limit: u64) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

/// Map a row from the listing query to a [PaymentRow].
fn map_payment_row(row: &Row) -> Result<PaymentRow, rusqlite::Error> {
    Ok(PaymentRow {
        id: row.get(0)?,
        gym_id: row.get(1)?,
        user_id: row.get(2)?,
        amount: row.get(3)?,
        currency: row.get(4)?,
        status: row.get(5)?,
        payment_method: row.get(6)?,
        description: row.get(7)?,
        transaction_date: row.get(8)?,
        member_name: row.get(9)?,
    })
}

/// Map a row of the payments table to a [Payment].
fn map_stored_payment_row(row: &Row) -> Result<Payment, rusqlite::Error> {
    Ok(Payment {
        id: row.get(0)?,
        gym_id: row.get(1)?,
        user_id: row.get(2)?,
        amount: row.get(3)?,
        currency: row.get(4)?,
        status: row.get(5)?,
        payment_method: row.get(6)?,
        description: row.get(7)?,
        transaction_date: row.get(8)?,
    })
}
