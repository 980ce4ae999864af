//! Creates the tables the SQLite payment store reads and writes.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{Error, StoreError, UserId};

/// Create the application tables in a single exclusive transaction.
///
/// Safe to call on a database that has already been initialized.
///
/// # Errors
/// Returns an [Error::Store] if any table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)
            .map_err(StoreError::from)?;

    create_profile_table(&transaction).map_err(StoreError::from)?;
    create_payment_table(&transaction).map_err(StoreError::from)?;

    transaction.commit().map_err(StoreError::from)?;

    Ok(())
}

/// Create the table of user profiles that payments are joined with for display names.
///
/// Payments do not reference this table with a foreign key: a payment may be
/// recorded for a user that has no profile yet.
fn create_profile_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS profile (
                id TEXT PRIMARY KEY,
                display_name TEXT
                )",
        (),
    )?;

    Ok(())
}

/// Create the payments table.
fn create_payment_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS payments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                gym_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                amount NUMERIC NOT NULL,
                currency TEXT NOT NULL,
                status TEXT NOT NULL,
                payment_method TEXT,
                description TEXT,
                transaction_date TEXT NOT NULL
                )",
        (),
    )?;

    // Used by the gym payment listing.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_payments_gym_date ON payments(gym_id, transaction_date);",
        (),
    )?;

    Ok(())
}

/// Create or replace the profile for `user_id`.
///
/// # Errors
/// Returns an [Error::Store] if an SQL related error occurred.
pub fn create_profile(
    user_id: &UserId,
    display_name: Option<&str>,
    connection: &Connection,
) -> Result<(), Error> {
    connection
        .execute(
            "INSERT INTO profile (id, display_name) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET display_name = excluded.display_name",
            (user_id, display_name),
        )
        .map_err(StoreError::from)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::UserId;

    use super::{create_profile, initialize};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn initialize_twice_succeeds() {
        let conn = get_test_connection();

        assert_eq!(initialize(&conn), Ok(()));
    }

    #[test]
    fn create_profile_replaces_display_name() {
        let conn = get_test_connection();
        let user_id = UserId::new("u1");

        create_profile(&user_id, Some("Ann"), &conn).unwrap();
        create_profile(&user_id, Some("Annie"), &conn).unwrap();

        let name: String = conn
            .query_row("SELECT display_name FROM profile WHERE id = 'u1'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(name, "Annie");
    }
}
