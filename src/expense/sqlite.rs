//! Implements a SQLite backed expense store.
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Row, params};
use time::OffsetDateTime;

use crate::{
    Error,
    expense::{Expense, ExpenseFields, ExpenseStore},
};

/// Create the expense table if it does not already exist.
///
/// The database generates IDs as 24 random hex characters.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
            id TEXT PRIMARY KEY NOT NULL DEFAULT (lower(hex(randomblob(12)))),
            description TEXT NOT NULL,
            amount REAL NOT NULL,
            category TEXT NOT NULL,
            date TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Map a row with the columns `id, description, amount, category, date` to an [Expense].
pub fn map_row_to_expense(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let description = row.get(1)?;
    let amount = row.get(2)?;
    let category = row.get(3)?;
    let date: OffsetDateTime = row.get(4)?;

    Ok(Expense {
        id,
        description,
        amount,
        category,
        date: Some(date),
    })
}

/// Stores expenses in a SQLite database.
///
/// Call [create_expense_table] on the connection before using the store.
#[derive(Debug, Clone)]
pub struct SQLiteExpenseStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteExpenseStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

impl ExpenseStore for SQLiteExpenseStore {
    /// Retrieve every expense in the order they were inserted.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is a SQL error.
    fn list(&self) -> Result<Vec<Expense>, Error> {
        self.lock()?
            .prepare(
                "SELECT id, description, amount, category, date FROM expense ORDER BY rowid ASC",
            )?
            .query_map([], map_row_to_expense)?
            .map(|maybe_expense| maybe_expense.map_err(Error::from))
            .collect()
    }

    /// Retrieve an expense in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid expense,
    /// - or [Error::SqlError] there is some other SQL error.
    fn get(&self, id: &str) -> Result<Expense, Error> {
        let expense = self
            .lock()?
            .prepare("SELECT id, description, amount, category, date FROM expense WHERE id = :id")?
            .query_row(&[(":id", &id)], map_row_to_expense)?;

        Ok(expense)
    }

    /// Create a new expense dated now.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is a SQL error.
    fn create(&self, fields: ExpenseFields) -> Result<Expense, Error> {
        let expense = self
            .lock()?
            .prepare(
                "INSERT INTO expense (description, amount, category, date)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id, description, amount, category, date",
            )?
            .query_row(
                params![
                    fields.description,
                    fields.amount,
                    fields.category,
                    OffsetDateTime::now_utc(),
                ],
                map_row_to_expense,
            )?;

        Ok(expense)
    }

    /// Replace the description, amount and category of an expense.
    ///
    /// The date the expense was created is kept.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid expense,
    /// - or [Error::SqlError] there is some other SQL error.
    fn update(&self, id: &str, fields: ExpenseFields) -> Result<Expense, Error> {
        let expense = self
            .lock()?
            .prepare(
                "UPDATE expense
                 SET description = ?1, amount = ?2, category = ?3
                 WHERE id = ?4
                 RETURNING id, description, amount, category, date",
            )?
            .query_row(
                params![fields.description, fields.amount, fields.category, id],
                map_row_to_expense,
            )?;

        Ok(expense)
    }

    /// Delete an expense from the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid expense,
    /// - or [Error::SqlError] there is some other SQL error.
    fn delete(&self, id: &str) -> Result<(), Error> {
        let rows_affected = self
            .lock()?
            .execute("DELETE FROM expense WHERE id = :id", &[(":id", &id)])?;

        match rows_affected {
            0 => Err(Error::NotFound),
            _ => Ok(()),
        }
    }
}
