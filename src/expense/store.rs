//! Defines the expense store trait.

use crate::{
    Error,
    expense::{Expense, ExpenseFields},
};

/// Handles the creation, retrieval, modification and deletion of expenses.
///
/// Implementations share their state between clones so that a store can be
/// handed to each request handler.
pub trait ExpenseStore: Clone + Send + Sync + 'static {
    /// Retrieve every expense in the order they were created.
    fn list(&self) -> Result<Vec<Expense>, Error>;

    /// Retrieve the expense with the ID `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no expense with the ID `id`.
    fn get(&self, id: &str) -> Result<Expense, Error>;

    /// Create a new expense with a fresh ID.
    fn create(&self, fields: ExpenseFields) -> Result<Expense, Error>;

    /// Replace the description, amount and category of the expense `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no expense with the ID `id`.
    fn update(&self, id: &str, fields: ExpenseFields) -> Result<Expense, Error>;

    /// Delete the expense with the ID `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no expense with the ID `id`.
    fn delete(&self, id: &str) -> Result<(), Error>;
}
