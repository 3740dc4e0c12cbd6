//! Defines the core data models for expenses.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The identifier of an expense.
///
/// Identifiers are opaque strings. The in-memory store hands out sequential
/// numbers while the SQLite store generates random hex strings, so callers
/// must not assume any particular format.
pub type ExpenseId = String;

/// Money that was spent on something.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense, assigned by the store.
    pub id: ExpenseId,
    /// A text description of what the money was spent on.
    pub description: String,
    /// The amount of money spent.
    pub amount: f64,
    /// A free-text classification, e.g. "Food".
    pub category: String,
    /// When the expense was recorded.
    ///
    /// Only the persistent store records dates.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub date: Option<OffsetDateTime>,
}

/// The fields of an [Expense] that a client may set.
///
/// Use [ExpenseForm::validate](crate::expense::ExpenseForm::validate) to
/// create these from a request body.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseFields {
    /// A text description of what the money was spent on.
    pub description: String,
    /// The amount of money spent.
    pub amount: f64,
    /// A free-text classification, e.g. "Food".
    pub category: String,
}

impl ExpenseFields {
    /// Create the fields for an expense without validating them.
    pub fn new_unchecked(description: &str, amount: f64, category: &str) -> Self {
        Self {
            description: description.to_owned(),
            amount,
            category: category.to_owned(),
        }
    }

    /// Attach an ID to the fields to create an [Expense] without a date.
    pub fn into_expense(self, id: ExpenseId) -> Expense {
        Expense {
            id,
            description: self.description,
            amount: self.amount,
            category: self.category,
            date: None,
        }
    }
}

/// Sum the amounts of `expenses`.
pub fn total_amount(expenses: &[Expense]) -> f64 {
    expenses
        .iter()
        .fold(0.0, |total, expense| total + expense.amount)
}
