//! Validation of the JSON bodies used to create and update expenses.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    expense::{Expense, ExpenseFields},
};

/// The message sent to the client when a required field is missing.
pub const MISSING_FIELDS: &str = "Description, amount, and category are required";

/// The message sent to the client when the amount is not a number.
pub const AMOUNT_NOT_A_NUMBER: &str = "Amount must be a number";

/// An amount as sent by a client.
///
/// Browsers may send the raw text of a number input, so both JSON numbers and
/// strings are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// A JSON number, e.g. `4.5`.
    Number(f64),
    /// A JSON string, e.g. `"4.5"`.
    Text(String),
}

impl AmountInput {
    /// Whether the client provided a meaningful value.
    ///
    /// Zero, non-finite numbers and empty strings do not count as a value.
    fn is_present(&self) -> bool {
        match self {
            AmountInput::Number(number) => *number != 0.0 && number.is_finite(),
            AmountInput::Text(text) => !text.is_empty(),
        }
    }

    fn to_f64(&self) -> Result<f64, Error> {
        match self {
            AmountInput::Number(number) => Ok(*number),
            AmountInput::Text(text) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
                .ok_or_else(|| Error::InvalidExpense(AMOUNT_NOT_A_NUMBER.to_owned())),
        }
    }
}

/// The request body for creating or updating an expense.
///
/// Every field is optional so that missing fields can be reported with a
/// helpful message instead of a deserialization error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseForm {
    /// A text description of what the money was spent on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The amount of money spent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<AmountInput>,
    /// A free-text classification, e.g. "Food".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ExpenseForm {
    /// Create a form with all fields set.
    pub fn new(description: &str, amount: f64, category: &str) -> Self {
        Self {
            description: Some(description.to_owned()),
            amount: Some(AmountInput::Number(amount)),
            category: Some(category.to_owned()),
        }
    }

    /// Check that all fields are present and convert the amount to a number.
    ///
    /// # Errors
    /// Returns [Error::InvalidExpense] if:
    /// - any field is missing or empty, or the amount is zero,
    /// - or the amount is a string that cannot be parsed as a number.
    pub fn validate(self) -> Result<ExpenseFields, Error> {
        let missing_fields = || Error::InvalidExpense(MISSING_FIELDS.to_owned());

        let description = self
            .description
            .filter(|description| !description.is_empty())
            .ok_or_else(missing_fields)?;
        let amount = self
            .amount
            .filter(AmountInput::is_present)
            .ok_or_else(missing_fields)?;
        let category = self
            .category
            .filter(|category| !category.is_empty())
            .ok_or_else(missing_fields)?;

        Ok(ExpenseFields {
            description,
            amount: amount.to_f64()?,
            category,
        })
    }
}

impl From<&Expense> for ExpenseForm {
    fn from(expense: &Expense) -> Self {
        Self::new(&expense.description, expense.amount, &expense.category)
    }
}
