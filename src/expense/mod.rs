//! Expenses: the data model, the stores that hold them and the REST API.

mod core;
mod endpoints;
pub(crate) mod form;
mod memory;
mod sqlite;
pub(crate) mod store;

pub use core::{Expense, ExpenseFields, ExpenseId, total_amount};
pub use endpoints::{
    ExpenseState, STORAGE_MODE_HEADER, create_expense_endpoint, delete_expense_endpoint,
    get_expense_endpoint, list_expenses_endpoint, update_expense_endpoint,
};
pub use form::{AMOUNT_NOT_A_NUMBER, AmountInput, ExpenseForm, MISSING_FIELDS};
pub use memory::MemoryExpenseStore;
pub use sqlite::{SQLiteExpenseStore, create_expense_table, map_row_to_expense};
pub use store::ExpenseStore;
