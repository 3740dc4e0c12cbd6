//! Implements an in-memory expense store.
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    Error,
    expense::{Expense, ExpenseFields, ExpenseStore},
};

#[derive(Debug)]
struct Expenses {
    records: Vec<Expense>,
    next_id: u64,
}

/// Stores expenses in process memory.
///
/// All data is lost when the process exits. IDs are assigned from a counter
/// that only ever increases, so deleted IDs are never handed out again.
#[derive(Debug, Clone)]
pub struct MemoryExpenseStore {
    expenses: Arc<Mutex<Expenses>>,
}

impl MemoryExpenseStore {
    /// Create an empty store whose first expense will have the ID "1".
    pub fn new() -> Self {
        Self {
            expenses: Arc::new(Mutex::new(Expenses {
                records: Vec::new(),
                next_id: 1,
            })),
        }
    }

    /// Create a store containing three example expenses with the IDs "1" to "3".
    pub fn with_seed_data() -> Self {
        let records = vec![
            ExpenseFields::new_unchecked("Groceries", 50.50, "Food").into_expense("1".to_owned()),
            ExpenseFields::new_unchecked("Gas", 40.00, "Transportation")
                .into_expense("2".to_owned()),
            ExpenseFields::new_unchecked("Movie tickets", 30.00, "Entertainment")
                .into_expense("3".to_owned()),
        ];

        Self {
            expenses: Arc::new(Mutex::new(Expenses {
                next_id: records.len() as u64 + 1,
                records,
            })),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Expenses>, Error> {
        self.expenses.lock().map_err(|error| {
            tracing::error!("could not acquire the in-memory store lock: {error}");
            Error::DatabaseLockError
        })
    }
}

impl Default for MemoryExpenseStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseStore for MemoryExpenseStore {
    fn list(&self) -> Result<Vec<Expense>, Error> {
        Ok(self.lock()?.records.clone())
    }

    fn get(&self, id: &str) -> Result<Expense, Error> {
        self.lock()?
            .records
            .iter()
            .find(|expense| expense.id == id)
            .cloned()
            .ok_or(Error::NotFound)
    }

    fn create(&self, fields: ExpenseFields) -> Result<Expense, Error> {
        let mut expenses = self.lock()?;

        let expense = fields.into_expense(expenses.next_id.to_string());
        expenses.next_id += 1;
        expenses.records.push(expense.clone());

        Ok(expense)
    }

    fn update(&self, id: &str, fields: ExpenseFields) -> Result<Expense, Error> {
        let mut expenses = self.lock()?;

        let expense = expenses
            .records
            .iter_mut()
            .find(|expense| expense.id == id)
            .ok_or(Error::NotFound)?;
        *expense = fields.into_expense(id.to_owned());

        Ok(expense.clone())
    }

    fn delete(&self, id: &str) -> Result<(), Error> {
        let mut expenses = self.lock()?;

        let index = expenses
            .records
            .iter()
            .position(|expense| expense.id == id)
            .ok_or(Error::NotFound)?;
        expenses.records.remove(index);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::expense::{ExpenseFields, ExpenseStore, store::contract};

    use super::MemoryExpenseStore;

    #[test]
    fn created_ids_are_unique() {
        contract::created_ids_are_unique(MemoryExpenseStore::new());
    }

    #[test]
    fn get_returns_created_expense() {
        contract::get_returns_created_expense(MemoryExpenseStore::new());
    }

    #[test]
    fn get_missing_is_not_found() {
        contract::get_missing_is_not_found(MemoryExpenseStore::new());
    }

    #[test]
    fn update_replaces_all_fields() {
        contract::update_replaces_all_fields(MemoryExpenseStore::new());
    }

    #[test]
    fn update_missing_is_not_found() {
        contract::update_missing_is_not_found(MemoryExpenseStore::new());
    }

    #[test]
    fn delete_is_terminal() {
        contract::delete_is_terminal(MemoryExpenseStore::new());
    }

    #[test]
    fn list_is_in_creation_order() {
        contract::list_is_in_creation_order(MemoryExpenseStore::new());
    }

    #[test]
    fn clones_share_state() {
        contract::clones_share_state(MemoryExpenseStore::new());
    }

    #[test]
    fn ids_are_sequential() {
        let store = MemoryExpenseStore::new();

        let first = store
            .create(ExpenseFields::new_unchecked("Coffee", 4.5, "Food"))
            .unwrap();
        let second = store
            .create(ExpenseFields::new_unchecked("Tea", 3.0, "Food"))
            .unwrap();

        assert_eq!(first.id, "1");
        assert_eq!(second.id, "2");
        assert_eq!(first.date, None);
    }

    #[test]
    fn seed_data_is_listed() {
        let store = MemoryExpenseStore::with_seed_data();

        let got = store
            .list()
            .unwrap()
            .into_iter()
            .map(|expense| (expense.id, expense.description, expense.amount, expense.category))
            .collect::<Vec<_>>();

        assert_eq!(
            got,
            vec![
                ("1".to_owned(), "Groceries".to_owned(), 50.50, "Food".to_owned()),
                ("2".to_owned(), "Gas".to_owned(), 40.00, "Transportation".to_owned()),
                (
                    "3".to_owned(),
                    "Movie tickets".to_owned(),
                    30.00,
                    "Entertainment".to_owned()
                ),
            ]
        );
    }

    #[test]
    fn create_after_seed_data_uses_next_id() {
        let store = MemoryExpenseStore::with_seed_data();

        let expense = store
            .create(ExpenseFields::new_unchecked("Coffee", 4.5, "Food"))
            .unwrap();

        assert_eq!(expense.id, "4");
    }
}
