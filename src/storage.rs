//! Chooses between persistent and in-memory storage when the server starts.
//!
//! The choice is made exactly once. If the database can be opened, every
//! request uses it for the lifetime of the process. Otherwise the server keeps
//! its expenses in memory until it exits.

use std::{
    fmt::Display,
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};

use rusqlite::Connection;

use crate::{
    Error,
    config::StorageConfig,
    expense::{
        Expense, ExpenseFields, ExpenseStore, MemoryExpenseStore, SQLiteExpenseStore,
        create_expense_table,
    },
};

/// Which kind of store the server is using.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    /// Expenses are kept in memory and lost on restart.
    Transient,
    /// Expenses are saved to the database.
    Persistent,
}

impl StorageMode {
    /// The lowercase name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageMode::Transient => "transient",
            StorageMode::Persistent => "persistent",
        }
    }
}

impl Display for StorageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The store chosen for the lifetime of the process.
#[derive(Debug, Clone)]
pub enum Storage {
    /// In-memory storage, used when the database is unavailable.
    Transient(MemoryExpenseStore),
    /// Database backed storage.
    Persistent(SQLiteExpenseStore),
}

impl Storage {
    /// Try once to open the database described by `config`.
    ///
    /// Returns [Storage::Persistent] if the database was opened and its schema
    /// initialized within `config.connect_timeout`. Otherwise the failure is
    /// logged and [Storage::Transient] is returned, seeded with example expenses.
    pub async fn connect(config: &StorageConfig) -> Self {
        match open_database(config).await {
            Ok(connection) => {
                tracing::info!("Connected to database at {:?}", config.database_path);
                Storage::Persistent(SQLiteExpenseStore::new(Arc::new(Mutex::new(connection))))
            }
            Err(error) => {
                tracing::warn!("Failed to connect to database, using in-memory storage: {error}");
                tracing::warn!("Using in-memory storage. Data will be lost when server restarts.");
                Storage::Transient(MemoryExpenseStore::with_seed_data())
            }
        }
    }

    /// Which kind of store is in use.
    pub fn mode(&self) -> StorageMode {
        match self {
            Storage::Transient(_) => StorageMode::Transient,
            Storage::Persistent(_) => StorageMode::Persistent,
        }
    }
}

impl ExpenseStore for Storage {
    fn list(&self) -> Result<Vec<Expense>, Error> {
        match self {
            Storage::Transient(store) => store.list(),
            Storage::Persistent(store) => store.list(),
        }
    }

    fn get(&self, id: &str) -> Result<Expense, Error> {
        match self {
            Storage::Transient(store) => store.get(id),
            Storage::Persistent(store) => store.get(id),
        }
    }

    fn create(&self, fields: ExpenseFields) -> Result<Expense, Error> {
        match self {
            Storage::Transient(store) => store.create(fields),
            Storage::Persistent(store) => store.create(fields),
        }
    }

    fn update(&self, id: &str, fields: ExpenseFields) -> Result<Expense, Error> {
        match self {
            Storage::Transient(store) => store.update(id, fields),
            Storage::Persistent(store) => store.update(id, fields),
        }
    }

    fn delete(&self, id: &str) -> Result<(), Error> {
        match self {
            Storage::Transient(store) => store.delete(id),
            Storage::Persistent(store) => store.delete(id),
        }
    }
}

async fn open_database(config: &StorageConfig) -> Result<Connection, Error> {
    let database_path = config.database_path.clone();
    let busy_timeout = config.connect_timeout;
    let attempt =
        tokio::task::spawn_blocking(move || open_and_initialize(&database_path, busy_timeout));

    match tokio::time::timeout(config.connect_timeout, attempt).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(Error::StorageUnavailable(join_error.to_string())),
        Err(_) => Err(Error::StorageUnavailable(format!(
            "timed out after {:?}",
            config.connect_timeout
        ))),
    }
}

fn open_and_initialize(database_path: &Path, busy_timeout: Duration) -> Result<Connection, Error> {
    let unavailable = |error: rusqlite::Error| Error::StorageUnavailable(error.to_string());

    let connection = Connection::open(database_path).map_err(unavailable)?;
    connection.busy_timeout(busy_timeout).map_err(unavailable)?;
    create_expense_table(&connection).map_err(unavailable)?;

    Ok(connection)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::{
        config::StorageConfig,
        expense::{ExpenseFields, ExpenseStore},
    };

    use super::{Storage, StorageMode};

    #[tokio::test]
    async fn reachable_database_is_persistent() {
        let storage =
            Storage::connect(&StorageConfig::new(":memory:", Duration::from_secs(5))).await;

        assert_eq!(storage.mode(), StorageMode::Persistent);
        assert_eq!(storage.list(), Ok(vec![]));
    }

    #[tokio::test]
    async fn unreachable_database_falls_back_to_seeded_memory() {
        let storage = Storage::connect(&StorageConfig::new(
            "/this/directory/does/not/exist/expenses.db",
            Duration::from_secs(5),
        ))
        .await;

        assert_eq!(storage.mode(), StorageMode::Transient);
        let descriptions = storage
            .list()
            .unwrap()
            .into_iter()
            .map(|expense| expense.description)
            .collect::<Vec<_>>();
        assert_eq!(descriptions, vec!["Groceries", "Gas", "Movie tickets"]);

        let expense = storage
            .create(ExpenseFields::new_unchecked("Coffee", 4.5, "Food"))
            .unwrap();
        assert_eq!(expense.id, "4");
    }

    #[test]
    fn mode_names() {
        assert_eq!(StorageMode::Transient.to_string(), "transient");
        assert_eq!(StorageMode::Persistent.to_string(), "persistent");
    }
}
