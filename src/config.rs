//! Default server settings and the settings for connecting to the database.

use std::{path::PathBuf, time::Duration};

/// The port the server listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 8000;

/// The path of the SQLite database used for persistent storage.
pub const DEFAULT_DATABASE_PATH: &str = "expenses.db";

/// How long to wait for the database before falling back to in-memory storage.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// The directory static files, such as the client's `index.html`, are served from.
pub const DEFAULT_STATIC_DIR: &str = "public";

/// The settings for the one-off attempt to connect to the persistent store.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageConfig {
    /// The file path of the SQLite database, or `:memory:`.
    pub database_path: PathBuf,
    /// The maximum time allowed for opening and initializing the database.
    pub connect_timeout: Duration,
}

impl StorageConfig {
    /// Create a config for the database at `database_path`.
    pub fn new(database_path: impl Into<PathBuf>, connect_timeout: Duration) -> Self {
        Self {
            database_path: database_path.into(),
            connect_timeout,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE_PATH, DEFAULT_CONNECT_TIMEOUT)
    }
}
