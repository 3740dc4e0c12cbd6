//! Implements a struct that holds the state of the REST server.

use std::path::PathBuf;

use crate::{config::DEFAULT_STATIC_DIR, storage::Storage};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The store chosen when the server started.
    pub storage: Storage,

    /// The directory to serve static files, such as the client, from.
    pub static_dir: PathBuf,
}

impl AppState {
    /// Create a new [AppState] that serves static files from [DEFAULT_STATIC_DIR].
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }

    /// Serve static files from `static_dir` instead of the default directory.
    pub fn with_static_dir(mut self, static_dir: impl Into<PathBuf>) -> Self {
        self.static_dir = static_dir.into();
        self
    }
}
