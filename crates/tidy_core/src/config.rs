//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve database location, slot key and logging settings for hosts
//!   (CLI, FFI) from `TIDY_*` variables with stable defaults.
//!
//! # Invariants
//! - Resolution never fails; blank variables fall back to defaults.
//! - Logging stays disabled unless `TIDY_LOG_DIR` is set.

use crate::db::DbResult;
use crate::logging::{default_log_level, init_logging, LoggingError};
use crate::repo::todo_repo::{SlotTodoRepository, DEFAULT_SLOT_KEY};
use crate::service::todo_store::TodoStore;
use crate::slot::SqliteSlot;
use std::path::PathBuf;

/// Store persisted in a SQLite slot table.
pub type SqliteTodoStore = TodoStore<SlotTodoRepository<SqliteSlot>>;

pub const DB_PATH_ENV: &str = "TIDY_DB_PATH";
pub const SLOT_KEY_ENV: &str = "TIDY_SLOT_KEY";
pub const LOG_LEVEL_ENV: &str = "TIDY_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "TIDY_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "tidy.sqlite3";

/// Host configuration for opening a persistent store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TidyConfig {
    /// SQLite file holding the persistence slot table.
    pub db_path: PathBuf,
    /// Slot key the todo list is stored under.
    pub slot_key: String,
    pub log_level: String,
    /// Absolute log directory; `None` keeps logging off.
    pub log_dir: Option<String>,
}

impl Default for TidyConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            slot_key: DEFAULT_SLOT_KEY.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl TidyConfig {
    /// Reads `TIDY_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        Self {
            db_path: read(DB_PATH_ENV).map_or(defaults.db_path, PathBuf::from),
            slot_key: read(SLOT_KEY_ENV).unwrap_or(defaults.slot_key),
            log_level: read(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            log_dir: read(LOG_DIR_ENV),
        }
    }

    /// Starts logging when a log directory is configured.
    ///
    /// Returns `Ok(false)` when logging is disabled by configuration.
    ///
    /// # Errors
    /// - Propagates `init_logging` failures.
    pub fn init_logging(&self) -> Result<bool, LoggingError> {
        match &self.log_dir {
            Some(dir) => init_logging(&self.log_level, dir).map(|()| true),
            None => Ok(false),
        }
    }

    /// Opens the SQLite database at `db_path` and loads the list under
    /// `slot_key`.
    ///
    /// # Errors
    /// - Returns `DbError` when the database cannot be opened or migrated.
    ///   Unreadable list content is not an error; the store starts empty.
    pub fn open_store(&self) -> DbResult<SqliteTodoStore> {
        let slot = SqliteSlot::open(&self.db_path)?;
        Ok(TodoStore::open(SlotTodoRepository::with_key(
            slot,
            self.slot_key.clone(),
        )))
    }
}
