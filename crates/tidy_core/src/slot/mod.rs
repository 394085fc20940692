//! Persistence slot abstraction.
//!
//! # Responsibility
//! - Model the platform key-value store as an opaque string get/set port.
//! - Provide an in-process implementation for tests and embedders.
//!
//! # Invariants
//! - A `write` fully overwrites the previous value under the same key.
//! - Slots know nothing about todo records; values are opaque strings.

use crate::db::DbError;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex};

mod sqlite_slot;

pub use sqlite_slot::SqliteSlot;

pub type SlotResult<T> = Result<T, SlotError>;

/// Failure of the underlying key-value store.
#[derive(Debug)]
pub enum SlotError {
    Db(DbError),
    Unavailable(String),
}

impl Display for SlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "persistence slot unavailable: {message}"),
        }
    }
}

impl Error for SlotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for SlotError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SlotError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// String-keyed read/write port over persistent storage.
pub trait PersistenceSlot {
    /// Returns the stored value, or `None` when the key was never written.
    fn read(&self, key: &str) -> SlotResult<Option<String>>;
    /// Stores `value` under `key`, replacing any prior value.
    fn write(&self, key: &str, value: &str) -> SlotResult<()>;
}

impl<S: PersistenceSlot + ?Sized> PersistenceSlot for &S {
    fn read(&self, key: &str) -> SlotResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> SlotResult<()> {
        (**self).write(key, value)
    }
}

/// In-process slot. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a slot pre-seeded with one value.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let slot = Self::new();
        if let Ok(mut values) = slot.values.lock() {
            values.insert(key.into(), value.into());
        }
        slot
    }
}

impl PersistenceSlot for MemorySlot {
    fn read(&self, key: &str) -> SlotResult<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| SlotError::Unavailable("memory slot lock poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> SlotResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| SlotError::Unavailable("memory slot lock poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemorySlot, PersistenceSlot};

    #[test]
    fn memory_slot_reads_absent_key_as_none() {
        let slot = MemorySlot::new();
        assert_eq!(slot.read("todos").unwrap(), None);
    }

    #[test]
    fn memory_slot_clones_share_storage_and_overwrite() {
        let slot = MemorySlot::new();
        let observer = slot.clone();

        slot.write("todos", "[]").unwrap();
        slot.write("todos", "[1]").unwrap();

        assert_eq!(observer.read("todos").unwrap().as_deref(), Some("[1]"));
    }
}
