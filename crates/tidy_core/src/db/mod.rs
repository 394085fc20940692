//! SQLite storage for the persistence slot table.
//!
//! # Responsibility
//! - Open connections backing `SqliteSlot` and migrate them to the slot schema.
//! - Refuse databases whose schema the slot code cannot read or write.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - A connection is handed out only after the `slots` table is confirmed.

use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

/// Table holding one row per slot key.
pub const SLOT_TABLE: &str = "slots";

pub type DbResult<T> = Result<T, DbError>;

/// Failure to open a slot database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// Written by a newer build; opening it could drop unknown columns.
    UnsupportedSchemaVersion { db_version: u32, latest_supported: u32 },
    /// `user_version` claims a migrated schema but the slot table is absent.
    MissingSlotTable { db_version: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "slot database error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "slot database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::MissingSlotTable { db_version } => write!(
                f,
                "slot database at schema version {db_version} has no `{SLOT_TABLE}` table"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        if let Self::Sqlite(err) = self {
            Some(err)
        } else {
            None
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Checks that the migrated connection carries the slot table.
pub(crate) fn ensure_slot_table(conn: &Connection, db_version: u32) -> DbResult<()> {
    let present: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [SLOT_TABLE],
        |row| row.get(0),
    )?;
    if present {
        Ok(())
    } else {
        Err(DbError::MissingSlotTable { db_version })
    }
}
