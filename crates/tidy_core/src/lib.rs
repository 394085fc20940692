//! Core domain logic for Tidy, a single-user todo list.
//! This crate is the single source of truth for list invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod slot;

pub use config::{SqliteTodoStore, TidyConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::filter::{Filter, UnknownFilter};
pub use model::todo::{normalize_text, Todo, TodoId, TodoValidationError, MAX_TEXT_CHARS};
pub use repo::codec::{decode_todos, encode_todos, CodecError};
pub use repo::todo_repo::{
    RepoError, RepoResult, SlotTodoRepository, TodoListRepository, DEFAULT_SLOT_KEY,
};
pub use service::event::{EventOutcome, TodoEvent};
pub use service::todo_store::{EditOutcome, EditingState, TodoStore};
pub use slot::{MemorySlot, PersistenceSlot, SlotError, SlotResult, SqliteSlot};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
