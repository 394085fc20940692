//! Todo list repository port and slot-backed implementation.
//!
//! # Responsibility
//! - Give the store a `load`/`save` port instead of ambient global storage.
//! - Map the list to and from a single persistence slot value.
//!
//! # Invariants
//! - `save` writes the whole list; the last write wins.
//! - `load` of an absent key yields an empty list.

use crate::model::todo::Todo;
use crate::repo::codec::{decode_todos, encode_todos, CodecError};
use crate::slot::{PersistenceSlot, SlotError};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot key used when callers do not configure one.
pub const DEFAULT_SLOT_KEY: &str = "todos";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository failure while loading or saving the list.
#[derive(Debug)]
pub enum RepoError {
    Slot(SlotError),
    Codec(CodecError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Slot(err) => write!(f, "{err}"),
            Self::Codec(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Slot(err) => Some(err),
            Self::Codec(err) => Some(err),
        }
    }
}

impl From<SlotError> for RepoError {
    fn from(value: SlotError) -> Self {
        Self::Slot(value)
    }
}

impl From<CodecError> for RepoError {
    fn from(value: CodecError) -> Self {
        Self::Codec(value)
    }
}

/// Persistence port for the whole todo list.
pub trait TodoListRepository {
    fn load(&self) -> RepoResult<Vec<Todo>>;
    fn save(&self, todos: &[Todo]) -> RepoResult<()>;
}

/// Repository storing the encoded list under one slot key.
#[derive(Debug, Clone)]
pub struct SlotTodoRepository<S: PersistenceSlot> {
    slot: S,
    key: String,
}

impl<S: PersistenceSlot> SlotTodoRepository<S> {
    /// Creates a repository bound to `DEFAULT_SLOT_KEY`.
    pub fn new(slot: S) -> Self {
        Self::with_key(slot, DEFAULT_SLOT_KEY)
    }

    pub fn with_key(slot: S, key: impl Into<String>) -> Self {
        Self {
            slot,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }
}

impl<S: PersistenceSlot> TodoListRepository for SlotTodoRepository<S> {
    fn load(&self) -> RepoResult<Vec<Todo>> {
        let Some(payload) = self.slot.read(&self.key)? else {
            return Ok(Vec::new());
        };
        decode_todos(&payload).map_err(|err| {
            warn!(
                "event=todo_decode module=repo status=error key={} payload_bytes={} record_index={}",
                self.key,
                payload.len(),
                err.record_index()
                    .map_or_else(|| "none".to_string(), |index| index.to_string())
            );
            RepoError::Codec(err)
        })
    }

    fn save(&self, todos: &[Todo]) -> RepoResult<()> {
        let payload = encode_todos(todos)?;
        self.slot.write(&self.key, &payload)?;
        Ok(())
    }
}

impl<R: TodoListRepository + ?Sized> TodoListRepository for &R {
    fn load(&self) -> RepoResult<Vec<Todo>> {
        (**self).load()
    }

    fn save(&self, todos: &[Todo]) -> RepoResult<()> {
        (**self).save(todos)
    }
}
