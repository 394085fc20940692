//! Wire format for a persisted todo list.
//!
//! The list is stored as a JSON array of `{ "id", "text", "completed" }`
//! objects in list order.

use crate::model::todo::{Todo, TodoValidationError};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure to encode or decode a persisted list.
#[derive(Debug)]
pub enum CodecError {
    Json(serde_json::Error),
    InvalidRecord {
        index: usize,
        reason: String,
    },
}

impl CodecError {
    /// Index of the offending record, when the array itself parsed.
    pub fn record_index(&self) -> Option<usize> {
        match self {
            Self::Json(_) => None,
            Self::InvalidRecord { index, .. } => Some(*index),
        }
    }
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed todo list payload: {err}"),
            Self::InvalidRecord { index, reason } => {
                write!(f, "invalid todo record at index {index}: {reason}")
            }
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::InvalidRecord { .. } => None,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Serializes `todos` preserving order.
pub fn encode_todos(todos: &[Todo]) -> Result<String, CodecError> {
    Ok(serde_json::to_string(todos)?)
}

/// Parses a payload produced by `encode_todos`.
///
/// # Errors
/// - `Json` when the payload is not an array of todo objects.
/// - `InvalidRecord` when a record breaks text rules or repeats an id.
pub fn decode_todos(payload: &str) -> Result<Vec<Todo>, CodecError> {
    let todos: Vec<Todo> = serde_json::from_str(payload)?;

    let mut seen = HashSet::with_capacity(todos.len());
    for (index, todo) in todos.iter().enumerate() {
        todo.validate()
            .map_err(|err: TodoValidationError| CodecError::InvalidRecord {
                index,
                reason: err.to_string(),
            })?;
        if !seen.insert(todo.id) {
            return Err(CodecError::InvalidRecord {
                index,
                reason: format!("duplicate id {}", todo.id),
            });
        }
    }

    Ok(todos)
}
