//! Todo record model.
//!
//! # Responsibility
//! - Define the persisted `{ id, text, completed }` record.
//! - Normalize user text before it can reach a record.
//!
//! # Invariants
//! - `id` is stable and never reused within one list.
//! - `text` is trimmed, non-empty and capped at `MAX_TEXT_CHARS` characters.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::num::ParseIntError;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// Maximum number of characters kept from user input.
pub const MAX_TEXT_CHARS: usize = 100;

/// Stable identifier of one todo record.
///
/// Ids are derived from the wall clock in epoch milliseconds and bumped past
/// the largest id already in use, so they are monotonic within a list unless
/// the id space above the largest id is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(i64);

impl TodoId {
    /// Wraps a raw id value, e.g. one received from a UI layer.
    pub const fn from_raw(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw id value.
    pub const fn as_raw(self) -> i64 {
        self.0
    }

    /// Returns a fresh id not present in `existing`.
    ///
    /// Normally strictly greater than every existing id. Once the largest id
    /// is `i64::MAX`, the lowest free id at or above the clock is used.
    pub fn next_after<'a>(existing: impl IntoIterator<Item = &'a TodoId>) -> Self {
        Self::next_with_clock(existing, now_epoch_ms())
    }

    fn next_with_clock<'a>(existing: impl IntoIterator<Item = &'a TodoId>, now_ms: i64) -> Self {
        let mut taken: Vec<i64> = existing.into_iter().map(|id| id.0).collect();
        taken.sort_unstable();
        match taken.last() {
            Some(&max) if max >= now_ms => match max.checked_add(1) {
                Some(next) => Self(next),
                None => Self(lowest_free_from(&taken, now_ms)),
            },
            _ => Self(now_ms),
        }
    }
}

/// First value `>= start` missing from the ascending, duplicate-free `taken`.
fn lowest_free_from(taken: &[i64], start: i64) -> i64 {
    let mut candidate = start;
    for &id in taken.iter().skip_while(|&&id| id < start) {
        if id != candidate {
            break;
        }
        candidate = candidate.saturating_add(1);
    }
    candidate
}

impl Display for TodoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TodoId {
    type Err = ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.trim().parse::<i64>().map(Self)
    }
}

/// Validation failure for user-entered todo text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoValidationError {
    /// Text is empty after truncation and trimming.
    EmptyText,
    /// Stored text is untrimmed or longer than `MAX_TEXT_CHARS`.
    NotNormalized,
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "todo text cannot be empty"),
            Self::NotNormalized => write!(
                f,
                "todo text must be trimmed and at most {MAX_TEXT_CHARS} characters"
            ),
        }
    }
}

impl Error for TodoValidationError {}

/// One task entry in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
}

impl Todo {
    /// Creates an open todo from raw user input.
    ///
    /// # Errors
    /// - Returns `EmptyText` when the normalized text is empty.
    pub fn new(id: TodoId, text: &str) -> Result<Self, TodoValidationError> {
        Ok(Self {
            id,
            text: normalize_text(text)?,
            completed: false,
        })
    }

    /// Checks the record invariants on data coming from outside the store.
    ///
    /// # Errors
    /// - `EmptyText` for blank text, `NotNormalized` for untrimmed or
    ///   over-long text.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        let normalized = normalize_text(&self.text)?;
        if normalized != self.text {
            return Err(TodoValidationError::NotNormalized);
        }
        Ok(())
    }
}

/// Truncates `raw` to `MAX_TEXT_CHARS` characters and trims it.
///
/// # Errors
/// - Returns `EmptyText` when nothing but whitespace remains.
pub fn normalize_text(raw: &str) -> Result<String, TodoValidationError> {
    let truncated = match raw.char_indices().nth(MAX_TEXT_CHARS) {
        Some((cut, _)) => &raw[..cut],
        None => raw,
    };
    let trimmed = truncated.trim();
    if trimmed.is_empty() {
        return Err(TodoValidationError::EmptyText);
    }
    Ok(trimmed.to_string())
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
