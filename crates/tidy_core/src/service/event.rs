//! Named interaction events consumed by the store.
//!
//! Presentation layers translate raw UI input into these events and feed
//! them to `TodoStore::dispatch`.

use crate::model::filter::Filter;
use crate::model::todo::{TodoId, TodoValidationError};

/// One user interaction, in the vocabulary of the list UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoEvent {
    SubmitNewText(String),
    Toggle(TodoId),
    Delete(TodoId),
    StartEdit(TodoId),
    ChangeDraft(String),
    CommitEdit,
    CancelEdit,
    ClearCompleted,
    SelectFilter(Filter),
    /// Index into the currently visible ordering.
    DragStart(usize),
    /// Index into the currently visible ordering.
    DragEnter(usize),
    DragEnd,
}

/// Result of dispatching one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// A new record was appended.
    Added(TodoId),
    /// Store state (list, filter, edit or drag gesture) changed.
    Applied,
    /// The event had no effect: unknown id, no active gesture, same index.
    Ignored,
    /// Input failed validation; nothing changed.
    Rejected(TodoValidationError),
}

impl EventOutcome {
    pub(crate) fn from_flag(applied: bool) -> Self {
        if applied {
            Self::Applied
        } else {
            Self::Ignored
        }
    }
}
