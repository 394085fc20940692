//! Domain model for the todo list.
//!
//! # Responsibility
//! - Define the canonical todo record and its text normalization rules.
//! - Define the display filter shared by store, FFI and CLI callers.
//!
//! # Invariants
//! - Every todo is identified by a `TodoId` unique within its list.
//! - Stored text is trimmed, non-empty and at most `MAX_TEXT_CHARS` long.

pub mod filter;
pub mod todo;
