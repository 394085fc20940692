//! Core use-case services.
//!
//! # Responsibility
//! - Own the in-memory todo list and its transient UI state.
//! - Keep UI/FFI layers decoupled from persistence details.

pub mod event;
pub mod todo_store;
