//! Repository layer for the persisted todo list.
//!
//! # Responsibility
//! - Define the `load`/`save` port consumed by the store.
//! - Keep the wire format and slot details out of store logic.
//!
//! # Invariants
//! - Decoded lists always satisfy record invariants (`Todo::validate`) and
//!   have unique ids; anything else is reported as a codec error.

pub mod codec;
pub mod todo_repo;
