//! Flutter-facing bindings for the Tidy core.

pub mod api;
