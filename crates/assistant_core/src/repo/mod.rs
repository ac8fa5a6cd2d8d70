//! Repository layer for session persistence.
//!
//! # Responsibility
//! - Define the snapshot storage contract used by the command loop.
//! - Isolate SQLite and JSON encoding details from the stores.

pub mod snapshot_repo;
