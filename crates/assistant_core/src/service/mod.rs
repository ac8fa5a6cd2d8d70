//! Core use-case services.
//!
//! # Responsibility
//! - Turn interactive command input into store mutations.
//! - Keep the CLI layer free of record invariants.

pub mod contact_service;
pub mod note_service;
