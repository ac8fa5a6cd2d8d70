//! In-memory keyed stores for contacts and notes.
//!
//! # Responsibility
//! - Own the record collections and their normalized lookup keys.
//! - Implement search and ranking over the collections.
//!
//! # Invariants
//! - Keys are always derived from the record, never supplied by callers.
//! - Iteration follows insertion order.

pub mod address_book;
pub mod notes;
