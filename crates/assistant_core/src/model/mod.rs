//! Domain model for contacts and notes.
//!
//! # Responsibility
//! - Define validated field types and the records built from them.
//! - Keep normalization rules next to the values they apply to.
//!
//! # Invariants
//! - Records only hold normalized field values.
//! - Derived data (note tags) is recomputed, never assigned.

pub mod contact;
pub mod factory;
pub mod field;
pub mod note;
pub mod unique_list;
