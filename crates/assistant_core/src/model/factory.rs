//! Bulk field construction from free-form user input.
//!
//! # Invariants
//! - Items are separated by `,` or newline, trimmed, and empty items skipped.
//! - One bad item never aborts the batch; its message is collected instead.
//! - Output order follows input order for both successes and errors.

use crate::model::field::{Email, FieldError, Phone};
use std::str::FromStr;

/// Outcome of one bulk parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFields<T> {
    /// Successfully constructed fields, in input order.
    pub items: Vec<T>,
    /// Display messages of rejected items, in input order.
    pub errors: Vec<String>,
}

impl<T> ParsedFields<T> {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Builds a list of fields of one kind from delimited text.
pub trait FieldFactory {
    type Field: FromStr<Err = FieldError>;

    fn create(line: &str) -> ParsedFields<Self::Field> {
        let mut parsed = ParsedFields {
            items: Vec::new(),
            errors: Vec::new(),
        };
        for item in split_items(line) {
            match item.parse::<Self::Field>() {
                Ok(field) => parsed.items.push(field),
                Err(err) => parsed.errors.push(err.to_string()),
            }
        }
        parsed
    }
}

pub struct PhoneFactory;

impl FieldFactory for PhoneFactory {
    type Field = Phone;
}

pub struct EmailFactory;

impl FieldFactory for EmailFactory {
    type Field = Email;
}

fn split_items(line: &str) -> impl Iterator<Item = &str> {
    line.split([',', '\n'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
}
