//! Application-level error taxonomy.
//!
//! # Responsibility
//! - Give every recoverable failure a human-readable message for display.
//! - Keep field validation, lookup, duplicate, cancel and storage failures
//!   distinguishable for callers.
//!
//! # Invariants
//! - No variant is fatal; the command loop reports it and continues.

use crate::model::field::FieldError;
use crate::repo::snapshot_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AppResult<T> = Result<T, AppError>;

/// Record collection an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Contact,
    Note,
}

impl RecordKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Contact => "Contact",
            Self::Note => "Note",
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    /// One field failed validation.
    Validation(FieldError),
    NotFound { kind: RecordKind, key: String },
    AlreadyExists { kind: RecordKind, key: String },
    /// Command arguments could not be interpreted.
    InvalidInput(String),
    /// The user aborted an interactive flow.
    Cancelled,
    Storage(RepoError),
}

impl AppError {
    pub fn not_found(kind: RecordKind, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub fn already_exists(kind: RecordKind, key: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind,
            key: key.into(),
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { kind, key } => write!(f, "{} '{key}' not found.", kind.label()),
            Self::AlreadyExists { kind, key } => {
                write!(f, "{} '{key}' already exists.", kind.label())
            }
            Self::InvalidInput(message) => write!(f, "{message}"),
            Self::Cancelled => write!(f, "Command cancelled."),
            Self::Storage(err) => write!(f, "storage error: {err}"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FieldError> for AppError {
    fn from(value: FieldError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for AppError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}
