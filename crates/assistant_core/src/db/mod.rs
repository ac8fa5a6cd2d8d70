//! SQLite file holding named store snapshots.
//!
//! # Invariants
//! - An opened connection always has a usable `snapshots` table.
//! - A file whose `snapshots` table lacks a required column is refused
//!   instead of being altered.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::SNAPSHOT_COLUMNS;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// The database file could not be opened at all.
    Open {
        location: String,
        source: rusqlite::Error,
    },
    /// An existing `snapshots` table was created by something else.
    IncompatibleSnapshotTable { missing: Vec<&'static str> },
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { location, source } => {
                write!(f, "cannot open snapshot database {location}: {source}")
            }
            Self::IncompatibleSnapshotTable { missing } => write!(
                f,
                "table `snapshots` is missing column(s): {}",
                missing.join(", ")
            ),
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::IncompatibleSnapshotTable { .. } => None,
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
