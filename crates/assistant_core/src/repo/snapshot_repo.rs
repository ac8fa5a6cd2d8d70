//! Snapshot repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist whole stores as named JSON snapshots.
//! - Report a missing snapshot as `None` rather than as an error.
//!
//! # Invariants
//! - `save` replaces the full payload for a name in one statement.
//! - `load` runs field validation again through `Deserialize`.
//! - Logs carry snapshot names and sizes only, never record content.

use crate::db::DbError;
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Snapshot name of the address book.
pub const ADDRESS_BOOK_SNAPSHOT: &str = "address_book";
/// Snapshot name of the notes store.
pub const NOTES_SNAPSHOT: &str = "notes";

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// The connection was not migrated.
    MissingRequiredTable(&'static str),
    Encode {
        name: String,
        source: serde_json::Error,
    },
    Decode {
        name: String,
        source: serde_json::Error,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::Encode { name, source } => {
                write!(f, "failed to encode snapshot `{name}`: {source}")
            }
            Self::Decode { name, source } => {
                write!(f, "failed to decode snapshot `{name}`: {source}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::MissingRequiredTable(_) => None,
            Self::Encode { source, .. } | Self::Decode { source, .. } => Some(source),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Named whole-value snapshot storage.
pub trait SnapshotRepository {
    /// Loads the snapshot stored under `name`, or `None` when there is none.
    fn load<T: DeserializeOwned>(&self, name: &str) -> RepoResult<Option<T>>;
    /// Replaces the snapshot stored under `name`.
    fn save<T: Serialize>(&self, name: &str, value: &T) -> RepoResult<()>;

    /// Loads a snapshot, treating a missing one as a fresh default value.
    fn load_or_default<T: DeserializeOwned + Default>(&self, name: &str) -> RepoResult<T> {
        Ok(self.load(name)?.unwrap_or_default())
    }
}

/// SQLite-backed snapshot repository.
pub struct SqliteSnapshotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSnapshotRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` when `snapshots` does not exist.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = 'snapshots'
            );",
            [],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable("snapshots"));
        }
        Ok(Self { conn })
    }
}

impl SnapshotRepository for SqliteSnapshotRepository<'_> {
    fn load<T: DeserializeOwned>(&self, name: &str) -> RepoResult<Option<T>> {
        let started_at = Instant::now();
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM snapshots WHERE name = ?1;",
                [name],
                |row| row.get(0),
            )
            .optional()?;

        let Some(payload) = payload else {
            info!("event=snapshot_load module=repo status=missing name={name}");
            return Ok(None);
        };

        match serde_json::from_str(&payload) {
            Ok(value) => {
                info!(
                    "event=snapshot_load module=repo status=ok name={name} bytes={} duration_ms={}",
                    payload.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(Some(value))
            }
            Err(source) => {
                error!(
                    "event=snapshot_load module=repo status=error name={name} error_code=decode_failed"
                );
                Err(RepoError::Decode {
                    name: name.to_string(),
                    source,
                })
            }
        }
    }

    fn save<T: Serialize>(&self, name: &str, value: &T) -> RepoResult<()> {
        let started_at = Instant::now();
        let payload = serde_json::to_string(value).map_err(|source| RepoError::Encode {
            name: name.to_string(),
            source,
        })?;

        self.conn.execute(
            "INSERT INTO snapshots (name, payload, saved_at)
             VALUES (?1, ?2, CAST(strftime('%s', 'now') AS INTEGER) * 1000)
             ON CONFLICT(name) DO UPDATE SET
                payload = excluded.payload,
                saved_at = excluded.saved_at;",
            params![name, payload],
        )?;

        info!(
            "event=snapshot_save module=repo status=ok name={name} bytes={} duration_ms={}",
            payload.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}
