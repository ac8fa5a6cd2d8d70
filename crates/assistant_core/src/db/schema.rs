use super::{DbError, DbResult};
use rusqlite::Connection;

/// Columns the snapshot repository reads and writes.
pub const SNAPSHOT_COLUMNS: [&str; 3] = ["name", "payload", "saved_at"];

const CREATE_SNAPSHOTS: &str = "CREATE TABLE IF NOT EXISTS snapshots (
    name TEXT PRIMARY KEY NOT NULL,
    payload TEXT NOT NULL,
    saved_at INTEGER NOT NULL
);";

/// Creates the `snapshots` table when absent and checks an existing one.
pub(super) fn ensure_snapshot_table(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(CREATE_SNAPSHOTS)?;

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('snapshots');")?;
    let present = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    let missing: Vec<&'static str> = SNAPSHOT_COLUMNS
        .into_iter()
        .filter(|column| !present.iter().any(|name| name == column))
        .collect();
    if !missing.is_empty() {
        return Err(DbError::IncompatibleSnapshotTable { missing });
    }
    Ok(())
}
