//! Per-process state shared by the main menu and its modules.

use assistant_core::db::open_db;
use assistant_core::{AppConfig, AppResult};
use rusqlite::Connection;

pub struct Session {
    pub config: AppConfig,
    /// Snapshot database; each module loads from and saves to it.
    pub conn: Connection,
}

impl Session {
    pub fn open(config: AppConfig) -> AppResult<Self> {
        let conn = open_db(config.db_path()).map_err(assistant_core::RepoError::from)?;
        Ok(Self { config, conn })
    }

    #[cfg(test)]
    pub(crate) fn in_memory() -> Self {
        let conn = assistant_core::db::open_db_in_memory().unwrap();
        let root = std::env::temp_dir().join("assistant-session-test");
        let config = AppConfig {
            data_dir: root.clone(),
            log_dir: root.join("logs"),
            log_level: "info",
        };
        Self { config, conn }
    }
}
