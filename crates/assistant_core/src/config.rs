//! Runtime configuration for data and log locations.
//!
//! # Responsibility
//! - Resolve directories and log level from overrides, environment and
//!   platform defaults, in that order.
//!
//! # Invariants
//! - Resolved directories are absolute.
//! - Resolution has no side effects; `ensure_dirs` creates directories.

use crate::logging::{default_log_level, normalize_level};
use directories::ProjectDirs;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "ASSISTANT_DATA_DIR";
pub const LOG_DIR_ENV: &str = "ASSISTANT_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "ASSISTANT_LOG_LEVEL";

const APP_NAME: &str = "personal_assistant";
const DB_FILE_NAME: &str = "assistant.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Values supplied explicitly by the caller, e.g. from command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: &'static str,
}

#[derive(Debug)]
pub enum ConfigError {
    /// No platform data directory could be determined.
    NoDataDir,
    InvalidLogLevel(String),
    CurrentDir(std::io::Error),
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDataDir => write!(
                f,
                "cannot determine a data directory; set {DATA_DIR_ENV} or pass --data-dir"
            ),
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
            Self::CurrentDir(err) => write!(f, "cannot read current directory: {err}"),
            Self::CreateDir { path, source } => {
                write!(f, "failed to create `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CurrentDir(err) => Some(err),
            Self::CreateDir { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl AppConfig {
    /// Resolves configuration using the process environment.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolves configuration with an explicit environment lookup.
    pub fn resolve_with(
        overrides: ConfigOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let env_path = |key: &str| {
            env(key)
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
        };

        let data_dir = match overrides.data_dir.or_else(|| env_path(DATA_DIR_ENV)) {
            Some(path) => path,
            None => ProjectDirs::from("", "", APP_NAME)
                .map(|dirs| dirs.data_dir().to_path_buf())
                .ok_or(ConfigError::NoDataDir)?,
        };
        let data_dir = absolutize(&data_dir)?;

        let log_dir = match overrides.log_dir.or_else(|| env_path(LOG_DIR_ENV)) {
            Some(path) => absolutize(&path)?,
            None => data_dir.join(LOG_DIR_NAME),
        };

        let log_level = match overrides.log_level.or_else(|| env(LOG_LEVEL_ENV)) {
            Some(level) => normalize_level(&level).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };

        Ok(Self {
            data_dir,
            log_dir,
            log_level,
        })
    }

    /// Path of the snapshot database file.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    /// Creates the data and log directories when missing.
    pub fn ensure_dirs(&self) -> Result<(), ConfigError> {
        for dir in [&self.data_dir, &self.log_dir] {
            std::fs::create_dir_all(dir).map_err(|source| ConfigError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

fn absolutize(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, ConfigOverrides, DATA_DIR_ENV, LOG_LEVEL_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn overrides_win_over_environment() {
        let overrides = ConfigOverrides {
            data_dir: Some(PathBuf::from("/tmp/flag-data")),
            log_dir: None,
            log_level: Some("WARN".to_string()),
        };
        let env = env_of(&[(DATA_DIR_ENV, "/tmp/env-data"), (LOG_LEVEL_ENV, "trace")]);
        let config = AppConfig::resolve_with(overrides, env).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/flag-data"));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/flag-data/logs"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(
            config.db_path(),
            PathBuf::from("/tmp/flag-data/assistant.sqlite3")
        );
    }

    #[test]
    fn environment_is_used_when_no_override() {
        let env = env_of(&[(DATA_DIR_ENV, "/tmp/env-data")]);
        let config = AppConfig::resolve_with(ConfigOverrides::default(), env).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/env-data"));
    }

    #[test]
    fn relative_directories_become_absolute() {
        let overrides = ConfigOverrides {
            data_dir: Some(PathBuf::from("data")),
            ..ConfigOverrides::default()
        };
        let config = AppConfig::resolve_with(overrides, env_of(&[])).unwrap();
        assert!(config.data_dir.is_absolute());
        assert!(config.data_dir.ends_with("data"));
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let overrides = ConfigOverrides {
            data_dir: Some(PathBuf::from("/tmp/x")),
            log_level: Some("chatty".to_string()),
            ..ConfigOverrides::default()
        };
        let err = AppConfig::resolve_with(overrides, env_of(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel(_)));
    }

    #[test]
    fn ensure_dirs_creates_both_directories() {
        let root = tempfile::tempdir().unwrap();
        let overrides = ConfigOverrides {
            data_dir: Some(root.path().join("data")),
            ..ConfigOverrides::default()
        };
        let config = AppConfig::resolve_with(overrides, env_of(&[])).unwrap();
        config.ensure_dirs().unwrap();
        assert!(config.data_dir.is_dir());
        assert!(config.log_dir.is_dir());
    }
}
