//! Runtime configuration for core storage and logging.
//!
//! # Responsibility
//! - Resolve database path, log settings and snapshot slot key from the
//!   environment, with defaults for local use.
//!
//! # Invariants
//! - `log_level` is always one of `trace|debug|info|warn|error`.
//! - `slot_key` is never blank.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "STRIDELOG_DB_PATH";
pub const ENV_LOG_DIR: &str = "STRIDELOG_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "STRIDELOG_LOG_LEVEL";
pub const ENV_SLOT: &str = "STRIDELOG_SLOT";

pub const DEFAULT_DB_FILE_NAME: &str = "stridelog.sqlite3";
pub const DEFAULT_SLOT_KEY: &str = "workouts";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, message } => write!(f, "invalid `{key}`: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved core configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file holding the snapshot slot.
    pub db_path: PathBuf,
    /// Rolling log directory; file logging is off when `None`.
    pub log_dir: Option<PathBuf>,
    pub log_level: &'static str,
    /// Flat-store slot holding the workout snapshot.
    pub slot_key: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_dir: None,
            log_level: default_log_level(),
            slot_key: DEFAULT_SLOT_KEY.to_string(),
        }
    }
}

impl CoreConfig {
    /// Loads configuration from `STRIDELOG_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let mut config = Self {
            db_path: get(ENV_DB_PATH).map_or(defaults.db_path, PathBuf::from),
            log_dir: get(ENV_LOG_DIR).map(PathBuf::from),
            log_level: defaults.log_level,
            slot_key: get(ENV_SLOT).unwrap_or(defaults.slot_key),
        };
        if let Some(level) = get(ENV_LOG_LEVEL) {
            config.set_log_level(&level)?;
        }
        Ok(config)
    }

    /// Overrides the log level after normalizing it.
    pub fn set_log_level(&mut self, level: &str) -> Result<(), ConfigError> {
        self.log_level = normalize_level(level).map_err(|message| ConfigError::InvalidValue {
            key: ENV_LOG_LEVEL,
            message,
        })?;
        Ok(())
    }
}
