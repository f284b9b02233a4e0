//! Restore configuration
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `TABLERESTORE_*` environment variables, then command-line arguments.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::RestoreError;

/// Default backup file, relative to the working directory
pub const DEFAULT_BACKUP_FILE: &str = "full_backup.json";
/// Default database file, relative to the working directory
pub const DEFAULT_DATABASE_PATH: &str = "../database/emb.db";
/// Default SQLite busy timeout
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5000;

pub const ENV_BACKUP_FILE: &str = "TABLERESTORE_BACKUP_FILE";
pub const ENV_DATABASE_PATH: &str = "TABLERESTORE_DATABASE_PATH";
pub const ENV_BUSY_TIMEOUT_MS: &str = "TABLERESTORE_BUSY_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestoreConfig {
    /// JSON backup to read
    pub backup_file: PathBuf,
    /// SQLite database to restore into
    pub database_path: PathBuf,
    /// Copy the database file aside before touching it
    pub snapshot: bool,
    /// Drop backup columns the target table does not have
    pub skip_unknown_columns: bool,
    pub busy_timeout_ms: u32,
    pub log_format: LogFormat,
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self {
            backup_file: PathBuf::from(DEFAULT_BACKUP_FILE),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            snapshot: true,
            skip_unknown_columns: false,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            log_format: LogFormat::default(),
        }
    }
}

impl RestoreConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, RestoreError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| RestoreError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        Self::load_from_toml(&content)
    }

    /// Load configuration from a TOML string
    pub fn load_from_toml(toml_content: &str) -> Result<Self, RestoreError> {
        toml::from_str(toml_content).map_err(|e| RestoreError::Config {
            message: format!("Failed to parse TOML config: {}", e),
        })
    }

    /// Apply `TABLERESTORE_*` overrides through `lookup`, normally
    /// `std::env::var`.
    ///
    /// Unparseable values leave the setting unchanged and are returned so
    /// the caller can report them after its subscriber is installed.
    #[must_use = "ignored overrides should be reported once logging is up"]
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Vec<IgnoredOverride>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut ignored = Vec::new();

        if let Some(path) = lookup(ENV_BACKUP_FILE) {
            self.backup_file = PathBuf::from(path);
        }

        if let Some(path) = lookup(ENV_DATABASE_PATH) {
            self.database_path = PathBuf::from(path);
        }

        if let Some(raw) = lookup(ENV_BUSY_TIMEOUT_MS) {
            match raw.parse::<u32>() {
                Ok(ms) => self.busy_timeout_ms = ms,
                Err(e) => ignored.push(IgnoredOverride {
                    variable: ENV_BUSY_TIMEOUT_MS,
                    value: raw,
                    reason: e.to_string(),
                }),
            }
        }

        ignored
    }

    /// Reject configurations that cannot run.
    pub fn validate(&self) -> Result<(), RestoreError> {
        if self.backup_file.as_os_str().is_empty() {
            return Err(RestoreError::Config {
                message: "backup_file cannot be empty".to_string(),
            });
        }

        if self.database_path.as_os_str().is_empty() {
            return Err(RestoreError::Config {
                message: "database_path cannot be empty".to_string(),
            });
        }

        if self.busy_timeout_ms == 0 {
            return Err(RestoreError::Config {
                message: "busy_timeout_ms must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

/// An environment override that could not be applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredOverride {
    pub variable: &'static str,
    pub value: String,
    pub reason: String,
}

/// Output format for diagnostic logs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Json => write!(f, "json"),
            LogFormat::Text => write!(f, "text"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown log format `{0}` (expected json or text)")]
pub struct UnknownLogFormat(String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "text" => Ok(LogFormat::Text),
            other => Err(UnknownLogFormat(other.to_string())),
        }
    }
}
