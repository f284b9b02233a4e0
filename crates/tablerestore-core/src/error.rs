//! # Error Types
//!
//! Fatal failures abort the run and surface as [RestoreError]. Per-table and
//! per-row problems are recoverable; [IdentifierError] and [RowError] describe
//! them so the importer can log the cause and move on.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a restore run.
#[derive(Debug, Error)]
pub enum RestoreError {
    /// The backup file could not be read from disk.
    #[error("Failed to read backup file {}: {source}", .path.display())]
    BackupRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backup file is not valid JSON.
    #[error("Backup {origin} is not valid JSON: {source}")]
    BackupParse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// The JSON is valid but does not have the table -> rows shape.
    #[error("Invalid backup document: {reason}")]
    InvalidBackup { reason: String },

    /// Copying the database file aside failed.
    #[error("Failed to snapshot {} to {}: {source}", .source_path.display(), .target_path.display())]
    Snapshot {
        source_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The database could not be opened, or the final commit failed.
    #[error("Database error ({context}): {details}")]
    Database {
        context: &'static str,
        details: String,
    },

    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl RestoreError {
    /// Build a database error from any displayable engine error.
    pub fn database(context: &'static str, error: impl std::fmt::Display) -> Self {
        Self::Database {
            context,
            details: error.to_string(),
        }
    }

    /// Short code suitable for structured logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            RestoreError::BackupRead { .. } => "BACKUP_READ",
            RestoreError::BackupParse { .. } => "BACKUP_PARSE",
            RestoreError::InvalidBackup { .. } => "INVALID_BACKUP",
            RestoreError::Snapshot { .. } => "SNAPSHOT",
            RestoreError::Database { .. } => "DATABASE",
            RestoreError::Config { .. } => "CONFIG",
        }
    }
}

/// Reasons a table or column name is refused as an SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("Identifier cannot be empty")]
    Empty,

    #[error("Identifier `{name}` is too long ({length} chars, max {max})")]
    TooLong {
        name: String,
        length: usize,
        max: usize,
    },

    #[error("Identifier `{name}` must start with an ASCII letter or underscore")]
    InvalidStart { name: String },

    #[error("Identifier `{name}` may only contain ASCII letters, digits and underscores")]
    InvalidCharacters { name: String },
}

/// Reasons a single backup row cannot be bound to the table's column set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// A cell holds an array or object.
    #[error("column `{column}` holds a nested {kind}, only scalar values can be restored")]
    NestedValue { column: String, kind: &'static str },

    /// The row has keys that neither the first row nor the table has.
    #[error("row has columns outside the table's column set: {}", .columns.join(", "))]
    UnexpectedColumns { columns: Vec<String> },
}
