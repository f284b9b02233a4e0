//! # tablerestore core
//!
//! Engine-independent building blocks for restoring table rows from a JSON
//! backup document:
//!
//! - **[BackupDocument]**: the parsed backup, table name to ordered rows
//! - **[ColumnValue]**: scalar cell values passed through to the engine
//! - **[SqlIdentifier]**: validated table/column names, safe to interpolate
//! - **[ColumnSet]**: the per-table column template taken from the first row
//! - **[RestoreConfig]**: TOML/env/CLI layered configuration
//!
//! ## Feature Flags
//!
//! - `sqlite`: implement `rusqlite::ToSql` for [ColumnValue]
//!
//! ## Example
//!
//! ```rust
//! use tablerestore_core::BackupDocument;
//!
//! let doc = BackupDocument::from_json_str(r#"{"users": [{"id": 1, "name": "Alice"}]}"#).unwrap();
//! let users = doc.table("users").unwrap();
//! assert_eq!(users.len(), 1);
//! assert_eq!(users.first_row_columns(), vec!["id", "name"]);
//! ```

pub mod backup;
pub mod columns;
pub mod config;
pub mod error;
pub mod identifier;
pub mod value;

pub use backup::{BackupDocument, RowRecord, TableBackup};
pub use columns::ColumnSet;
pub use config::{IgnoredOverride, LogFormat, RestoreConfig};
pub use error::{IdentifierError, RestoreError, RowError};
pub use identifier::SqlIdentifier;
pub use value::ColumnValue;
