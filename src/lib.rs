//! # tablerestore
//!
//! Restore SQLite table rows from a JSON backup document.
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! let report = tablerestore_workspace::import(
//!     Path::new("full_backup.json"),
//!     Path::new("../database/emb.db"),
//! )?;
//! println!("{} rows restored", report.total_inserted());
//! # Ok::<(), tablerestore_workspace::RestoreError>(())
//! ```

use std::path::Path;

pub use tablerestore_core::{
    BackupDocument, ColumnSet, ColumnValue, IgnoredOverride, LogFormat, RestoreConfig, RestoreError,
    SqlIdentifier,
};
pub use tablerestore_sqlite::{
    ImportOptions, ImportProgress, ImportReport, Importer, NoProgress, RowFailure, SnapshotStatus,
    TableOutcome, TableStatus,
};

/// Restore `backup_path` into `database_path` with default options and no
/// progress output.
pub fn import(backup_path: &Path, database_path: &Path) -> Result<ImportReport, RestoreError> {
    Importer::default().import(backup_path, database_path, &mut NoProgress)
}

/// Restore using the paths and options of `config`.
pub fn import_with_config(
    config: &RestoreConfig,
    progress: &mut dyn ImportProgress,
) -> Result<ImportReport, RestoreError> {
    config.validate()?;
    Importer::new(ImportOptions::from(config)).import(
        &config.backup_file,
        &config.database_path,
        progress,
    )
}
