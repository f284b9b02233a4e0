//! Clear-and-refill import of backup tables
//!
//! The whole run shares one transaction, committed after the last table.
//! A failing `INSERT` only aborts its own statement, so row failures are
//! recorded and the loop continues.

use std::path::Path;

use rusqlite::{Connection, params_from_iter};
use tablerestore_core::{
    BackupDocument, ColumnSet, RestoreConfig, RestoreError, SqlIdentifier, TableBackup,
};

use crate::connection::{ConnectionConfig, open_database};
use crate::progress::ImportProgress;
use crate::report::{ImportReport, RowFailure, TableOutcome};
use crate::schema;
use crate::snapshot::{self, SnapshotStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    pub snapshot: bool,
    pub skip_unknown_columns: bool,
    pub connection: ConnectionConfig,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            snapshot: true,
            skip_unknown_columns: false,
            connection: ConnectionConfig::default(),
        }
    }
}

impl From<&RestoreConfig> for ImportOptions {
    fn from(config: &RestoreConfig) -> Self {
        Self {
            snapshot: config.snapshot,
            skip_unknown_columns: config.skip_unknown_columns,
            connection: ConnectionConfig {
                busy_timeout_ms: config.busy_timeout_ms,
            },
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Importer {
    options: ImportOptions,
}

impl Importer {
    pub fn new(options: ImportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Load `backup_path` and restore it into `database_path`.
    ///
    /// The backup is read and parsed before the database is touched, so an
    /// unreadable or malformed backup leaves everything as it was.
    pub fn import(
        &self,
        backup_path: &Path,
        database_path: &Path,
        progress: &mut dyn ImportProgress,
    ) -> Result<ImportReport, RestoreError> {
        progress.loading(backup_path);
        let document = BackupDocument::load(backup_path)?;
        self.import_document(&document, database_path, progress)
    }

    /// Restore an already loaded document into `database_path`.
    pub fn import_document(
        &self,
        document: &BackupDocument,
        database_path: &Path,
        progress: &mut dyn ImportProgress,
    ) -> Result<ImportReport, RestoreError> {
        let snapshot = if self.options.snapshot {
            snapshot::create_snapshot(database_path)?
        } else {
            SnapshotStatus::Disabled
        };
        progress.snapshot(&snapshot);

        let mut conn = open_database(database_path, &self.options.connection)?;
        let tx = conn
            .transaction()
            .map_err(|e| RestoreError::database("begin import transaction", e))?;

        let mut tables = Vec::with_capacity(document.tables().len());
        for table in document.tables() {
            let outcome = self.import_table(&tx, table, progress);
            progress.table_finished(&outcome);
            tables.push(outcome);
        }

        tx.commit()
            .map_err(|e| RestoreError::database("commit import", e))?;

        let report = ImportReport { snapshot, tables };
        tracing::info!(
            database = %database_path.display(),
            tables = report.tables.len(),
            inserted = report.total_inserted(),
            failed = report.total_failed(),
            rejected = report.rejected_tables().count(),
            "Import completed"
        );
        progress.finished(&report);

        Ok(report)
    }

    fn import_table(
        &self,
        conn: &Connection,
        table: &TableBackup,
        progress: &mut dyn ImportProgress,
    ) -> TableOutcome {
        let name = table.name();

        let Some(first_row) = table.first_row() else {
            tracing::info!(table = %name, "Empty table in backup, skipped");
            return TableOutcome::empty(name);
        };

        // Everything up to the DELETE must succeed, otherwise the table is
        // left exactly as it was.
        let ident = match SqlIdentifier::new(name) {
            Ok(ident) => ident,
            Err(e) => return reject(name, e.to_string()),
        };

        match schema::table_exists(conn, &ident) {
            Ok(true) => {}
            Ok(false) => return reject(name, format!("no such table: {}", name)),
            Err(e) => return reject(name, e.to_string()),
        }

        let known = match schema::table_columns(conn, &ident) {
            Ok(known) => known,
            Err(e) => return reject(name, e.to_string()),
        };

        let columns = match ColumnSet::for_table(
            first_row,
            known.as_slice(),
            self.options.skip_unknown_columns,
        ) {
            Ok(columns) => columns,
            Err(e) => return reject(name, e.to_string()),
        };

        if !columns.dropped().is_empty() {
            tracing::warn!(
                table = %name,
                columns = %columns.dropped().join(", "),
                "Ignoring backup columns missing from the table"
            );
            if columns.is_empty() {
                let mut outcome = reject(name, "none of the backup columns exist in the table");
                outcome.dropped_columns = columns.dropped().to_vec();
                return outcome;
            }
        }

        if let Err(e) = conn.execute(&format!("DELETE FROM {}", ident.quoted()), []) {
            return reject(name, e.to_string());
        }

        let sql = columns.insert_statement(&ident);
        let mut outcome = TableOutcome::imported(name);
        outcome.dropped_columns = columns.dropped().to_vec();

        for (index, row) in table.rows().iter().enumerate() {
            let result = columns
                .bind(row)
                .map_err(|e| e.to_string())
                .and_then(|values| {
                    let mut stmt = conn.prepare_cached(&sql).map_err(|e| e.to_string())?;
                    let changed = stmt
                        .execute(params_from_iter(values.iter()))
                        .map_err(|e| e.to_string())?;
                    Ok(changed)
                });

            match result {
                Ok(_) => {
                    outcome.inserted += 1;
                    for column in columns.untemplated(row) {
                        if !outcome.unwritten_columns.iter().any(|c| c == column) {
                            outcome.unwritten_columns.push(column.to_string());
                        }
                    }
                }
                Err(message) => {
                    tracing::warn!(table = %name, row = index, error = %message, "Row insert failed");
                    let failure = RowFailure { index, message };
                    progress.row_failed(name, &failure);
                    outcome.failures.push(failure);
                }
            }
        }

        if !outcome.unwritten_columns.is_empty() {
            tracing::warn!(
                table = %name,
                columns = %outcome.unwritten_columns.join(", "),
                "Values for columns absent from the first row were not written"
            );
        }

        tracing::info!(
            table = %name,
            inserted = outcome.inserted,
            failed = outcome.failed(),
            "Table imported"
        );
        outcome
    }
}

fn reject(table: &str, reason: impl Into<String>) -> TableOutcome {
    let reason = reason.into();
    tracing::warn!(table = %table, reason = %reason, "Table skipped");
    TableOutcome::rejected(table, reason)
}
