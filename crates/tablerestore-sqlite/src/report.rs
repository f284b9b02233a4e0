//! Outcome of an import run

use serde::Serialize;

use crate::snapshot::SnapshotStatus;

/// Summary of one run, in backup table order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportReport {
    pub snapshot: SnapshotStatus,
    pub tables: Vec<TableOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TableStatus {
    /// Rows were cleared and the backup rows inserted (some may have failed)
    Imported,
    /// Empty row sequence, table left untouched
    Empty,
    /// Table left untouched because it could not be safely addressed
    Rejected { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableOutcome {
    pub table: String,
    #[serde(flatten)]
    pub status: TableStatus,
    pub inserted: usize,
    pub failures: Vec<RowFailure>,
    /// Backup columns the table does not have (only with `skip_unknown_columns`)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dropped_columns: Vec<String>,
    /// Table columns that later rows carried but the first row did not;
    /// those values were not written
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unwritten_columns: Vec<String>,
}

/// A backup row that could not be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
    /// Zero-based position in the table's backup sequence
    pub index: usize,
    pub message: String,
}

impl TableOutcome {
    pub fn empty(table: impl Into<String>) -> Self {
        Self::with_status(table, TableStatus::Empty)
    }

    pub fn rejected(table: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::with_status(
            table,
            TableStatus::Rejected {
                reason: reason.into(),
            },
        )
    }

    pub fn imported(table: impl Into<String>) -> Self {
        Self::with_status(table, TableStatus::Imported)
    }

    fn with_status(table: impl Into<String>, status: TableStatus) -> Self {
        Self {
            table: table.into(),
            status,
            inserted: 0,
            failures: Vec::new(),
            dropped_columns: Vec::new(),
            unwritten_columns: Vec::new(),
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_imported(&self) -> bool {
        self.status == TableStatus::Imported
    }
}

impl ImportReport {
    pub fn total_inserted(&self) -> usize {
        self.tables.iter().map(|t| t.inserted).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.tables.iter().map(TableOutcome::failed).sum()
    }

    pub fn rejected_tables(&self) -> impl Iterator<Item = &TableOutcome> {
        self.tables
            .iter()
            .filter(|t| matches!(t.status, TableStatus::Rejected { .. }))
    }

    pub fn table(&self, name: &str) -> Option<&TableOutcome> {
        self.tables.iter().find(|t| t.table == name)
    }

    /// No row failed and no table was rejected.
    pub fn is_clean(&self) -> bool {
        self.total_failed() == 0 && self.rejected_tables().next().is_none()
    }
}
