//! Progress callbacks for the operator-facing narrative

use std::path::Path;

use crate::report::{ImportReport, RowFailure, TableOutcome};
use crate::snapshot::SnapshotStatus;

/// Receives import events as they happen. All methods default to no-ops.
pub trait ImportProgress {
    fn loading(&mut self, _backup_path: &Path) {}

    fn snapshot(&mut self, _status: &SnapshotStatus) {}

    fn row_failed(&mut self, _table: &str, _failure: &RowFailure) {}

    fn table_finished(&mut self, _outcome: &TableOutcome) {}

    fn finished(&mut self, _report: &ImportReport) {}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ImportProgress for NoProgress {}
