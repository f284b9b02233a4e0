//! Operator-facing progress lines on stdout

use std::path::Path;

use tablerestore_sqlite::{
    ImportProgress, ImportReport, RowFailure, SnapshotStatus, TableOutcome, TableStatus,
};

#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl ConsoleProgress {
    pub fn new() -> Self {
        Self
    }
}

impl ImportProgress for ConsoleProgress {
    fn loading(&mut self, backup_path: &Path) {
        println!("Loading {}...", backup_path.display());
    }

    fn snapshot(&mut self, status: &SnapshotStatus) {
        if let Some(line) = snapshot_line(status) {
            println!("{}", line);
        }
    }

    fn row_failed(&mut self, table: &str, failure: &RowFailure) {
        println!("    Error on {} (row {}): {}", table, failure.index, failure.message);
    }

    fn table_finished(&mut self, outcome: &TableOutcome) {
        println!("{}", table_line(outcome));
    }

    fn finished(&mut self, report: &ImportReport) {
        println!();
        if report.is_clean() {
            println!("✅ Import complete!");
        } else {
            println!(
                "⚠️  Import complete with {} failed rows and {} skipped tables",
                report.total_failed(),
                report.rejected_tables().count()
            );
        }
    }
}

fn snapshot_line(status: &SnapshotStatus) -> Option<String> {
    match status {
        SnapshotStatus::Created { path, .. } => Some(format!("Backup created: {}", path.display())),
        SnapshotStatus::SourceMissing => {
            Some("No existing database, creating a new one...".to_string())
        }
        SnapshotStatus::Disabled => None,
    }
}

fn table_line(outcome: &TableOutcome) -> String {
    let mut line = match &outcome.status {
        TableStatus::Empty => format!("  - {}: empty, skipped", outcome.table),
        TableStatus::Rejected { reason } => format!("  - {}: ERROR - {}", outcome.table, reason),
        TableStatus::Imported if outcome.failed() > 0 => format!(
            "  - {}: {} imported, {} errors",
            outcome.table,
            outcome.inserted,
            outcome.failed()
        ),
        TableStatus::Imported => {
            format!("  - {}: {} records imported", outcome.table, outcome.inserted)
        }
    };

    if !outcome.dropped_columns.is_empty() {
        line.push_str(&format!(
            " (ignored columns: {})",
            outcome.dropped_columns.join(", ")
        ));
    }
    if !outcome.unwritten_columns.is_empty() {
        line.push_str(&format!(
            " (not in first row, values skipped: {})",
            outcome.unwritten_columns.join(", ")
        ));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_table_lines() {
        assert_eq!(
            table_line(&TableOutcome::empty("orders")),
            "  - orders: empty, skipped"
        );

        let mut users = TableOutcome::imported("users");
        users.inserted = 2;
        assert_eq!(table_line(&users), "  - users: 2 records imported");

        users.failures.push(RowFailure {
            index: 1,
            message: "boom".into(),
        });
        assert_eq!(table_line(&users), "  - users: 2 imported, 1 errors");

        assert_eq!(
            table_line(&TableOutcome::rejected("ghosts", "no such table: ghosts")),
            "  - ghosts: ERROR - no such table: ghosts"
        );
    }

    #[test]
    fn test_dropped_columns_are_listed() {
        let mut users = TableOutcome::imported("users");
        users.inserted = 1;
        users.dropped_columns = vec!["legacy".into(), "kyc_level".into()];
        assert_eq!(
            table_line(&users),
            "  - users: 1 records imported (ignored columns: legacy, kyc_level)"
        );
    }

    #[test]
    fn test_unwritten_columns_are_listed() {
        let mut orders = TableOutcome::imported("orders");
        orders.inserted = 3;
        orders.unwritten_columns = vec!["coupon".into()];
        assert_eq!(
            table_line(&orders),
            "  - orders: 3 records imported (not in first row, values skipped: coupon)"
        );
    }

    #[test]
    fn test_snapshot_lines() {
        let created = SnapshotStatus::Created {
            path: PathBuf::from("emb.db.backup_20240101_000000"),
            bytes: 10,
        };
        assert_eq!(
            snapshot_line(&created).unwrap(),
            "Backup created: emb.db.backup_20240101_000000"
        );
        assert!(snapshot_line(&SnapshotStatus::Disabled).is_none());
    }
}
