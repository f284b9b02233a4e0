//! SQLite restore engine
//!
//! Restores table rows from a [BackupDocument](tablerestore_core::BackupDocument):
//! - snapshots the database file next to itself before any change
//! - clears and refills each table listed in the backup
//! - keeps going past individual row failures, committing once at the end

mod connection;
pub mod importer;
pub mod progress;
pub mod report;
pub mod schema;
pub mod snapshot;

pub use connection::{ConnectionConfig, open_database};
pub use importer::{ImportOptions, Importer};
pub use progress::{ImportProgress, NoProgress};
pub use report::{ImportReport, RowFailure, TableOutcome, TableStatus};
pub use snapshot::SnapshotStatus;
