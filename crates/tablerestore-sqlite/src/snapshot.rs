//! Pre-import copy of the database file
//!
//! The copy sits next to the original as `<db>.backup_<YYYYMMDD_HHMMSS>` and
//! is never read back or cleaned up by this tool.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use tablerestore_core::RestoreError;

/// strftime pattern embedded in snapshot names
pub const SNAPSHOT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// What happened to the database file before import
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SnapshotStatus {
    Created { path: PathBuf, bytes: u64 },
    /// No database file yet; a fresh one will be created
    SourceMissing,
    Disabled,
}

impl SnapshotStatus {
    pub fn path(&self) -> Option<&Path> {
        match self {
            SnapshotStatus::Created { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Snapshot path for `database` taken at `at`.
pub fn snapshot_path(database: &Path, at: DateTime<Local>) -> PathBuf {
    let mut name = OsString::from(database.as_os_str());
    name.push(format!(".backup_{}", at.format(SNAPSHOT_TIMESTAMP_FORMAT)));
    PathBuf::from(name)
}

/// Copy `database` aside using the current local time.
pub fn create_snapshot(database: &Path) -> Result<SnapshotStatus, RestoreError> {
    create_snapshot_at(database, Local::now())
}

pub fn create_snapshot_at(
    database: &Path,
    at: DateTime<Local>,
) -> Result<SnapshotStatus, RestoreError> {
    let target = snapshot_path(database, at);

    match fs::copy(database, &target) {
        Ok(bytes) => {
            tracing::info!(
                source = %database.display(),
                snapshot = %target.display(),
                bytes,
                "Created database snapshot"
            );
            Ok(SnapshotStatus::Created {
                path: target,
                bytes,
            })
        }
        Err(e) if e.kind() == ErrorKind::NotFound && !database.exists() => {
            tracing::info!(
                source = %database.display(),
                "No existing database, a new one will be created"
            );
            Ok(SnapshotStatus::SourceMissing)
        }
        Err(source) => Err(RestoreError::Snapshot {
            source_path: database.to_path_buf(),
            target_path: target,
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap()
    }

    #[test]
    fn test_snapshot_path_format() {
        let path = snapshot_path(Path::new("../database/emb.db"), fixed_time());
        assert_eq!(
            path,
            PathBuf::from("../database/emb.db.backup_20240309_070501")
        );
    }

    #[test]
    fn test_snapshot_copies_bytes() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("emb.db");
        fs::write(&db, b"SQLite format 3\0payload").unwrap();

        let status = create_snapshot_at(&db, fixed_time()).unwrap();
        let expected = dir.path().join("emb.db.backup_20240309_070501");
        assert_eq!(
            status,
            SnapshotStatus::Created {
                path: expected.clone(),
                bytes: 23
            }
        );
        assert_eq!(fs::read(expected).unwrap(), fs::read(&db).unwrap());
    }

    #[test]
    fn test_missing_source_is_tolerated() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("emb.db");

        let status = create_snapshot(&db).unwrap();
        assert_eq!(status, SnapshotStatus::SourceMissing);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_unwritable_target_is_fatal() {
        let dir = tempdir().unwrap();
        // A directory cannot be copied as a file.
        let db = dir.path().join("emb.db");
        fs::create_dir(&db).unwrap();

        let err = create_snapshot(&db).unwrap_err();
        assert_eq!(err.error_code(), "SNAPSHOT");
    }
}
