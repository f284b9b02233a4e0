//! Opening the target database

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;
use tablerestore_core::RestoreError;

/// Configuration for the restore connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub busy_timeout_ms: u32,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            busy_timeout_ms: tablerestore_core::config::DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

/// Open (or create) the database at `path`.
///
/// Journal mode and foreign key enforcement are left as the database has
/// them; the file belongs to another application.
pub fn open_database(path: &Path, config: &ConnectionConfig) -> Result<Connection, RestoreError> {
    let conn =
        Connection::open(path).map_err(|e| RestoreError::database("open database", e))?;

    conn.busy_timeout(Duration::from_millis(u64::from(config.busy_timeout_ms)))
        .map_err(|e| RestoreError::database("configure busy timeout", e))?;

    tracing::debug!(
        path = %path.display(),
        busy_timeout_ms = config.busy_timeout_ms,
        "Opened database"
    );

    Ok(conn)
}
