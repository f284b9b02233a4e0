//! Schema lookups used to allow-list backup identifiers

use rusqlite::{Connection, params};
use tablerestore_core::SqlIdentifier;

/// Whether `table` exists as an ordinary table.
pub fn table_exists(conn: &Connection, table: &SqlIdentifier) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(
             SELECT 1 FROM sqlite_master
             WHERE type = 'table' AND name = ?1 COLLATE NOCASE
         )",
        params![table.as_str()],
        |row| row.get(0),
    )
}

/// Column names of `table` in declaration order.
pub fn table_columns(conn: &Connection, table: &SqlIdentifier) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
    let rows = stmt.query_map(params![table.as_str()], |row| row.get::<_, String>(0))?;
    rows.collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, email TEXT);
             CREATE VIEW user_names AS SELECT name FROM users;",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_table_exists() {
        let conn = conn();
        assert!(table_exists(&conn, &SqlIdentifier::new("users").unwrap()).unwrap());
        assert!(table_exists(&conn, &SqlIdentifier::new("USERS").unwrap()).unwrap());
        assert!(!table_exists(&conn, &SqlIdentifier::new("orders").unwrap()).unwrap());
        // Views cannot be cleared and refilled.
        assert!(!table_exists(&conn, &SqlIdentifier::new("user_names").unwrap()).unwrap());
    }

    #[test]
    fn test_table_columns() {
        let conn = conn();
        let columns = table_columns(&conn, &SqlIdentifier::new("users").unwrap()).unwrap();
        assert_eq!(columns, vec!["id", "name", "email"]);

        let none = table_columns(&conn, &SqlIdentifier::new("orders").unwrap()).unwrap();
        assert!(none.is_empty());
    }
}
