//! Backup document model
//!
//! A backup is a JSON object whose keys are table names and whose values are
//! arrays of row objects. Table and key order follow the file.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::RestoreError;

/// Parsed backup: tables in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackupDocument {
    tables: Vec<TableBackup>,
}

/// Rows recorded for one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableBackup {
    name: String,
    rows: Vec<RowRecord>,
}

/// One row: column name to JSON value, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowRecord(Map<String, Value>);

impl BackupDocument {
    /// Read and parse a backup file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RestoreError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| RestoreError::BackupRead {
            path: path.to_path_buf(),
            source,
        })?;

        let document = Self::parse(&content, &path.display().to_string())?;
        tracing::debug!(
            path = %path.display(),
            tables = document.tables.len(),
            rows = document.total_rows(),
            "Loaded backup document"
        );
        Ok(document)
    }

    /// Parse a backup held in memory.
    pub fn from_json_str(content: &str) -> Result<Self, RestoreError> {
        Self::parse(content, "<memory>")
    }

    fn parse(content: &str, origin: &str) -> Result<Self, RestoreError> {
        let value: Value =
            serde_json::from_str(content).map_err(|source| RestoreError::BackupParse {
                origin: origin.to_string(),
                source,
            })?;
        Self::from_value(value)
    }

    /// Build a document from an already parsed JSON value, checking its shape.
    pub fn from_value(value: Value) -> Result<Self, RestoreError> {
        let Value::Object(tables) = value else {
            return Err(RestoreError::InvalidBackup {
                reason: format!("top-level value must be an object, found {}", kind(&value)),
            });
        };

        let tables = tables
            .into_iter()
            .map(|(name, rows)| TableBackup::from_value(name, rows))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { tables })
    }

    pub fn tables(&self) -> &[TableBackup] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&TableBackup> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(TableBackup::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl TableBackup {
    pub fn new(name: impl Into<String>, rows: Vec<RowRecord>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    fn from_value(name: String, value: Value) -> Result<Self, RestoreError> {
        let Value::Array(items) = value else {
            return Err(RestoreError::InvalidBackup {
                reason: format!(
                    "table `{}` must map to an array of rows, found {}",
                    name,
                    kind(&value)
                ),
            });
        };

        let rows = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(map) => Ok(RowRecord(map)),
                other => Err(RestoreError::InvalidBackup {
                    reason: format!(
                        "row {} of table `{}` must be an object, found {}",
                        index,
                        name,
                        kind(&other)
                    ),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { name, rows })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[RowRecord] {
        &self.rows
    }

    pub fn first_row(&self) -> Option<&RowRecord> {
        self.rows.first()
    }

    /// Column names of the first row, in file order. Empty for an empty table.
    pub fn first_row_columns(&self) -> Vec<&str> {
        self.first_row()
            .map(|row| row.columns().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl RowRecord {
    pub fn new(values: Map<String, Value>) -> Self {
        Self(values)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for RowRecord {
    fn from(values: Map<String, Value>) -> Self {
        Self(values)
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_preserves_table_and_column_order() {
        let doc = BackupDocument::from_json_str(
            r#"{
                "users": [{"name": "Alice", "id": 1}],
                "admins": [],
                "config": [{"key": "fee", "value": "2"}]
            }"#,
        )
        .unwrap();

        let names: Vec<_> = doc.tables().iter().map(TableBackup::name).collect();
        assert_eq!(names, vec!["users", "admins", "config"]);
        assert_eq!(
            doc.table("users").unwrap().first_row_columns(),
            vec!["name", "id"]
        );
        assert_eq!(doc.total_rows(), 2);
    }

    #[test]
    fn test_empty_table_has_no_columns() {
        let doc = BackupDocument::from_json_str(r#"{"orders": []}"#).unwrap();
        let orders = doc.table("orders").unwrap();
        assert!(orders.is_empty());
        assert!(orders.first_row_columns().is_empty());
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = BackupDocument::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, RestoreError::BackupParse { .. }));
    }

    #[test]
    fn test_wrong_shapes_rejected() {
        let err = BackupDocument::from_json_str("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("top-level value must be an object"));

        let err = BackupDocument::from_json_str(r#"{"users": {"id": 1}}"#).unwrap_err();
        assert!(err.to_string().contains("table `users` must map to an array"));

        let err = BackupDocument::from_json_str(r#"{"users": [{"id": 1}, 5]}"#).unwrap_err();
        assert!(err.to_string().contains("row 1 of table `users`"));
    }

    #[test]
    fn test_nested_cell_values_survive_parsing() {
        let doc = BackupDocument::from_json_str(r#"{"t": [{"tags": ["a"]}]}"#).unwrap();
        assert!(doc.table("t").unwrap().rows()[0].get("tags").unwrap().is_array());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("full_backup.json");
        fs::write(&path, r#"{"users": [{"id": 1}, {"id": 2}]}"#).unwrap();

        let doc = BackupDocument::load(&path).unwrap();
        assert_eq!(doc.table("users").unwrap().len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = BackupDocument::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, RestoreError::BackupRead { .. }));
    }
}
