//! Scalar cell values
//!
//! JSON scalars map onto [ColumnValue] without coercion. The engine's own
//! type affinity decides how they are stored.

use serde_json::Value;

use crate::error::RowError;

/// A single cell from a backup row.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    /// Bound as integer 0/1
    Boolean(bool),
}

impl ColumnValue {
    /// Convert a JSON value found under `column`.
    ///
    /// Numbers that fit an `i64` become [ColumnValue::Integer], every other
    /// number becomes [ColumnValue::Real]. Arrays and objects are refused.
    pub fn from_json(column: &str, value: &Value) -> Result<Self, RowError> {
        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(b) => Ok(Self::Boolean(*b)),
            Value::Number(n) => Ok(match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Real(n.as_f64().unwrap_or(f64::NAN)),
            }),
            Value::String(s) => Ok(Self::Text(s.clone())),
            Value::Array(_) => Err(RowError::NestedValue {
                column: column.to_string(),
                kind: "array",
            }),
            Value::Object(_) => Err(RowError::NestedValue {
                column: column.to_string(),
                kind: "object",
            }),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

#[cfg(feature = "sqlite")]
mod sqlite {
    use rusqlite::ToSql;
    use rusqlite::types::{ToSqlOutput, Value, ValueRef};

    use super::ColumnValue;

    impl ToSql for ColumnValue {
        fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
            Ok(match self {
                ColumnValue::Null => ToSqlOutput::Owned(Value::Null),
                ColumnValue::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
                ColumnValue::Real(f) => ToSqlOutput::Owned(Value::Real(*f)),
                ColumnValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
                ColumnValue::Boolean(b) => ToSqlOutput::Owned(Value::Integer(i64::from(*b))),
            })
        }
    }
}
