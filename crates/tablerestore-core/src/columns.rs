//! Column template for a table
//!
//! The column list is taken once from the first row of a table and reused
//! for every row. Missing keys bind as NULL. A later row's key outside the
//! template fails that row, unless the table itself has such a column (the
//! value is then left out and reported) or the set is lenient (the key is
//! dropped).

use crate::backup::RowRecord;
use crate::error::{IdentifierError, RowError};
use crate::identifier::SqlIdentifier;
use crate::value::ColumnValue;

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSet {
    columns: Vec<SqlIdentifier>,
    dropped: Vec<String>,
    table_columns: Vec<String>,
    lenient: bool,
}

impl ColumnSet {
    /// Derive the template from the first row of a table, with no knowledge
    /// of the table's schema.
    pub fn from_first_row(row: &RowRecord) -> Result<Self, IdentifierError> {
        let columns = row
            .columns()
            .map(SqlIdentifier::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            columns,
            dropped: Vec::new(),
            table_columns: Vec::new(),
            lenient: false,
        })
    }

    /// Derive the template from the first row against the columns the table
    /// actually has.
    ///
    /// With `skip_unknown`, first-row keys the table does not have are moved
    /// to [ColumnSet::dropped] before any identifier check, and later rows'
    /// extra keys are ignored instead of failing the row.
    pub fn for_table<S: AsRef<str>>(
        row: &RowRecord,
        table_columns: &[S],
        skip_unknown: bool,
    ) -> Result<Self, IdentifierError> {
        let table_columns: Vec<String> = table_columns
            .iter()
            .map(|c| c.as_ref().to_string())
            .collect();

        let mut columns = Vec::new();
        let mut dropped = Vec::new();
        for key in row.columns() {
            if skip_unknown && !contains_ignore_case(&table_columns, key) {
                dropped.push(key.to_string());
            } else {
                columns.push(SqlIdentifier::new(key)?);
            }
        }

        Ok(Self {
            columns,
            dropped,
            table_columns,
            lenient: skip_unknown,
        })
    }

    pub fn columns(&self) -> &[SqlIdentifier] {
        &self.columns
    }

    /// First-row keys left out because the table has no such column.
    pub fn dropped(&self) -> &[String] {
        &self.dropped
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }


    /// Build the `INSERT` statement for `table` with one placeholder per column.
    pub fn insert_statement(&self, table: &SqlIdentifier) -> String {
        if self.columns.is_empty() {
            return format!("INSERT INTO {} DEFAULT VALUES", table.quoted());
        }

        let names = self
            .columns
            .iter()
            .map(SqlIdentifier::quoted)
            .collect::<Vec<_>>()
            .join(",");
        let placeholders = vec!["?"; self.columns.len()].join(",");

        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table.quoted(),
            names,
            placeholders
        )
    }

    /// Values of `row` in template order.
    pub fn bind(&self, row: &RowRecord) -> Result<Vec<ColumnValue>, RowError> {
        if !self.lenient {
            let unexpected: Vec<String> = self
                .outside_template(row)
                .filter(|key| !contains_ignore_case(&self.table_columns, key))
                .map(str::to_string)
                .collect();

            if !unexpected.is_empty() {
                return Err(RowError::UnexpectedColumns {
                    columns: unexpected,
                });
            }
        }

        self.columns
            .iter()
            .map(|column| match row.get(column.as_str()) {
                Some(value) => ColumnValue::from_json(column.as_str(), value),
                None => Ok(ColumnValue::Null),
            })
            .collect()
    }

    /// Keys of `row` that the table has but the template does not, so their
    /// values are not written.
    pub fn untemplated<'a>(&'a self, row: &'a RowRecord) -> impl Iterator<Item = &'a str> {
        self.outside_template(row)
            .filter(move |key| contains_ignore_case(&self.table_columns, key))
    }

    fn outside_template<'a>(&'a self, row: &'a RowRecord) -> impl Iterator<Item = &'a str> {
        row.columns().filter(move |key| {
            !self.columns.iter().any(|c| c.as_str() == *key)
                && !self.dropped.iter().any(|d| d.as_str() == *key)
        })
    }
}

fn contains_ignore_case(names: &[String], key: &str) -> bool {
    names.iter().any(|name| name.eq_ignore_ascii_case(key))
}
