use std::collections::HashMap;

use crate::error::{MyRsError, Result};
use crate::types::Value;

/// Driver-agnostic result of a fetch: column names in select order plus
/// rows of values in the same column order. Drivers produce this shape and
/// the client hands it back unchanged for positional access.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    /// Column names in order
    pub columns: Vec<String>,
    /// Rows, where each row is a vector of values in column order
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Returns the number of rows in this result.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if this result contains no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Converts the positional rows into column-name-keyed records.
    pub fn into_records(self) -> Vec<Record> {
        let columns = self.columns;
        self.rows
            .into_iter()
            .map(|values| Record::new(&columns, values))
            .collect()
    }
}

/// A single row keyed by column name, for callers that asked for the
/// mapped cursor shape.
#[derive(Debug, Clone)]
pub struct Record {
    values: HashMap<String, Value>,
}

impl Record {
    pub(crate) fn new(columns: &[String], values: Vec<Value>) -> Self {
        let values = columns
            .iter()
            .zip(values.into_iter())
            .map(|(col, val)| (col.clone(), val))
            .collect();
        Self { values }
    }

    /// Gets a value by column name.
    pub fn get(&self, column: &str) -> Result<&Value> {
        self.values
            .get(column)
            .ok_or_else(|| MyRsError::ColumnNotFound(column.to_string()))
    }

    /// Returns all column names in this record.
    pub fn columns(&self) -> Vec<&str> {
        self.values.keys().map(|s| s.as_str()).collect()
    }

    /// Returns the number of columns in this record.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this record has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
