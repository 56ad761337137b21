//! Data source abstractions for the report engine.
//!
//! This module provides the `DataSource` trait the row cursor reads from, and
//! `TableDataSource`, an in-memory table that can be built row by row or
//! loaded from JSON.
//!
//! ## Example
//!
//! ```ignore
//! use tally_source::{DataSource, TableDataSource};
//!
//! let mut table = TableDataSource::new(["Region", "Value"]);
//! table.add_row(["North".into(), 3.into()])?;
//!
//! assert_eq!(table.row_count(), 1);
//! assert_eq!(table.value_at(0, "Value")?, 3.into());
//! ```

use std::collections::HashMap;
use std::ops::Range;

use log::debug;
use serde_json::Value as JsonValue;
use tally_types::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Unknown field '{0}'.")]
    UnknownField(String),
    #[error("Row {row} is out of range (row count {row_count}).")]
    RowOutOfRange { row: usize, row_count: usize },
    #[error("Row has {actual} values but the table has {expected} columns.")]
    ArityMismatch { expected: usize, actual: usize },
    #[error("Malformed table data: {0}")]
    Malformed(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A trait for tabular sources the engine iterates row by row.
///
/// Rows are addressed by a stable ordinal; iterating `rows()` always yields
/// them in the same order, which is what lets a pass be replayed.
pub trait DataSource {
    /// Total number of rows.
    fn row_count(&self) -> usize;

    /// The value of `field` in row `row`.
    fn value_at(&self, row: usize, field: &str) -> Result<Value, SourceError>;

    /// Whether the source exposes a column named `field`.
    fn has_field(&self, field: &str) -> bool;

    /// Row ordinals in source order.
    fn rows(&self) -> Range<usize> {
        0..self.row_count()
    }

    fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

/// An in-memory, column-named table.
///
/// This is the simplest data source, useful for small datasets or testing.
#[derive(Debug, Clone, Default)]
pub struct TableDataSource {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Value>>,
}

impl TableDataSource {
    /// Create an empty table with the given column names.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        Self {
            columns,
            index,
            rows: Vec::new(),
        }
    }

    /// Append a row. The number of values must match the number of columns.
    pub fn add_row<I>(&mut self, values: I) -> Result<(), SourceError>
    where
        I: IntoIterator<Item = Value>,
    {
        let row: Vec<Value> = values.into_iter().collect();
        if row.len() != self.columns.len() {
            return Err(SourceError::ArityMismatch {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Builder-style variant of [`add_row`](Self::add_row).
    pub fn with_row<I>(mut self, values: I) -> Result<Self, SourceError>
    where
        I: IntoIterator<Item = Value>,
    {
        self.add_row(values)?;
        Ok(self)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Load a table from JSON.
    ///
    /// Two shapes are accepted:
    /// - `{"columns": [..], "rows": [[..], ..]}`
    /// - `[{"col": value, ..}, ..]`, where columns are taken in first-seen order
    ///   and missing keys read as null.
    pub fn from_json(json: &JsonValue) -> Result<Self, SourceError> {
        let table = match json {
            JsonValue::Object(map) => {
                let columns: Vec<String> = match map.get("columns") {
                    Some(c) => serde_json::from_value(c.clone())?,
                    None => return Err(SourceError::Malformed("missing 'columns'".to_string())),
                };
                let rows: Vec<Vec<Value>> = match map.get("rows") {
                    Some(r) => serde_json::from_value(r.clone())?,
                    None => Vec::new(),
                };
                let mut table = Self::new(columns);
                for row in rows {
                    table.add_row(row)?;
                }
                table
            }
            JsonValue::Array(items) => {
                let mut columns: Vec<String> = Vec::new();
                for item in items {
                    let obj = item.as_object().ok_or_else(|| {
                        SourceError::Malformed("expected an array of objects".to_string())
                    })?;
                    for key in obj.keys() {
                        if !columns.contains(key) {
                            columns.push(key.clone());
                        }
                    }
                }
                let mut table = Self::new(columns.clone());
                for item in items {
                    let mut row = Vec::with_capacity(columns.len());
                    for column in &columns {
                        row.push(match item.get(column) {
                            Some(v) => serde_json::from_value(v.clone())?,
                            None => Value::Null,
                        });
                    }
                    table.add_row(row)?;
                }
                table
            }
            _ => {
                return Err(SourceError::Malformed(
                    "expected an object or an array".to_string(),
                ));
            }
        };
        debug!(
            "Loaded table with {} columns and {} rows.",
            table.columns.len(),
            table.rows.len()
        );
        Ok(table)
    }
}

impl DataSource for TableDataSource {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn value_at(&self, row: usize, field: &str) -> Result<Value, SourceError> {
        let column = *self
            .index
            .get(field)
            .ok_or_else(|| SourceError::UnknownField(field.to_string()))?;
        let values = self.rows.get(row).ok_or(SourceError::RowOutOfRange {
            row,
            row_count: self.rows.len(),
        })?;
        Ok(values[column].clone())
    }

    fn has_field(&self, field: &str) -> bool {
        self.index.contains_key(field)
    }
}

impl<T: DataSource + ?Sized> DataSource for &T {
    fn row_count(&self) -> usize {
        (**self).row_count()
    }

    fn value_at(&self, row: usize, field: &str) -> Result<Value, SourceError> {
        (**self).value_at(row, field)
    }

    fn has_field(&self, field: &str) -> bool {
        (**self).has_field(field)
    }
}

// Blanket implementation for Box<dyn DataSource>
impl DataSource for Box<dyn DataSource> {
    fn row_count(&self) -> usize {
        (**self).row_count()
    }

    fn value_at(&self, row: usize, field: &str) -> Result<Value, SourceError> {
        (**self).value_at(row, field)
    }

    fn has_field(&self, field: &str) -> bool {
        (**self).has_field(field)
    }
}
