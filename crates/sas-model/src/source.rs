//! The decoder seam.

use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::error::MemorySourceError;
use crate::value::Row;

/// Table-level metadata reported by a decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableProperties {
    pub name: String,
    pub label: Option<String>,
    /// Row count declared by the file's own metadata.
    pub row_count: u64,
}

impl TableProperties {
    pub fn new(name: impl Into<String>, row_count: u64) -> Self {
        Self {
            name: name.into(),
            label: None,
            row_count,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A decoded table that yields its rows one at a time.
///
/// Rows come out in file order and cannot be rewound; a second pass needs a
/// new source. Every row is expected to hold exactly one cell per column,
/// but consumers check this themselves.
pub trait TableSource {
    type Error: std::error::Error + Send + Sync + 'static;

    fn properties(&self) -> &TableProperties;

    fn columns(&self) -> &[Column];

    /// Next row, or `None` once the data is exhausted.
    fn next_row(&mut self) -> Result<Option<Row>, Self::Error>;
}

impl<S: TableSource + ?Sized> TableSource for &mut S {
    type Error = S::Error;

    fn properties(&self) -> &TableProperties {
        (**self).properties()
    }

    fn columns(&self) -> &[Column] {
        (**self).columns()
    }

    fn next_row(&mut self) -> Result<Option<Row>, Self::Error> {
        (**self).next_row()
    }
}

/// A table held in memory.
///
/// Hands out its rows in order and counts how many were pulled. Rows can be
/// given any length, so it also serves to exercise structural checks.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    properties: TableProperties,
    columns: Vec<Column>,
    rows: std::collections::VecDeque<Row>,
    failure: Option<(u64, String)>,
    pulled: u64,
}

impl MemorySource {
    /// Create a source whose declared row count matches the rows given.
    pub fn new(name: impl Into<String>, columns: Vec<Column>, rows: Vec<Row>) -> Self {
        let properties = TableProperties::new(name, rows.len() as u64);
        Self {
            properties,
            columns,
            rows: rows.into(),
            failure: None,
            pulled: 0,
        }
    }

    #[must_use]
    pub fn with_properties(mut self, properties: TableProperties) -> Self {
        self.properties = properties;
        self
    }

    /// Fail with a decode error when row `row` (0-based) is requested.
    #[must_use]
    pub fn failing_at(mut self, row: u64, message: impl Into<String>) -> Self {
        self.failure = Some((row, message.into()));
        self
    }

    /// Number of rows handed out so far.
    pub fn rows_pulled(&self) -> u64 {
        self.pulled
    }
}

impl TableSource for MemorySource {
    type Error = MemorySourceError;

    fn properties(&self) -> &TableProperties {
        &self.properties
    }

    fn columns(&self) -> &[Column] {
        &self.columns
    }

    fn next_row(&mut self) -> Result<Option<Row>, Self::Error> {
        if let Some((row, message)) = &self.failure
            && *row == self.pulled
        {
            return Err(MemorySourceError::Decode {
                row: *row,
                message: message.clone(),
            });
        }
        let next = self.rows.pop_front();
        if next.is_some() {
            self.pulled += 1;
        }
        Ok(next)
    }
}
