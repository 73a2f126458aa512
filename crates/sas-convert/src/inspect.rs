//! Read-only operations that share the converter's setup phase.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, warn};

use sas_model::TableSource;

use crate::converter::check_row_length;
use crate::error::{ConvertError, Result};
use crate::sink::RowSink;

/// Header of the column listing.
pub const COLUMN_LISTING_HEADER: [&str; 6] = ["Id", "Name", "Label", "Format", "Type", "Length"];

/// Table-level summary taken from metadata alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableInfo {
    pub name: String,
    pub label: Option<String>,
    pub row_count: u64,
    pub column_count: usize,
}

/// Result of a full structural pass over the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestReport {
    pub name: String,
    pub declared_rows: u64,
    pub rows_read: u64,
    pub elapsed: Duration,
}

impl TestReport {
    /// Whether the rows read match the declared count.
    pub fn counts_match(&self) -> bool {
        self.declared_rows == self.rows_read
    }
}

/// Summarise a table without reading any rows.
pub fn table_info<S: TableSource>(source: &S) -> TableInfo {
    let properties = source.properties();
    TableInfo {
        name: properties.name.clone(),
        label: properties.label.clone(),
        row_count: properties.row_count,
        column_count: source.columns().len(),
    }
}

/// Read every row, checking each against the column count, without
/// rendering anything.
pub fn test_rows<S: TableSource>(mut source: S) -> Result<TestReport> {
    let started = Instant::now();
    let name = source.properties().name.clone();
    let declared_rows = source.properties().row_count;
    let expected = source.columns().len();
    info!(table = %name, declared_rows, "testing data");

    let mut rows_read = 0u64;
    while let Some(row) = source.next_row().map_err(ConvertError::from_source)? {
        check_row_length(&row, expected, rows_read + 1)?;
        rows_read += 1;
    }

    let elapsed = started.elapsed();
    if rows_read != declared_rows {
        warn!(
            table = %name,
            declared_rows,
            rows_read,
            "row count differs from table metadata"
        );
    }
    info!(
        table = %name,
        rows_read,
        duration_ms = elapsed.as_millis(),
        "done testing data"
    );
    Ok(TestReport {
        name,
        declared_rows,
        rows_read,
        elapsed,
    })
}

/// Write one row of metadata per column: id, name, label, format, type
/// and length, under [`COLUMN_LISTING_HEADER`].
///
/// Returns the number of columns listed. The sink is flushed once, also on
/// failure.
pub fn list_columns<S, K>(source: &S, sink: &mut K) -> Result<usize>
where
    S: TableSource,
    K: RowSink + ?Sized,
{
    let written = write_column_rows(source, sink);
    let flushed = sink.flush();
    let count = written?;
    flushed?;
    Ok(count)
}

fn write_column_rows<S, K>(source: &S, sink: &mut K) -> Result<usize>
where
    S: TableSource,
    K: RowSink + ?Sized,
{
    let header: Vec<String> = COLUMN_LISTING_HEADER
        .iter()
        .map(|name| (*name).to_string())
        .collect();
    sink.write_row(&header)?;
    for column in source.columns() {
        let fields = [
            column.id.to_string(),
            column.name.clone(),
            column.label.clone(),
            column.format.clone(),
            column.column_type.as_str().to_string(),
            column.length.to_string(),
        ];
        sink.write_row(&fields)?;
    }
    Ok(source.columns().len())
}
