//! Row streaming from a table source to a row sink.

use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use sas_model::{Column, FormatMask, Row, TableSource};

use crate::error::{ConvertError, ParseRowLimitError, Result};
use crate::render::render_cell;
use crate::sink::{CsvSink, RowSink};

/// Cap on the number of data rows a conversion emits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowLimit {
    #[default]
    Unlimited,
    Rows(u64),
}

impl RowLimit {
    /// Whether another row may be emitted after `emitted` rows.
    pub fn allows(&self, emitted: u64) -> bool {
        match self {
            RowLimit::Unlimited => true,
            RowLimit::Rows(max) => emitted < *max,
        }
    }
}

impl FromStr for RowLimit {
    type Err = ParseRowLimitError;

    /// `-1` means no limit; any other value must be a non-negative count.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == "-1" {
            return Ok(RowLimit::Unlimited);
        }
        trimmed
            .parse::<u64>()
            .map(RowLimit::Rows)
            .map_err(|_| ParseRowLimitError {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for RowLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowLimit::Unlimited => write!(f, "-1"),
            RowLimit::Rows(n) => write!(f, "{n}"),
        }
    }
}

/// Run configuration for a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    pub row_limit: RowLimit,
    /// Field separator byte (default `,`).
    pub delimiter: u8,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            row_limit: RowLimit::Unlimited,
            delimiter: b',',
        }
    }
}

impl ConvertOptions {
    #[must_use]
    pub fn with_row_limit(mut self, row_limit: RowLimit) -> Self {
        self.row_limit = row_limit;
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Delimited sink over `writer` using the configured separator.
    pub fn sink<W: Write>(&self, writer: W) -> CsvSink<W> {
        CsvSink::with_delimiter(writer, self.delimiter)
    }
}

/// Outcome of a completed conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConvertSummary {
    pub table: String,
    pub columns: usize,
    pub rows_written: u64,
}

/// Per-column rendering plan, fixed for the whole run.
struct ColumnPlan {
    names: Vec<String>,
    masks: Vec<FormatMask>,
}

impl ColumnPlan {
    fn new(columns: &[Column]) -> Self {
        let mut names = Vec::with_capacity(columns.len());
        let mut masks = Vec::with_capacity(columns.len());
        for column in columns {
            let mask = FormatMask::classify(column);
            debug!(
                column = %column.name,
                format = %column.format,
                column_type = %column.column_type,
                mask = %mask,
                "column format"
            );
            names.push(column.name.clone());
            masks.push(mask);
        }
        Self { names, masks }
    }

    fn len(&self) -> usize {
        self.masks.len()
    }

    /// Render `row` into `out`, replacing its previous contents.
    fn render_into(&self, row: &Row, row_number: u64, out: &mut Vec<String>) -> Result<()> {
        check_row_length(row, self.len(), row_number)?;
        out.clear();
        for ((cell, mask), name) in row.iter().zip(&self.masks).zip(&self.names) {
            let text = render_cell(cell.as_ref(), *mask).map_err(|source| ConvertError::Render {
                row: row_number,
                column: name.clone(),
                source,
            })?;
            out.push(text);
        }
        Ok(())
    }
}

/// Fail on a row whose cell count differs from the column count.
pub(crate) fn check_row_length(row: &Row, expected: usize, row_number: u64) -> Result<()> {
    if row.len() != expected {
        return Err(ConvertError::RowLength {
            row: row_number,
            expected,
            actual: row.len(),
        });
    }
    Ok(())
}

/// Convert a table to delimited rows.
///
/// Writes a header of column names, then one rendered row per source row
/// until the source is exhausted or `limit` rows have been written. Rows
/// past the limit are never pulled from the source. The sink is flushed
/// exactly once, also when the run fails; rows written before a failure are
/// left in place.
pub fn convert<S, K>(mut source: S, sink: &mut K, limit: RowLimit) -> Result<ConvertSummary>
where
    S: TableSource,
    K: RowSink + ?Sized,
{
    let started = Instant::now();
    let table = source.properties().name.clone();
    let plan = ColumnPlan::new(source.columns());

    let streamed = stream_rows(&mut source, sink, &plan, limit);
    let flushed = sink.flush();
    let rows_written = streamed?;
    flushed?;

    info!(
        table = %table,
        columns = plan.len(),
        rows = rows_written,
        limit = %limit,
        duration_ms = started.elapsed().as_millis(),
        "conversion complete"
    );
    Ok(ConvertSummary {
        table,
        columns: plan.len(),
        rows_written,
    })
}

fn stream_rows<S, K>(source: &mut S, sink: &mut K, plan: &ColumnPlan, limit: RowLimit) -> Result<u64>
where
    S: TableSource,
    K: RowSink + ?Sized,
{
    sink.write_row(&plan.names)?;

    let mut rendered = Vec::with_capacity(plan.len());
    let mut emitted = 0u64;
    while limit.allows(emitted) {
        let Some(row) = source.next_row().map_err(ConvertError::from_source)? else {
            break;
        };
        plan.render_into(&row, emitted + 1, &mut rendered)?;
        sink.write_row(&rendered)?;
        emitted += 1;
    }
    Ok(emitted)
}
