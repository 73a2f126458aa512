//! Command runners behind the `sas-convert` binary.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use sas_convert::{
    ConvertOptions, ConvertSummary, TableInfo, TestReport, convert, list_columns, table_info,
    test_rows,
};

use crate::input::open_source;

/// What a run does with its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Info,
    Test,
    Columns,
    Convert,
}

impl Mode {
    /// Pick the mode from the command-line flags; info wins over test,
    /// test over columns, and conversion is the default.
    pub fn from_flags(info: bool, test: bool, columns: bool) -> Self {
        if info {
            Mode::Info
        } else if test {
            Mode::Test
        } else if columns {
            Mode::Columns
        } else {
            Mode::Convert
        }
    }
}

/// Report table metadata without reading rows.
pub fn run_info(input: &Path) -> Result<TableInfo> {
    let source = open_source(input)?;
    let summary = table_info(&source);
    info!(
        table = %summary.name,
        rows = summary.row_count,
        columns = summary.column_count,
        "read table metadata"
    );
    Ok(summary)
}

/// Read every row without writing output.
pub fn run_test(input: &Path) -> Result<TestReport> {
    let source = open_source(input)?;
    test_rows(source).with_context(|| format!("test {}", input.display()))
}

/// Write the column listing to `output` (stdout when `None`).
pub fn run_columns(input: &Path, output: Option<&Path>, options: &ConvertOptions) -> Result<usize> {
    let source = open_source(input)?;
    let mut sink = options.sink(open_output(output)?);
    list_columns(&source, &mut sink).with_context(|| format!("list columns of {}", input.display()))
}

/// Convert `input` to delimited text written to `output` (stdout when `None`).
pub fn run_convert(
    input: &Path,
    output: Option<&Path>,
    options: &ConvertOptions,
) -> Result<ConvertSummary> {
    let span = info_span!("convert", input = %input.display());
    let _guard = span.enter();

    let source = open_source(input)?;
    let mut sink = options.sink(open_output(output)?);
    convert(source, &mut sink, options.row_limit)
        .with_context(|| format!("convert {}", input.display()))
}

fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}
