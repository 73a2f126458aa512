//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use sas_convert::RowLimit;

#[derive(Parser)]
#[command(
    name = "sas-convert",
    version,
    about = "Convert SAS datasets to CSV",
    long_about = "Convert SAS datasets to CSV.\n\n\
                  Dates, datetimes and times are written in ISO form according to each\n\
                  column's display format; other numbers are written in plain decimal\n\
                  notation rounded to 15 significant digits. Reads SAS transport (XPT)\n\
                  V5 and V8 files."
)]
pub struct Cli {
    /// Dataset to read.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where to write CSV output (default: stdout).
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Print table name, row count and column count.
    #[arg(short = 'i', long = "info")]
    pub info: bool,

    /// Read every row without writing output.
    #[arg(short = 't', long = "test")]
    pub test: bool,

    /// List the columns (id, name, label, format, type, length) as CSV.
    #[arg(short = 'c', long = "columns")]
    pub columns: bool,

    /// Maximum number of data rows to write; -1 writes all rows.
    #[arg(
        short = 'l',
        long = "limit",
        value_name = "N",
        default_value = "-1",
        allow_hyphen_values = true
    )]
    pub limit: RowLimit,

    /// Field separator: a single ASCII character, or `tab`.
    #[arg(
        short = 'd',
        long = "delimiter",
        value_name = "CHAR",
        default_value = ",",
        value_parser = parse_delimiter
    )]
    pub delimiter: u8,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\\t" => Ok(b'\t'),
        _ => match value.as_bytes() {
            [byte] if byte.is_ascii() && *byte != b'"' && *byte != b'\n' => Ok(*byte),
            _ => Err(format!(
                "expected a single ASCII character other than a quote or newline, got {value:?}"
            )),
        },
    }
}
