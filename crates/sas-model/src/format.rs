//! Display-format classification.
//!
//! SAS stores dates, datetimes and times as plain numbers; only the
//! variable's display format says how a number should be read. The name
//! tables below decide which numeric columns carry temporal values.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::column::Column;

/// Formats that show day, month and year.
pub const DATE_FORMATS: &[&str] = &[
    "DATE", "YYMMDD", "YYMMDDB", "YYMMDDC", "YYMMDDD", "YYMMDDN", "YYMMDDP", "YYMMDDS", "MMDDYY",
    "MMDDYYB", "MMDDYYC", "MMDDYYD", "MMDDYYN", "MMDDYYP", "MMDDYYS", "DDMMYY", "DDMMYYB",
    "DDMMYYC", "DDMMYYD", "DDMMYYN", "DDMMYYP", "DDMMYYS", "MMYY", "MMYYC", "MMYYD", "MMYYN",
    "MMYYP", "MMYYS", "YYMM", "YYMMC", "YYMMD", "YYMMN", "YYMMP", "YYMMS", "MONYY", "YYMON",
];

/// Formats that show a date and a time of day.
pub const DATETIME_FORMATS: &[&str] = &["DATETIME"];

/// Formats that show a time of day.
pub const TIME_FORMATS: &[&str] = &["TIME", "HHMM"];

/// Rendering category of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatMask {
    String,
    Number,
    Date,
    DateTime,
    Time,
}

impl FormatMask {
    /// Classify a column by its logical type and display-format name.
    ///
    /// Character columns are always [`FormatMask::String`], whatever their
    /// format. Numeric columns are matched against the format tables by exact,
    /// case-sensitive name and fall back to [`FormatMask::Number`].
    pub fn classify(column: &Column) -> Self {
        if !column.column_type.is_numeric() {
            return FormatMask::String;
        }
        Self::for_numeric_format(&column.format)
    }

    /// Category of a numeric column with the given format name.
    pub fn for_numeric_format(format: &str) -> Self {
        if DATE_FORMATS.contains(&format) {
            FormatMask::Date
        } else if DATETIME_FORMATS.contains(&format) {
            FormatMask::DateTime
        } else if TIME_FORMATS.contains(&format) {
            FormatMask::Time
        } else {
            FormatMask::Number
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatMask::String => "STRING",
            FormatMask::Number => "NUMBER",
            FormatMask::Date => "DATE",
            FormatMask::DateTime => "DATETIME",
            FormatMask::Time => "TIME",
        }
    }

    /// Whether numbers in this category are calendar values.
    pub fn is_calendar(&self) -> bool {
        matches!(self, FormatMask::Date | FormatMask::DateTime)
    }
}

impl fmt::Display for FormatMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
