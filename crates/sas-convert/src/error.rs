//! Error types for conversion runs.

use sas_model::FormatMask;
use thiserror::Error;

/// A cell value that cannot be rendered under its column's format.
#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    /// The value's runtime shape does not fit the format mask.
    #[error("expected {expected} for a {mask} column, found {found}")]
    ShapeMismatch {
        mask: FormatMask,
        expected: &'static str,
        found: &'static str,
    },

    /// NaN or infinity in a numeric column.
    #[error("cannot render non-finite number {value}")]
    NonFinite { value: f64 },
}

impl RenderError {
    pub(crate) fn mismatch(mask: FormatMask, expected: &'static str, found: &'static str) -> Self {
        Self::ShapeMismatch {
            mask,
            expected,
            found,
        }
    }
}

/// Errors that abort a conversion run.
///
/// Every variant is fatal: rows already pushed to the sink stay there and no
/// further rows are emitted.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The decoder failed to produce a row.
    #[error("failed to read source")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A row whose cell count differs from the column count.
    #[error("row {row} has {actual} cells but the table has {expected} columns")]
    RowLength {
        row: u64,
        expected: usize,
        actual: usize,
    },

    /// A cell that cannot be rendered.
    #[error("cannot render row {row}, column {column}")]
    Render {
        row: u64,
        column: String,
        #[source]
        source: RenderError,
    },

    /// Writing to the sink failed.
    #[error("failed to write output")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    pub(crate) fn from_source<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Source(Box::new(error))
    }
}

/// Rejected row-limit text.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid row limit '{value}': expected a non-negative count or -1 for no limit")]
pub struct ParseRowLimitError {
    pub value: String,
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;
