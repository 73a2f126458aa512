//! Error types for XPT reading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading XPT files.
#[derive(Debug, Error)]
pub enum XptError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Invalid XPT file format.
    #[error("invalid XPT file: {message}")]
    InvalidFormat { message: String },

    /// Missing required header record.
    #[error("missing header: expected {expected}")]
    MissingHeader { expected: &'static str },

    /// Invalid NAMESTR record.
    #[error("invalid NAMESTR at index {index}: {message}")]
    InvalidNamestr { index: usize, message: String },

    /// File ends inside a header or observation.
    #[error("unexpected end of file at offset {offset}")]
    Truncated { offset: u64 },

    /// Numeric field parsing error.
    #[error("failed to parse numeric field: {field}")]
    NumericParse { field: String },

    /// Observation data overflow.
    #[error("observation length overflow")]
    ObservationOverflow,

    /// Unexpected trailing bytes.
    #[error("unexpected trailing bytes in observations")]
    TrailingBytes,

    /// I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

/// Result type alias for XPT operations.
pub type Result<T> = std::result::Result<T, XptError>;

impl XptError {
    /// Create an InvalidFormat error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Create a MissingHeader error.
    pub fn missing_header(expected: &'static str) -> Self {
        Self::MissingHeader { expected }
    }

    /// Map an I/O error, reporting a short read as truncation at `offset`.
    pub(crate) fn from_read(error: std::io::Error, offset: u64) -> Self {
        if error.kind() == std::io::ErrorKind::UnexpectedEof {
            Self::Truncated { offset }
        } else {
            Self::Io(error)
        }
    }
}
