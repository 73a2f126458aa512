use thiserror::Error;

/// Errors raised by [`MemorySource`](crate::MemorySource).
#[derive(Debug, Error)]
pub enum MemorySourceError {
    #[error("row {row} failed to decode: {message}")]
    Decode { row: u64, message: String },
}

pub type Result<T> = std::result::Result<T, MemorySourceError>;
