//! Library header record handling.
//!
//! The library header is the first set of records in an XPT file.
//!
//! # Structure
//!
//! 1. Fixed header: `HEADER RECORD*******LIBRARY HEADER RECORD!!!!!!!...`
//!    (`LIBV8` instead of `LIBRARY` for V8 files)
//! 2. Real header (80 bytes): SAS version, OS, created datetime
//! 3. Second header (80 bytes): Modified datetime

use crate::error::{Result, XptError};

use super::XptVersion;

/// Record length in bytes.
pub const RECORD_LEN: usize = 80;

/// V5 library header prefix.
pub const LIBRARY_HEADER_PREFIX: &str = "HEADER RECORD*******LIBRARY HEADER RECORD!!!!!!!";

/// V8 library header prefix.
pub const LIBV8_HEADER_PREFIX: &str = "HEADER RECORD*******LIBV8   HEADER RECORD!!!!!!!";

/// Detect the transport version from the first record of a file.
pub fn detect_version(record: &[u8]) -> Result<XptVersion> {
    if record.len() < RECORD_LEN {
        return Err(XptError::invalid_format("record too short"));
    }
    if record.starts_with(LIBRARY_HEADER_PREFIX.as_bytes()) {
        Ok(XptVersion::V5)
    } else if record.starts_with(LIBV8_HEADER_PREFIX.as_bytes()) {
        Ok(XptVersion::V8)
    } else {
        Err(XptError::missing_header("LIBRARY HEADER"))
    }
}
