//! Member header record handling.
//!
//! Each dataset (member) in an XPT file has its own set of header records.
//!
//! # Structure
//!
//! 1. Member header: `HEADER RECORD*******MEMBER  HEADER RECORD!!!!!!!...`
//! 2. DSCRPTR header: `HEADER RECORD*******DSCRPTR HEADER RECORD!!!!!!!...`
//! 3. Member data (80 bytes): Dataset name, version, etc.
//! 4. Member second (80 bytes): Modified datetime, label, type
//! 5. NAMESTR header: `HEADER RECORD*******NAMESTR HEADER RECORD!!!!!!!...`
//! 6. NAMESTR records: Variable definitions
//! 7. OBS header: `HEADER RECORD*******OBS     HEADER RECORD!!!!!!!...`
//! 8. Observation data
//!
//! V8 files use `MEMBV8`, `DSCPTV8`, `NAMSTV8` and `OBSV8` in place of the
//! V5 record names.

use crate::error::{Result, XptError};

use super::library::RECORD_LEN;
use super::{XptVersion, read_string};

/// Member header prefix.
pub const MEMBER_HEADER_PREFIX: &str = "HEADER RECORD*******MEMBER  HEADER RECORD!!!!!!!";
/// V8 member header prefix.
pub const MEMBV8_HEADER_PREFIX: &str = "HEADER RECORD*******MEMBV8  HEADER RECORD!!!!!!!";

/// DSCRPTR header prefix.
pub const DSCRPTR_HEADER_PREFIX: &str = "HEADER RECORD*******DSCRPTR HEADER RECORD!!!!!!!";
/// V8 DSCRPTR header prefix.
pub const DSCPTV8_HEADER_PREFIX: &str = "HEADER RECORD*******DSCPTV8 HEADER RECORD!!!!!!!";

/// NAMESTR header prefix.
pub const NAMESTR_HEADER_PREFIX: &str = "HEADER RECORD*******NAMESTR HEADER RECORD!!!!!!!";
/// V8 NAMESTR header prefix.
pub const NAMSTV8_HEADER_PREFIX: &str = "HEADER RECORD*******NAMSTV8 HEADER RECORD!!!!!!!";

/// OBS header prefix.
pub const OBS_HEADER_PREFIX: &str = "HEADER RECORD*******OBS     HEADER RECORD!!!!!!!";
/// V8 OBS header prefix.
pub const OBSV8_HEADER_PREFIX: &str = "HEADER RECORD*******OBSV8   HEADER RECORD!!!!!!!";

fn validate_prefix(
    record: &[u8],
    version: XptVersion,
    v5_prefix: &str,
    v8_prefix: &str,
    expected: &'static str,
) -> Result<()> {
    if record.len() < RECORD_LEN {
        return Err(XptError::invalid_format(format!(
            "{} too short",
            expected.to_lowercase()
        )));
    }
    let prefix = match version {
        XptVersion::V5 => v5_prefix,
        XptVersion::V8 => v8_prefix,
    };
    if !record.starts_with(prefix.as_bytes()) {
        return Err(XptError::missing_header(expected));
    }
    Ok(())
}

/// Validate a member header record.
pub fn validate_member_header(record: &[u8], version: XptVersion) -> Result<()> {
    validate_prefix(
        record,
        version,
        MEMBER_HEADER_PREFIX,
        MEMBV8_HEADER_PREFIX,
        "MEMBER HEADER",
    )
}

/// Validate a DSCRPTR header record.
pub fn validate_dscrptr_header(record: &[u8], version: XptVersion) -> Result<()> {
    validate_prefix(
        record,
        version,
        DSCRPTR_HEADER_PREFIX,
        DSCPTV8_HEADER_PREFIX,
        "DSCRPTR HEADER",
    )
}

/// Validate a NAMESTR header record.
pub fn validate_namestr_header(record: &[u8], version: XptVersion) -> Result<()> {
    validate_prefix(
        record,
        version,
        NAMESTR_HEADER_PREFIX,
        NAMSTV8_HEADER_PREFIX,
        "NAMESTR HEADER",
    )
}

/// Validate an OBS header record.
pub fn validate_obs_header(record: &[u8], version: XptVersion) -> Result<()> {
    validate_prefix(
        record,
        version,
        OBS_HEADER_PREFIX,
        OBSV8_HEADER_PREFIX,
        "OBS HEADER",
    )
}

/// Parse NAMESTR length from member header record.
///
/// The NAMESTR length is at offset 74-77 (4 ASCII digits).
/// Returns 140 (standard) or 136 (VAX/VMS).
pub fn parse_namestr_len(record: &[u8]) -> Result<usize> {
    if record.len() < 78 {
        return Err(XptError::invalid_format("member header too short"));
    }
    parse_digits(record, 74, 4, "NAMESTR length")
}

/// Parse variable count from NAMESTR header record.
///
/// The variable count starts at offset 54: 4 ASCII digits in V5 files,
/// 6 in V8 files.
pub fn parse_variable_count(record: &[u8], version: XptVersion) -> Result<usize> {
    let width = match version {
        XptVersion::V5 => 4,
        XptVersion::V8 => 6,
    };
    if record.len() < 54 + width {
        return Err(XptError::invalid_format("namestr header too short"));
    }
    parse_digits(record, 54, width, "variable count")
}

/// Parse dataset name from member data record.
///
/// Dataset name starts at offset 8: 8 characters in V5, 32 in V8.
pub fn parse_dataset_name(record: &[u8], version: XptVersion) -> Result<String> {
    let width = version.dataset_name_limit();
    if record.len() < 8 + width {
        return Err(XptError::invalid_format("member data too short"));
    }
    let name = read_string(record, 8, width);
    if name.is_empty() {
        return Err(XptError::invalid_format("empty dataset name"));
    }
    Ok(name)
}

/// Parse dataset label from member second record.
///
/// Dataset label is at offset 32-71 (40 characters).
pub fn parse_dataset_label(record: &[u8]) -> Option<String> {
    if record.len() < 72 {
        return None;
    }
    let label = read_string(record, 32, 40);
    if label.is_empty() { None } else { Some(label) }
}

/// Parse dataset type from member second record.
///
/// Dataset type is at offset 72-79 (8 characters).
pub fn parse_dataset_type(record: &[u8]) -> Option<String> {
    if record.len() < 80 {
        return None;
    }
    let dtype = read_string(record, 72, 8);
    if dtype.is_empty() { None } else { Some(dtype) }
}

fn parse_digits(record: &[u8], offset: usize, len: usize, field: &str) -> Result<usize> {
    read_string(record, offset, len)
        .trim()
        .parse::<usize>()
        .map_err(|_| XptError::NumericParse {
            field: field.to_string(),
        })
}

/// Align a size to the next record boundary (80 bytes).
#[must_use]
pub fn align_to_record(size: usize) -> usize {
    size.div_ceil(RECORD_LEN) * RECORD_LEN
}
