//! LABELV8 / LABELV9 extension sections.
//!
//! V8 files store labels longer than 40 characters (and, in the V9 flavour,
//! formats longer than 8 characters) in an optional section between the
//! NAMESTR records and the OBS header.
//!
//! # Entry layout
//!
//! | Section | Fixed part (big-endian shorts)                     | Variable part                    |
//! |---------|----------------------------------------------------|----------------------------------|
//! | LABELV8 | varnum, name len, label len                        | name, label                      |
//! | LABELV9 | varnum, name len, format len, informat len, label len | name, label, format, informat |
//!
//! The number of entries is written as ASCII digits after the 48-byte
//! header prefix.

use sas_model::Column;

use crate::error::{Result, XptError};

use super::library::RECORD_LEN;
use super::read_i16;

/// LABELV8 header prefix.
pub const LABELV8_HEADER_PREFIX: &str = "HEADER RECORD*******LABELV8 HEADER RECORD!!!!!!!";
/// LABELV9 header prefix.
pub const LABELV9_HEADER_PREFIX: &str = "HEADER RECORD*******LABELV9 HEADER RECORD!!!!!!!";

/// Flavour of an extended label section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSection {
    /// Long labels only.
    V8,
    /// Long labels plus long format and informat names.
    V9,
}

/// Identify a label section header record.
pub fn label_section_kind(record: &[u8]) -> Option<LabelSection> {
    if record.starts_with(LABELV8_HEADER_PREFIX.as_bytes()) {
        Some(LabelSection::V8)
    } else if record.starts_with(LABELV9_HEADER_PREFIX.as_bytes()) {
        Some(LabelSection::V9)
    } else {
        None
    }
}

/// Number of entries announced by a label section header.
pub fn label_entry_count(record: &[u8]) -> Result<usize> {
    let digits = record
        .get(48..RECORD_LEN)
        .map(|slice| String::from_utf8_lossy(slice).trim().to_string())
        .unwrap_or_default();
    digits.parse::<usize>().map_err(|_| XptError::NumericParse {
        field: "label count".to_string(),
    })
}

/// Apply `count` entries of a label section to the parsed columns.
///
/// `data` holds the section body (everything after the header record, up
/// to the OBS header). Entries referring to unknown variables are skipped.
pub fn apply_label_section(
    data: &[u8],
    kind: LabelSection,
    count: usize,
    columns: &mut [Column],
) -> Result<()> {
    let fixed = match kind {
        LabelSection::V8 => 6,
        LabelSection::V9 => 10,
    };
    let mut offset = 0;

    for _ in 0..count {
        if offset + fixed > data.len() {
            return Err(XptError::invalid_format("label section truncated"));
        }
        let varnum = read_len(data, offset);
        let name_len = read_len(data, offset + 2);
        let (format_len, informat_len, label_len) = match kind {
            LabelSection::V8 => (0, 0, read_len(data, offset + 4)),
            LabelSection::V9 => (
                read_len(data, offset + 4),
                read_len(data, offset + 6),
                read_len(data, offset + 8),
            ),
        };
        offset += fixed;

        let name = take(data, &mut offset, name_len)?;
        let label = take(data, &mut offset, label_len)?;
        let format = take(data, &mut offset, format_len)?;
        take(data, &mut offset, informat_len)?;

        let Some(column) = varnum
            .checked_sub(1)
            .and_then(|idx| columns.get_mut(idx))
        else {
            tracing::debug!(varnum, "label entry for unknown variable skipped");
            continue;
        };
        if !name.is_empty() {
            column.name = name;
        }
        column.label = label;
        if !format.is_empty() {
            column.format = format_name(&format).to_string();
        }
    }

    Ok(())
}

fn read_len(data: &[u8], offset: usize) -> usize {
    usize::try_from(read_i16(data, offset)).unwrap_or(0)
}

fn take(data: &[u8], offset: &mut usize, len: usize) -> Result<String> {
    let bytes = data
        .get(*offset..*offset + len)
        .ok_or_else(|| XptError::invalid_format("label section truncated"))?;
    *offset += len;
    Ok(String::from_utf8_lossy(bytes)
        .trim_end_matches([' ', '\0'])
        .to_string())
}

/// Strip the width and decimals from a format specification
/// (`DATETIME20.` becomes `DATETIME`).
fn format_name(spec: &str) -> &str {
    match spec.rfind('.') {
        Some(pos) => spec[..pos].trim_end_matches(|c: char| c.is_ascii_digit()),
        None => spec,
    }
}
