//! XPT header record parsing.
//!
//! This module handles the various header records in an XPT file:
//! - Library headers (file-level metadata, version detection)
//! - Member headers (dataset-level metadata)
//! - NAMESTR records (variable definitions)
//! - LABELV8/LABELV9 sections (long labels and format names)
//! - OBS header (marks start of observation data)

pub mod label;
pub mod library;
pub mod member;
pub mod namestr;

use std::fmt;

pub use label::{LabelSection, apply_label_section, label_entry_count, label_section_kind};
pub use library::{RECORD_LEN, detect_version};
pub use member::{
    align_to_record, parse_dataset_label, parse_dataset_name, parse_dataset_type,
    parse_namestr_len, parse_variable_count, validate_dscrptr_header, validate_member_header,
    validate_namestr_header, validate_obs_header,
};
pub use namestr::{NAMESTR_LEN, NAMESTR_LEN_VAX, Namestr, parse_namestr, parse_namestr_records};

/// SAS Transport format version.
///
/// | Feature        | V5 Limit | V8 Limit |
/// |----------------|----------|----------|
/// | Variable name  | 8 chars  | 32 chars |
/// | Variable label | 40 chars | 256 chars|
/// | Format name    | 8 chars  | 32 chars |
/// | Dataset name   | 8 chars  | 32 chars |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum XptVersion {
    /// V5/V6 format.
    #[default]
    V5,
    /// V8/V9 format (extended names and labels).
    V8,
}

impl XptVersion {
    /// Maximum length for dataset names.
    #[must_use]
    pub const fn dataset_name_limit(self) -> usize {
        match self {
            Self::V5 => 8,
            Self::V8 => 32,
        }
    }
}

impl fmt::Display for XptVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V5 => write!(f, "V5"),
            Self::V8 => write!(f, "V8"),
        }
    }
}

/// Read a string from bytes, trimming trailing spaces and NULs.
pub(crate) fn read_string(data: &[u8], offset: usize, len: usize) -> String {
    data.get(offset..offset + len)
        .map(|slice| {
            String::from_utf8_lossy(slice)
                .trim_end_matches([' ', '\0'])
                .to_string()
        })
        .unwrap_or_default()
}

/// Read a big-endian i16.
pub(crate) fn read_i16(data: &[u8], offset: usize) -> i16 {
    let bytes = [data[offset], data[offset + 1]];
    i16::from_be_bytes(bytes)
}
