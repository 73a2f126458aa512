//! NAMESTR record parsing.
//!
//! The NAMESTR record describes a single variable in an XPT dataset.
//! Each NAMESTR is 140 bytes (or 136 bytes for VAX/VMS).
//!
//! # NAMESTR Structure (140 bytes)
//!
//! | Offset  | Field   | Type     | Description                    |
//! |---------|---------|----------|--------------------------------|
//! | 0-1     | ntype   | short    | 1=NUMERIC, 2=CHAR              |
//! | 2-3     | nhfun   | short    | Hash (always 0)                |
//! | 4-5     | nlng    | short    | Variable length in observation |
//! | 6-7     | nvar0   | short    | Variable number                |
//! | 8-15    | nname   | char[8]  | Variable name                  |
//! | 16-55   | nlabel  | char[40] | Variable label                 |
//! | 56-63   | nform   | char[8]  | Format name                    |
//! | 64-65   | nfl     | short    | Format field length            |
//! | 66-67   | nfd     | short    | Format decimals                |
//! | 68-69   | nfj     | short    | Justification (0=left, 1=right)|
//! | 70-71   | nfill   | char[2]  | Padding                        |
//! | 72-79   | niform  | char[8]  | Informat name                  |
//! | 80-81   | nifl    | short    | Informat length                |
//! | 82-83   | nifd    | short    | Informat decimals              |
//! | 84-87   | npos    | long     | Position in observation        |
//! | 88-119  | longname| char[32] | V8 only: full variable name    |
//! | 120-139 | rest    | char[20] | Reserved                       |

use sas_model::Column;

use crate::error::{Result, XptError};

use super::{XptVersion, read_i16, read_string};

/// Standard NAMESTR length.
pub const NAMESTR_LEN: usize = 140;

/// VAX/VMS NAMESTR length (shorter reserved section).
pub const NAMESTR_LEN_VAX: usize = 136;

/// A parsed variable definition together with where its bytes sit in an
/// observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namestr {
    pub column: Column,
    /// Byte offset of the variable inside one observation.
    pub position: usize,
}

impl Namestr {
    /// Byte range of the variable inside one observation.
    pub fn span(&self) -> std::ops::Range<usize> {
        self.position..self.position + self.column.length as usize
    }
}

/// Parse a single NAMESTR record.
///
/// # Arguments
/// * `data` - Byte slice containing the NAMESTR data
/// * `namestr_len` - Length of NAMESTR (140 or 136 for VAX/VMS)
/// * `index` - 0-based variable index; the column id is `index + 1`
/// * `version` - V8 files carry a 32-character name at offset 88
pub fn parse_namestr(
    data: &[u8],
    namestr_len: usize,
    index: usize,
    version: XptVersion,
) -> Result<Namestr> {
    if data.len() < namestr_len.max(88) {
        return Err(XptError::InvalidNamestr {
            index,
            message: format!("data too short: {} bytes", data.len()),
        });
    }

    let ntype = read_i16(data, 0);
    let length = read_i16(data, 4);
    if length <= 0 {
        return Err(XptError::InvalidNamestr {
            index,
            message: format!("invalid variable length: {length}"),
        });
    }
    let length = length as u32;

    let mut name = read_string(data, 8, 8);
    if version == XptVersion::V8 && data.len() >= 120 {
        let long_name = read_string(data, 88, 32);
        if !long_name.is_empty() {
            name = long_name;
        }
    }
    if name.is_empty() {
        return Err(XptError::InvalidNamestr {
            index,
            message: "empty variable name".to_string(),
        });
    }

    let id = u32::try_from(index + 1).map_err(|_| XptError::ObservationOverflow)?;
    let column = match ntype {
        1 => {
            if length > 8 {
                return Err(XptError::InvalidNamestr {
                    index,
                    message: format!("numeric length {length} exceeds 8 bytes"),
                });
            }
            Column::number(id, name).with_length(length)
        }
        2 => Column::string(id, name, length),
        other => {
            return Err(XptError::InvalidNamestr {
                index,
                message: format!("invalid ntype: {other}"),
            });
        }
    }
    .with_label(read_string(data, 16, 40))
    .with_format(read_string(data, 56, 8));

    let position = i32::from_be_bytes([data[84], data[85], data[86], data[87]]);
    let position = usize::try_from(position).map_err(|_| XptError::InvalidNamestr {
        index,
        message: format!("negative position: {position}"),
    })?;

    Ok(Namestr { column, position })
}

/// Parse multiple NAMESTR records.
pub fn parse_namestr_records(
    data: &[u8],
    var_count: usize,
    namestr_len: usize,
    version: XptVersion,
) -> Result<Vec<Namestr>> {
    let mut variables = Vec::with_capacity(var_count);

    for idx in 0..var_count {
        let offset = idx
            .checked_mul(namestr_len)
            .ok_or(XptError::ObservationOverflow)?;

        let record =
            data.get(offset..offset + namestr_len)
                .ok_or_else(|| XptError::InvalidNamestr {
                    index: idx,
                    message: "NAMESTR data out of bounds".to_string(),
                })?;

        variables.push(parse_namestr(record, namestr_len, idx, version)?);
    }

    Ok(variables)
}
