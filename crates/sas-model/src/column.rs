//! Column metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::format::FormatMask;

/// Logical storage type of a SAS variable.
///
/// SAS only knows two types: fixed-width character data and 8-byte
/// (possibly truncated) floating point numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    String,
    Number,
}

impl ColumnType {
    /// Type name as shown in column listings.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "String",
            ColumnType::Number => "Number",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Number)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Metadata describing one field position across all rows of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// 1-based ordinal position.
    pub id: u32,
    pub name: String,
    pub label: String,
    /// Display-format name without width or decimals (e.g. `DATE`, `BEST`).
    /// Empty when the variable has no format.
    pub format: String,
    pub column_type: ColumnType,
    /// Storage length in bytes.
    pub length: u32,
}

impl Column {
    /// Create a character column.
    pub fn string(id: u32, name: impl Into<String>, length: u32) -> Self {
        Self {
            id,
            name: name.into(),
            label: String::new(),
            format: String::new(),
            column_type: ColumnType::String,
            length,
        }
    }

    /// Create an 8-byte numeric column.
    pub fn number(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            label: String::new(),
            format: String::new(),
            column_type: ColumnType::Number,
            length: 8,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    #[must_use]
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = length;
        self
    }

    /// Rendering category of this column.
    pub fn format_mask(&self) -> FormatMask {
        FormatMask::classify(self)
    }
}
