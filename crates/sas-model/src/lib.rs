//! Core types shared by the SAS dataset decoders and the CSV converter.
//!
//! - [`Column`] and [`ColumnType`]: per-column metadata as reported by a decoder
//! - [`CellValue`] and [`Row`]: raw decoded cell values
//! - [`FormatMask`]: the rendering category derived from a column's display format
//! - [`TableSource`]: the seam every decoder implements

pub mod column;
pub mod error;
pub mod format;
pub mod source;
pub mod value;

pub use column::{Column, ColumnType};
pub use error::{MemorySourceError, Result};
pub use format::{DATE_FORMATS, DATETIME_FORMATS, FormatMask, TIME_FORMATS};
pub use source::{MemorySource, TableProperties, TableSource};
pub use value::{CellValue, Row};
