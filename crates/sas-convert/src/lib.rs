//! Format-aware conversion of SAS tables to delimited text.
//!
//! The converter pulls rows from any [`TableSource`](sas_model::TableSource),
//! renders each cell according to its column's [`FormatMask`](sas_model::FormatMask)
//! and pushes the rendered row straight to a [`RowSink`]. Only one row is held
//! in memory at a time.
//!
//! # Example
//!
//! ```
//! use sas_convert::{CsvSink, RowLimit, convert};
//! use sas_model::{CellValue, Column, MemorySource};
//!
//! let source = MemorySource::new(
//!     "DM",
//!     vec![Column::string(1, "Name", 8), Column::number(2, "Age")],
//!     vec![vec![Some(CellValue::text("Ann")), Some(CellValue::Integer(41))]],
//! );
//! let mut sink = CsvSink::new(Vec::new());
//! convert(source, &mut sink, RowLimit::Unlimited).unwrap();
//! let csv = String::from_utf8(sink.into_inner().unwrap()).unwrap();
//! assert_eq!(csv, "Name,Age\nAnn,41\n");
//! ```

mod converter;
mod error;
mod inspect;
pub mod number;
pub mod render;
mod sink;

pub use converter::{ConvertOptions, ConvertSummary, RowLimit, convert};
pub use error::{ConvertError, ParseRowLimitError, RenderError, Result};
pub use inspect::{COLUMN_LISTING_HEADER, TableInfo, TestReport, list_columns, table_info, test_rows};
pub use render::{render, render_cell};
pub use sink::{CsvSink, RowSink};
