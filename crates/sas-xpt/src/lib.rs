//! Streaming reader for SAS Transport (XPT) files.
//!
//! Reads the first member of a V5 or V8 transport file and hands out its
//! observations one row at a time through [`sas_model::TableSource`].
//!
//! # Features
//!
//! - V5 and V8/V9 header auto-detection, including LABELV8/LABELV9 long labels
//! - IBM mainframe to IEEE floating-point conversion
//! - All 28 SAS missing value codes (`.`, `._`, `.A`-`.Z`) read as missing
//! - Date and datetime formatted numbers placed on the SAS calendar (epoch 1960-01-01)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use sas_model::TableSource;
//! use sas_xpt::XptSource;
//!
//! let mut source = XptSource::open(Path::new("dm.xpt")).unwrap();
//! println!("{} ({} rows)", source.properties().name, source.properties().row_count);
//! while let Some(row) = source.next_row().unwrap() {
//!     println!("{row:?}");
//! }
//! ```

mod error;
pub mod float;
pub mod header;
mod options;
mod reader;

pub use error::{Result, XptError};
pub use header::XptVersion;
pub use options::XptReaderOptions;
pub use reader::XptSource;
