//! Input format detection.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::debug;

use sas_xpt::XptSource;

/// Leading bytes of every SAS7BDAT file.
const SAS7BDAT_MAGIC: [u8; 32] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xc2, 0xea, 0x81, 0x60,
    0xb3, 0x14, 0x11, 0xcf, 0xbd, 0x92, 0x08, 0x00, 0x09, 0xc7, 0x31, 0x8c, 0x18, 0x1f, 0x10, 0x11,
];

/// Start shared by the V5 and V8 transport library headers.
const XPT_MAGIC: &[u8] = b"HEADER RECORD*******LIB";

/// Container format of an input file, judged by its leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// SAS Transport (XPT) V5 or V8.
    Xpt,
    /// Native SAS7BDAT dataset.
    Sas7bdat,
    Unknown,
}

impl InputFormat {
    /// Classify a file from its first bytes.
    pub fn sniff(prefix: &[u8]) -> Self {
        if prefix.starts_with(&SAS7BDAT_MAGIC) {
            InputFormat::Sas7bdat
        } else if prefix.starts_with(XPT_MAGIC) {
            InputFormat::Xpt
        } else {
            InputFormat::Unknown
        }
    }
}

/// Read the leading bytes of `path` and classify them.
pub fn detect_format(path: &Path) -> Result<InputFormat> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut prefix = Vec::with_capacity(SAS7BDAT_MAGIC.len());
    file.take(SAS7BDAT_MAGIC.len() as u64)
        .read_to_end(&mut prefix)
        .with_context(|| format!("read {}", path.display()))?;
    let format = InputFormat::sniff(&prefix);
    debug!(path = %path.display(), ?format, "detected input format");
    Ok(format)
}

/// Open `path` as a table source.
///
/// Only transport files can be decoded; SAS7BDAT and anything else is
/// reported as unsupported.
pub fn open_source(path: &Path) -> Result<XptSource<File>> {
    match detect_format(path)? {
        InputFormat::Xpt => {
            XptSource::open(path).with_context(|| format!("read {}", path.display()))
        }
        InputFormat::Sas7bdat => bail!(
            "{} is a SAS7BDAT dataset, which this build cannot decode; export it as a SAS transport (XPT) file",
            path.display()
        ),
        InputFormat::Unknown => bail!("{} is not a SAS transport (XPT) file", path.display()),
    }
}
