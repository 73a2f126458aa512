//! Streaming XPT reader.
//!
//! Headers are parsed eagerly when the source is created; observations are
//! read one at a time as the consumer asks for them.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use sas_model::{CellValue, Column, ColumnType, FormatMask, Row, TableProperties, TableSource};

use crate::error::{Result, XptError};
use crate::float::{ibm_to_ieee, is_missing};
use crate::header::{
    Namestr, RECORD_LEN, XptVersion, align_to_record, apply_label_section, detect_version,
    label_entry_count, label_section_kind, parse_dataset_label, parse_dataset_name,
    parse_dataset_type, parse_namestr_len, parse_namestr_records, parse_variable_count,
    validate_dscrptr_header, validate_member_header, validate_namestr_header, validate_obs_header,
};
use crate::options::XptReaderOptions;

const MS_PER_DAY: f64 = 86_400_000.0;
const MS_PER_SECOND: f64 = 1_000.0;

/// Largest magnitude reported as an integer; beyond it `i64` cannot hold
/// the value.
const INTEGER_LIMIT: f64 = 9.2e18;

/// Tolerance for treating a double as integral.
const INTEGRAL_TOLERANCE: f64 = 1e-14;

/// A [`TableSource`] over the first member of a SAS Transport file.
///
/// Reads SAS Transport V5 or V8 format files with auto-detection.
pub struct XptSource<R: Read + Seek> {
    reader: BufReader<R>,
    options: XptReaderOptions,
    version: XptVersion,
    dataset_type: Option<String>,
    properties: TableProperties,
    columns: Vec<Column>,
    variables: Vec<Namestr>,
    masks: Vec<FormatMask>,
    obs_len: usize,
    data_start: u64,
    rows_read: u64,
    buffer: Vec<u8>,
}

impl XptSource<File> {
    /// Open an XPT file for reading.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_options(path, XptReaderOptions::default())
    }

    /// Open an XPT file with options.
    pub fn open_with_options(path: &Path, options: XptReaderOptions) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                XptError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                XptError::Io(e)
            }
        })?;
        Self::with_options(file, options)
    }
}

impl<R: Read + Seek> XptSource<R> {
    /// Parse the headers of `reader` and position it at the first
    /// observation.
    pub fn new(reader: R) -> Result<Self> {
        Self::with_options(reader, XptReaderOptions::default())
    }

    /// Parse the headers with explicit reader options.
    pub fn with_options(reader: R, options: XptReaderOptions) -> Result<Self> {
        let mut cursor = HeaderCursor {
            reader: BufReader::new(reader),
            offset: 0,
        };

        // Library header - auto-detect version from header prefix
        let version = detect_version(&cursor.record()?)?;

        // Skip library real header and modified header
        cursor.record()?;
        cursor.record()?;

        let member_header = cursor.record()?;
        validate_member_header(&member_header, version)?;
        let namestr_len = parse_namestr_len(&member_header)?;

        validate_dscrptr_header(&cursor.record()?, version)?;

        let member_data = cursor.record()?;
        let dataset_name = parse_dataset_name(&member_data, version)?;

        let member_second = cursor.record()?;
        let dataset_label = parse_dataset_label(&member_second);
        let dataset_type = parse_dataset_type(&member_second);

        let namestr_header = cursor.record()?;
        validate_namestr_header(&namestr_header, version)?;
        let var_count = parse_variable_count(&namestr_header, version)?;

        let namestr_total = var_count
            .checked_mul(namestr_len)
            .ok_or(XptError::ObservationOverflow)?;
        let namestr_data = cursor.block(align_to_record(namestr_total))?;
        let variables = parse_namestr_records(&namestr_data, var_count, namestr_len, version)?;
        let mut columns: Vec<Column> = variables.iter().map(|v| v.column.clone()).collect();

        // V8: optional LABELV8/V9 section before OBS header
        let mut next = cursor.record()?;
        if let Some(kind) = label_section_kind(&next) {
            let count = label_entry_count(&next)?;
            let mut section = Vec::new();
            next = cursor.record()?;
            while validate_obs_header(&next, version).is_err() {
                section.extend_from_slice(&next);
                next = cursor.record()?;
            }
            apply_label_section(&section, kind, count, &mut columns)?;
        }
        validate_obs_header(&next, version)?;

        let obs_len = observation_length(&variables)?;
        let data_start = cursor.offset;
        let mut reader = cursor.reader;
        let row_count = count_observations(&mut reader, data_start, obs_len)?;

        let mut properties = TableProperties::new(dataset_name, row_count);
        if let Some(label) = dataset_label {
            properties = properties.with_label(label);
        }
        let masks = columns.iter().map(Column::format_mask).collect();

        tracing::debug!(
            %version,
            dataset = %properties.name,
            variables = columns.len(),
            rows = row_count,
            obs_len,
            "parsed transport headers"
        );

        Ok(Self {
            reader,
            options,
            version,
            dataset_type,
            properties,
            columns,
            variables,
            masks,
            obs_len,
            data_start,
            rows_read: 0,
            buffer: vec![0; obs_len],
        })
    }

    /// Transport version detected from the library header.
    pub fn version(&self) -> XptVersion {
        self.version
    }

    /// Dataset type from the member header (usually `DATA`), if set.
    pub fn dataset_type(&self) -> Option<&str> {
        self.dataset_type.as_deref()
    }

    fn decode_row(&self) -> Row {
        self.variables
            .iter()
            .zip(&self.columns)
            .zip(&self.masks)
            .map(|((variable, column), &mask)| {
                let bytes = &self.buffer[variable.span()];
                match column.column_type {
                    ColumnType::String => {
                        Some(CellValue::Text(decode_char(bytes, self.options.trim_strings)))
                    }
                    ColumnType::Number => decode_numeric(bytes).map(|v| number_cell(v, mask)),
                }
            })
            .collect()
    }
}

impl<R: Read + Seek> TableSource for XptSource<R> {
    type Error = XptError;

    fn properties(&self) -> &TableProperties {
        &self.properties
    }

    fn columns(&self) -> &[Column] {
        &self.columns
    }

    fn next_row(&mut self) -> Result<Option<Row>> {
        if self.rows_read >= self.properties.row_count {
            return Ok(None);
        }
        let offset = self.data_start + self.rows_read * self.obs_len as u64;
        self.reader
            .read_exact(&mut self.buffer)
            .map_err(|e| XptError::from_read(e, offset))?;
        self.rows_read += 1;
        Ok(Some(self.decode_row()))
    }
}

/// Sequential header reader that tracks its byte offset.
struct HeaderCursor<R> {
    reader: BufReader<R>,
    offset: u64,
}

impl<R: Read> HeaderCursor<R> {
    fn record(&mut self) -> Result<[u8; RECORD_LEN]> {
        let mut record = [0u8; RECORD_LEN];
        self.reader
            .read_exact(&mut record)
            .map_err(|e| XptError::from_read(e, self.offset))?;
        self.offset += RECORD_LEN as u64;
        Ok(record)
    }

    fn block(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut block = vec![0u8; len];
        self.reader
            .read_exact(&mut block)
            .map_err(|e| XptError::from_read(e, self.offset))?;
        self.offset += len as u64;
        Ok(block)
    }
}

/// Calculate observation length from the variable layout.
fn observation_length(variables: &[Namestr]) -> Result<usize> {
    let mut total = 0usize;
    for variable in variables {
        let end = variable
            .position
            .checked_add(variable.column.length as usize)
            .ok_or(XptError::ObservationOverflow)?;
        total = total.max(end);
    }
    Ok(total)
}

/// Count the observations between `data_start` and the end of the file,
/// ignoring blank padding, and leave the reader at `data_start`.
fn count_observations<R: Read + Seek>(
    reader: &mut BufReader<R>,
    data_start: u64,
    obs_len: usize,
) -> Result<u64> {
    let file_len = reader.seek(SeekFrom::End(0))?;
    let data_len = file_len.saturating_sub(data_start);
    if obs_len == 0 {
        reader.seek(SeekFrom::Start(data_start))?;
        return Ok(0);
    }

    let obs_len_u64 = obs_len as u64;
    let mut rows = data_len / obs_len_u64;
    let remainder = data_len % obs_len_u64;

    // Check for non-space trailing bytes
    if remainder != 0 {
        let mut tail = vec![0u8; remainder as usize];
        reader.seek(SeekFrom::Start(data_start + rows * obs_len_u64))?;
        reader.read_exact(&mut tail)?;
        if tail.iter().any(|&b| b != b' ') {
            return Err(XptError::TrailingBytes);
        }
    }

    // Trim trailing all-space rows
    let mut row = vec![0u8; obs_len];
    while rows > 0 {
        reader.seek(SeekFrom::Start(data_start + (rows - 1) * obs_len_u64))?;
        reader.read_exact(&mut row)?;
        if row.iter().all(|&b| b == b' ') {
            rows -= 1;
        } else {
            break;
        }
    }

    reader.seek(SeekFrom::Start(data_start))?;
    Ok(rows)
}

/// Decode a character value.
fn decode_char(bytes: &[u8], trim: bool) -> String {
    let text = String::from_utf8_lossy(bytes);
    if trim {
        text.trim_end().to_string()
    } else {
        text.into_owned()
    }
}

/// Decode a numeric value; `None` for any of the missing codes.
fn decode_numeric(bytes: &[u8]) -> Option<f64> {
    if is_missing(bytes) {
        return None;
    }

    // Expand to 8 bytes if needed
    let mut buf = [0u8; 8];
    let len = bytes.len().min(8);
    buf[..len].copy_from_slice(&bytes[..len]);
    Some(ibm_to_ieee(buf))
}

/// Shape a number according to the column's rendering category.
fn number_cell(value: f64, mask: FormatMask) -> CellValue {
    let timestamp = match mask {
        FormatMask::Date => sas_timestamp(value, MS_PER_DAY),
        FormatMask::DateTime => sas_timestamp(value, MS_PER_SECOND),
        FormatMask::String | FormatMask::Number | FormatMask::Time => None,
    };
    if let Some(timestamp) = timestamp {
        return CellValue::Timestamp(timestamp);
    }
    if mask.is_calendar() {
        return CellValue::Float(value);
    }

    let rounded = value.round();
    if (value - rounded).abs() < INTEGRAL_TOLERANCE && rounded.abs() < INTEGER_LIMIT {
        CellValue::Integer(rounded as i64)
    } else {
        CellValue::Float(value)
    }
}

/// Place `value` units after the SAS epoch (1960-01-01 00:00:00).
fn sas_timestamp(value: f64, ms_per_unit: f64) -> Option<NaiveDateTime> {
    let millis = (value * ms_per_unit).round();
    if !millis.is_finite() || millis.abs() >= INTEGER_LIMIT {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1960, 1, 1)?.and_hms_opt(0, 0, 0)?;
    epoch.checked_add_signed(TimeDelta::try_milliseconds(millis as i64)?)
}
