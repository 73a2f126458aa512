//! Cell rendering per format mask.

use sas_model::{CellValue, FormatMask};

use crate::error::RenderError;
use crate::number::format_decimal;

const DATE_PATTERN: &str = "%Y-%m-%d";
const DATETIME_PATTERN: &str = "%Y-%m-%d %H:%M:%S";

const SECONDS_IN_MINUTE: i64 = 60;
const MINUTES_IN_HOUR: i64 = 60;

/// Render a possibly missing cell. Missing cells are always empty text.
pub fn render_cell(cell: Option<&CellValue>, mask: FormatMask) -> Result<String, RenderError> {
    match cell {
        Some(value) => render(value, mask),
        None => Ok(String::new()),
    }
}

/// Render a non-missing cell value under its column's format mask.
///
/// | Mask       | Accepted shape | Output                         |
/// |------------|----------------|--------------------------------|
/// | `String`   | any            | natural text                   |
/// | `Number`   | integer, float | integer text / rounded decimal |
/// | `Date`     | timestamp      | `YYYY-MM-DD`                   |
/// | `DateTime` | timestamp      | `YYYY-MM-DD HH:MM:SS`          |
/// | `Time`     | integer        | `HH:MM:SS`, hours not wrapped  |
///
/// Any other combination is an error rather than a guess.
pub fn render(value: &CellValue, mask: FormatMask) -> Result<String, RenderError> {
    match mask {
        FormatMask::String => Ok(value.to_string()),
        FormatMask::Number => render_number(value),
        FormatMask::Date => render_timestamp(value, mask, DATE_PATTERN),
        FormatMask::DateTime => render_timestamp(value, mask, DATETIME_PATTERN),
        FormatMask::Time => render_time(value),
    }
}

fn render_number(value: &CellValue) -> Result<String, RenderError> {
    match value {
        CellValue::Float(v) => format_decimal(*v),
        CellValue::Integer(v) => Ok(v.to_string()),
        other => Err(RenderError::mismatch(
            FormatMask::Number,
            "a number",
            other.kind(),
        )),
    }
}

fn render_timestamp(
    value: &CellValue,
    mask: FormatMask,
    pattern: &str,
) -> Result<String, RenderError> {
    match value {
        CellValue::Timestamp(ts) => Ok(ts.format(pattern).to_string()),
        other => Err(RenderError::mismatch(mask, "a timestamp", other.kind())),
    }
}

/// Seconds since midnight as `HH:MM:SS`. Values of a day or more keep
/// counting hours (`90000` is `25:00:00`).
fn render_time(value: &CellValue) -> Result<String, RenderError> {
    let CellValue::Integer(seconds) = value else {
        return Err(RenderError::mismatch(
            FormatMask::Time,
            "an integer",
            value.kind(),
        ));
    };
    let seconds = *seconds;
    Ok(format!(
        "{:02}:{:02}:{:02}",
        seconds / SECONDS_IN_MINUTE / MINUTES_IN_HOUR,
        seconds / SECONDS_IN_MINUTE % MINUTES_IN_HOUR,
        seconds % SECONDS_IN_MINUTE
    ))
}
