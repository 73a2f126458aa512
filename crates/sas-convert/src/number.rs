//! Decimal text for floating-point cells.
//!
//! A double is first written as its shortest round-trip decimal text. Short
//! results are kept as they are; longer ones usually carry binary-to-decimal
//! noise (`0.30000000000000004`) and are re-rounded to 15 significant digits.

use crate::error::RenderError;

/// Decimal text longer than this is re-rounded.
pub const ROUNDING_LENGTH: usize = 13;

/// Significant digits kept when re-rounding, counted from the first non-zero digit.
pub const ACCURACY: i32 = 15;

/// Render a finite double as plain decimal text.
///
/// Trailing fractional zeros are stripped. When the text is longer than
/// [`ROUNDING_LENGTH`] characters, the value is rounded half-up to
/// `ACCURACY - ceil(log10(|value|))` fractional digits and stripped again.
/// The digit count before the point comes from `ceil(log10)`, so exact
/// powers of ten keep one digit less than other values of the same width.
pub fn format_decimal(value: f64) -> Result<String, RenderError> {
    if !value.is_finite() {
        return Err(RenderError::NonFinite { value });
    }
    if value == 0.0 {
        return Ok("0".to_string());
    }

    let text = strip_trailing_zeros(value.to_string());
    if text.len() <= ROUNDING_LENGTH {
        return Ok(text);
    }

    let digits_before_point = value.abs().log10().ceil() as i32;
    let scale = ACCURACY - digits_before_point;
    Ok(strip_trailing_zeros(round_half_up(&text, scale)))
}

/// Drop trailing zeros after the decimal point, and the point itself if
/// nothing remains behind it.
fn strip_trailing_zeros(text: String) -> String {
    if !text.contains('.') {
        return text;
    }
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}

/// Round plain decimal text to `scale` fractional digits, ties away from zero.
///
/// A negative scale rounds to tens, hundreds and so on. The result is plain
/// decimal text with exactly `max(scale, 0)` fractional digits (before
/// stripping).
fn round_half_up(text: &str, scale: i32) -> String {
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if scale >= 0 && frac_part.len() <= scale as usize {
        return text.to_string();
    }

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes())
        .map(|b| b - b'0')
        .collect();

    // Leading digits that survive; the digit right after them decides the rounding.
    let keep = int_part.len() as i64 + i64::from(scale);
    let round_up = if keep < 0 {
        digits.clear();
        false
    } else {
        let keep = keep as usize;
        let up = digits.get(keep).is_some_and(|&d| d >= 5);
        digits.truncate(keep);
        up
    };

    if round_up {
        increment(&mut digits);
    }

    // `digits` now holds the integer N with value = N * 10^-scale.
    let mut out = String::with_capacity(digits.len() + 3);
    if negative && digits.iter().any(|&d| d != 0) {
        out.push('-');
    }
    if scale <= 0 {
        push_integer(&mut out, &digits);
        if digits.iter().any(|&d| d != 0) {
            out.extend(std::iter::repeat_n('0', scale.unsigned_abs() as usize));
        }
    } else {
        let scale = scale as usize;
        let mut padded = vec![0u8; (scale + 1).saturating_sub(digits.len())];
        padded.extend_from_slice(&digits);
        let split = padded.len() - scale;
        push_integer(&mut out, &padded[..split]);
        out.push('.');
        out.extend(padded[split..].iter().map(|&d| char::from(b'0' + d)));
    }
    out
}

/// Add one to a big-endian digit vector.
fn increment(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == 9 {
            *digit = 0;
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, 1);
}

/// Append integer digits without leading zeros ("0" when empty or all zero).
fn push_integer(out: &mut String, digits: &[u8]) {
    let first = digits.iter().position(|&d| d != 0);
    match first {
        Some(start) => out.extend(digits[start..].iter().map(|&d| char::from(b'0' + d))),
        None => out.push('0'),
    }
}
