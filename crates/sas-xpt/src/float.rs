//! IBM mainframe floating point and SAS missing values.
//!
//! Transport files store numbers as IBM System/360 hexadecimal doubles:
//! one sign bit, a 7-bit base-16 exponent biased by 64 and a 56-bit
//! fraction. Lengths below 8 bytes are truncated fractions.

/// Whether `bytes` encode a SAS missing value.
///
/// Missing values are a single marker byte (`.`, `_` or `A`-`Z`) followed
/// by zero bytes.
pub fn is_missing(bytes: &[u8]) -> bool {
    let Some((&first, rest)) = bytes.split_first() else {
        return true;
    };
    let marker = first == b'.' || first == b'_' || first.is_ascii_uppercase();
    marker && rest.iter().all(|&b| b == 0)
}

/// Convert an IBM double to IEEE.
pub fn ibm_to_ieee(bytes: [u8; 8]) -> f64 {
    let negative = bytes[0] & 0x80 != 0;
    let exponent = i32::from(bytes[0] & 0x7f);
    let fraction = bytes[1..]
        .iter()
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));

    if fraction == 0 {
        return if negative { -0.0 } else { 0.0 };
    }

    // value = 0.fraction * 16^(exponent - 64), fraction holding 56 bits
    let magnitude = fraction as f64 * 2f64.powi(4 * (exponent - 64) - 56);
    if negative { -magnitude } else { magnitude }
}

/// Convert an IEEE double to IBM.
///
/// Magnitudes outside the IBM range saturate to the largest or smallest
/// representable value.
pub fn ieee_to_ibm(value: f64) -> [u8; 8] {
    if value == 0.0 || !value.is_finite() {
        return [0u8; 8];
    }

    let negative = value < 0.0;
    let mut fraction = value.abs();
    let mut exponent = 64i32;
    while fraction >= 1.0 {
        fraction /= 16.0;
        exponent += 1;
    }
    while fraction < 0.0625 {
        fraction *= 16.0;
        exponent -= 1;
    }

    let mut bits = (fraction * 2f64.powi(56)).round() as u64;
    if bits >= 1 << 56 {
        bits >>= 4;
        exponent += 1;
    }
    if exponent > 127 {
        exponent = 127;
        bits = (1 << 56) - 1;
    } else if exponent < 0 {
        return [0u8; 8];
    }

    let mut out = [0u8; 8];
    out[0] = (exponent as u8) | if negative { 0x80 } else { 0 };
    out[1..].copy_from_slice(&bits.to_be_bytes()[1..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_values() {
        assert_eq!(ibm_to_ieee([0x41, 0x10, 0, 0, 0, 0, 0, 0]), 1.0);
        assert_eq!(ibm_to_ieee([0xc1, 0x10, 0, 0, 0, 0, 0, 0]), -1.0);
        assert_eq!(ibm_to_ieee([0x42, 0x64, 0, 0, 0, 0, 0, 0]), 100.0);
        assert_eq!(ibm_to_ieee([0x40, 0x80, 0, 0, 0, 0, 0, 0]), 0.5);
        assert_eq!(ibm_to_ieee([0; 8]), 0.0);
    }

    #[test]
    fn test_encode_known_values() {
        assert_eq!(ieee_to_ibm(1.0), [0x41, 0x10, 0, 0, 0, 0, 0, 0]);
        assert_eq!(ieee_to_ibm(-1.0), [0xc1, 0x10, 0, 0, 0, 0, 0, 0]);
        assert_eq!(ieee_to_ibm(100.0), [0x42, 0x64, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_missing_markers() {
        assert!(is_missing(&[b'.', 0, 0, 0, 0, 0, 0, 0]));
        assert!(is_missing(&[b'_', 0, 0, 0, 0, 0, 0, 0]));
        assert!(is_missing(&[b'A', 0, 0, 0, 0, 0, 0, 0]));
        assert!(is_missing(&[b'Z', 0, 0]));
        assert!(!is_missing(&[0x41, 0x10, 0, 0, 0, 0, 0, 0]));
        assert!(!is_missing(&[b'a', 0, 0, 0, 0, 0, 0, 0]));
        assert!(!is_missing(&[0, 0, 0, 0, 0, 0, 0, 0]));
    }

    proptest! {
        #[test]
        fn roundtrip_preserves_value(value in -1.0e60f64..1.0e60) {
            let back = ibm_to_ieee(ieee_to_ibm(value));
            if value == 0.0 {
                prop_assert_eq!(back, 0.0);
            } else {
                prop_assert!(((back - value) / value).abs() < 1e-15);
            }
        }
    }
}
