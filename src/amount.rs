//! Human-decimal <-> smallest-unit amount conversion
//!
//! Amounts cross the wire as arbitrary-precision integers in the
//! token's smallest unit. Conversion uses the token's declared decimal
//! count and is exact: input with more fractional digits than the token
//! supports is rejected rather than truncated, and `format_units` is
//! the exact inverse of `parse_units` for every valid value.

use alloy::primitives::U256;

use crate::error::ValidationError;

/// Convert a human-readable decimal string to smallest units.
pub fn parse_units(human: &str, decimals: u8) -> Result<U256, ValidationError> {
    let s = human.trim();
    if s.is_empty() {
        return Err(ValidationError::InvalidAmount("empty amount".to_string()));
    }
    if s.starts_with('-') {
        return Err(ValidationError::InvalidAmount(format!(
            "amount cannot be negative: {s}"
        )));
    }

    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(ValidationError::InvalidAmount(format!(
            "not a number: {s}"
        )));
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ValidationError::InvalidAmount(format!(
            "not a number: {s}"
        )));
    }

    // Trailing zeros beyond the token's precision are harmless; any
    // other excess fractional digit loses precision and is rejected.
    let frac_trimmed = frac_part.trim_end_matches('0');
    if frac_trimmed.len() > decimals as usize {
        return Err(ValidationError::InvalidAmount(format!(
            "{s} has more than {decimals} fractional digits"
        )));
    }

    let scale = pow10(decimals).ok_or_else(|| {
        ValidationError::InvalidAmount(format!("unsupported decimal count {decimals}"))
    })?;

    let int_value = parse_decimal_digits(if int_part.is_empty() { "0" } else { int_part })?;
    let frac_value = if frac_trimmed.is_empty() {
        U256::ZERO
    } else {
        let padded = pow10(decimals - frac_trimmed.len() as u8).ok_or_else(|| {
            ValidationError::InvalidAmount(format!("unsupported decimal count {decimals}"))
        })?;
        parse_decimal_digits(frac_trimmed)?
            .checked_mul(padded)
            .ok_or_else(|| overflow(s))?
    };

    int_value
        .checked_mul(scale)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or_else(|| overflow(s))
}

/// Render a smallest-unit amount back as a decimal string.
pub fn format_units(value: U256, decimals: u8) -> String {
    let scale = match pow10(decimals) {
        Some(s) => s,
        None => return value.to_string(),
    };
    let int_part = value / scale;
    let frac_part = value % scale;
    if frac_part.is_zero() {
        return int_part.to_string();
    }
    let frac = format!("{frac_part:0>width$}", width = decimals as usize);
    format!("{}.{}", int_part, frac.trim_end_matches('0'))
}

fn parse_decimal_digits(digits: &str) -> Result<U256, ValidationError> {
    U256::from_str_radix(digits, 10)
        .map_err(|_| ValidationError::InvalidAmount(format!("not a number: {digits}")))
}

fn pow10(exp: u8) -> Option<U256> {
    U256::from(10u64).checked_pow(U256::from(exp))
}

fn overflow(s: &str) -> ValidationError {
    ValidationError::InvalidAmount(format!("amount out of range: {s}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_amount() {
        assert_eq!(parse_units("1", 6).unwrap(), U256::from(1_000_000u64));
        assert_eq!(parse_units("0", 18).unwrap(), U256::ZERO);
    }

    #[test]
    fn test_parse_fractional_amount() {
        assert_eq!(parse_units("1.23", 6).unwrap(), U256::from(1_230_000u64));
        assert_eq!(parse_units("0.000001", 6).unwrap(), U256::from(1u64));
        assert_eq!(parse_units(".5", 6).unwrap(), U256::from(500_000u64));
    }

    #[test]
    fn test_precision_loss_rejected() {
        // 8 fractional digits against a 6-decimal token
        let err = parse_units("1.23456789", 6).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidAmount(_)));
    }

    #[test]
    fn test_excess_trailing_zeros_allowed() {
        assert_eq!(
            parse_units("1.230000000000", 6).unwrap(),
            U256::from(1_230_000u64)
        );
    }

    #[test]
    fn test_negative_and_garbage_rejected() {
        assert!(parse_units("-1", 6).is_err());
        assert!(parse_units("", 6).is_err());
        assert!(parse_units(".", 6).is_err());
        assert!(parse_units("1.2.3", 6).is_err());
        assert!(parse_units("1e6", 6).is_err());
        assert!(parse_units("abc", 6).is_err());
    }

    #[test]
    fn test_zero_decimals() {
        assert_eq!(parse_units("42", 0).unwrap(), U256::from(42u64));
        assert!(parse_units("42.1", 0).is_err());
    }

    #[test]
    fn test_round_trip() {
        for (human, decimals) in [
            ("1", 6u8),
            ("1.23", 6),
            ("0.000001", 6),
            ("123456789.987654321", 18),
            ("0.5", 2),
        ] {
            let parsed = parse_units(human, decimals).unwrap();
            let rendered = format_units(parsed, decimals);
            assert_eq!(parse_units(&rendered, decimals).unwrap(), parsed);
        }
    }

    #[test]
    fn test_format_pads_fraction() {
        assert_eq!(format_units(U256::from(1u64), 6), "0.000001");
        assert_eq!(format_units(U256::from(1_000_000u64), 6), "1");
        assert_eq!(format_units(U256::from(1_230_000u64), 6), "1.23");
    }
}
