use std::num::ParseFloatError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseIntError {
    #[error("cannot parse integer from empty string")]
    Empty,
    #[error("invalid digit found in string")]
    InvalidDigit,
    #[error("number too large or small to fit in target type")]
    Overflow,
}

/// Parse a sign-free php integer literal, applying `sign` afterwards.
///
/// Supports decimal, hexadecimal (`0x`), octal (`0` or `0o`) and binary (`0b`) notation
/// with `_` digit separators.
pub fn parse_int(src: &str, negative: bool) -> Result<i64, ParseIntError> {
    let (radix, digits) = match src.as_bytes() {
        [b'0', b'x' | b'X', tail @ ..] => (16, tail),
        [b'0', b'b' | b'B', tail @ ..] => (2, tail),
        [b'0', b'o' | b'O', tail @ ..] => (8, tail),
        [b'0', tail @ ..] if !tail.is_empty() => (8, tail),
        tail => (10, tail),
    };

    if digits.is_empty() {
        return Err(ParseIntError::Empty);
    }

    // accumulate towards the sign so i64::MIN stays representable
    let mut result: i64 = 0;
    for &c in digits.iter().filter(|&&c| c != b'_') {
        let digit = (c as char)
            .to_digit(radix)
            .ok_or(ParseIntError::InvalidDigit)? as i64;
        result = result
            .checked_mul(radix as i64)
            .and_then(|result| {
                if negative {
                    result.checked_sub(digit)
                } else {
                    result.checked_add(digit)
                }
            })
            .ok_or(ParseIntError::Overflow)?;
    }
    Ok(result)
}

pub fn parse_float(src: &str, negative: bool) -> Result<f64, ParseFloatError> {
    let float: f64 = src.replace('_', "").parse()?;
    Ok(if negative { -float } else { float })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("0", false), Ok(0));
        assert_eq!(parse_int("123", false), Ok(123));
        assert_eq!(parse_int("123", true), Ok(-123));
        assert_eq!(parse_int("0x1A", false), Ok(26));
        assert_eq!(parse_int("0432", false), Ok(282));
        assert_eq!(parse_int("0o17", false), Ok(15));
        assert_eq!(parse_int("0b11", false), Ok(3));
        assert_eq!(parse_int("12_34_5", false), Ok(12345));
        assert_eq!(parse_int("9223372036854775807", false), Ok(i64::MAX));
        assert_eq!(parse_int("9223372036854775808", true), Ok(i64::MIN));
        assert_eq!(
            parse_int("9223372036854775808", false),
            Err(ParseIntError::Overflow)
        );
        assert_eq!(parse_int("0x", false), Err(ParseIntError::Empty));
        assert_eq!(parse_int("09", false), Err(ParseIntError::InvalidDigit));
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float("1.5", false), Ok(1.5));
        assert_eq!(parse_float("4.5", true), Ok(-4.5));
        assert_eq!(parse_float(".12", false), Ok(0.12));
        assert_eq!(parse_float("10e2", false), Ok(1000.0));
        assert_eq!(parse_float("10e-1", false), Ok(1.0));
        assert_eq!(parse_float("12_34.5", false), Ok(1234.5));
        assert!(parse_float("1.2.3", false).is_err());
    }
}
