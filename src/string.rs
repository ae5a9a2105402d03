//! Unescaping of php string literals
use memchr::memchr;
use std::borrow::Cow;
use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;

#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("invalid escape sequence in string literal")]
pub struct UnescapeError;

/// Strip the surrounding quotes from a string literal and resolve its escape sequences
pub fn parse_string(literal: &str) -> Result<String, UnescapeError> {
    let mut chars = literal.chars();
    let quote = match (chars.next(), chars.next_back()) {
        (Some(open @ ('\'' | '"')), Some(close)) if open == close => open,
        _ => return Err(UnescapeError),
    };
    let inner = &literal[1..literal.len() - 1];

    let unescaped = if quote == '\'' {
        unescape_single(inner)
    } else {
        unescape_double(inner)?
    };
    Ok(unescaped.into_owned())
}

/// Un-escape a string, following php single quote rules
///
/// Only `\\` and `\'` are escape sequences, every other backslash is kept.
pub fn unescape_single(s: &str) -> Cow<str> {
    if memchr(b'\\', s.as_bytes()).is_none() {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(escaped @ ('\\' | '\'')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    Cow::Owned(out)
}

/// Un-escape a string, following php double quote rules
///
/// Unknown escape sequences are kept verbatim, byte escapes (`\x`, octal) are mapped to the
/// unicode code point with the same value.
pub fn unescape_double(s: &str) -> Result<Cow<str>, UnescapeError> {
    if memchr(b'\\', s.as_bytes()).is_none() {
        return Ok(Cow::Borrowed(s));
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = match chars.next() {
            Some(escaped) => escaped,
            None => {
                out.push('\\');
                break;
            }
        };
        match escaped {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\x0B'),
            'e' => out.push('\x1B'),
            'f' => out.push('\x0C'),
            '\\' | '$' | '"' => out.push(escaped),
            '0'..='7' => {
                let first = escaped.to_digit(8).unwrap_or_default();
                let value = take_digits(&mut chars, 8, 2, first);
                out.push(char::from((value & 0xFF) as u8));
            }
            'x' if chars.peek().map_or(false, char::is_ascii_hexdigit) => {
                let value = take_digits(&mut chars, 16, 2, 0);
                out.push(char::from(value as u8));
            }
            'u' if chars.peek() == Some(&'{') => {
                chars.next();
                let value = take_digits(&mut chars, 16, 6, 0);
                if chars.next() != Some('}') {
                    return Err(UnescapeError);
                }
                out.push(char::from_u32(value).ok_or(UnescapeError)?);
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    Ok(Cow::Owned(out))
}

/// Consume up to `max` digits in `radix`, continuing from `initial`
fn take_digits(chars: &mut Peekable<Chars>, radix: u32, max: usize, initial: u32) -> u32 {
    let mut value = initial;
    for _ in 0..max {
        match chars.peek().and_then(|c| c.to_digit(radix)) {
            Some(digit) => {
                value = value * radix + digit;
                chars.next();
            }
            None => break,
        }
    }
    value
}
