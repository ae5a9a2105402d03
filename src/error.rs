use crate::lexer::Token;
use crate::num::ParseIntError;
use crate::string::UnescapeError;
use logos::Span;
use miette::{Diagnostic, SourceSpan};
use std::fmt::{self, Debug, Display};
use std::num::ParseFloatError;
use std::path::PathBuf;
use thiserror::Error;

/// Any error that occurred while trying to parse an array literal
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum ParseError {
    /// The input ended while the grammar still expected tokens
    #[error("Unexpected end of input")]
    #[diagnostic(code(php_array_parser::end_of_tokens))]
    EndOfTokens {
        #[source_code]
        src: String,
        #[label("input ends here")]
        err_span: SourceSpan,
    },
    /// A token that wasn't expected was found while parsing
    #[error("Unexpected token, found {found} expected {expected}")]
    #[diagnostic(code(php_array_parser::unexpected_token))]
    UnexpectedToken {
        #[source_code]
        src: String,
        #[label("unexpected token")]
        err_span: SourceSpan,
        expected: TokenList,
        found: Token,
    },
    /// A bare word other than `null`, `true` or `false` was used as a value
    #[error("Unknown identifier '{text}', expected null, true or false")]
    #[diagnostic(code(php_array_parser::unknown_identifier))]
    UnknownIdentifier {
        #[source_code]
        src: String,
        #[label("not a constant")]
        err_span: SourceSpan,
        text: String,
    },
    /// A malformed integer, float or string literal was found
    #[error("{kind}")]
    #[diagnostic(code(php_array_parser::invalid_primitive))]
    InvalidPrimitive {
        #[source_code]
        src: String,
        #[label("invalid literal")]
        err_span: SourceSpan,
        kind: PrimitiveErrorKind,
    },
    /// Appending an unkeyed element after the largest possible integer key
    #[error("Cannot append element, the next array key is already occupied")]
    #[diagnostic(code(php_array_parser::next_key_occupied))]
    NextKeyOccupied {
        #[source_code]
        src: String,
        #[label("no free integer key left")]
        err_span: SourceSpan,
    },
    /// Tokens remain after the top level array was closed
    #[error("Trailing tokens after the parsed array")]
    #[diagnostic(code(php_array_parser::trailing_tokens))]
    TrailingTokens {
        #[source_code]
        src: String,
        #[label("end of parsed value")]
        err_span: SourceSpan,
    },
    /// Error while populating a serde type
    #[error("{0}")]
    #[diagnostic(code(php_array_parser::serde))]
    Serde(String),
}

impl ParseError {
    pub(crate) fn end_of_tokens(source: &str) -> Self {
        ParseError::EndOfTokens {
            src: source.into(),
            err_span: (source.len()..source.len()).into(),
        }
    }

    pub(crate) fn unexpected(expected: &[Token], found: Token, source: &str, span: Span) -> Self {
        ParseError::UnexpectedToken {
            src: source.into(),
            err_span: span.into(),
            expected: expected.into(),
            found,
        }
    }

    pub(crate) fn unknown_identifier(text: &str, source: &str, span: Span) -> Self {
        ParseError::UnknownIdentifier {
            src: source.into(),
            err_span: span.into(),
            text: text.into(),
        }
    }

    pub(crate) fn next_key_occupied(source: &str, span: Span) -> Self {
        ParseError::NextKeyOccupied {
            src: source.into(),
            err_span: span.into(),
        }
    }

    pub(crate) fn trailing(source: &str, span: Span) -> Self {
        ParseError::TrailingTokens {
            src: source.into(),
            err_span: span.into(),
        }
    }

    /// Point the error into `source`, where the parsed text had `offset` extra bytes in front
    pub(crate) fn relocate(mut self, source: &str, offset: usize) -> Self {
        if let Some((src, err_span)) = self.location_mut() {
            let clamp = |pos: usize| pos.saturating_sub(offset).min(source.len());
            let start = clamp(err_span.offset());
            let end = clamp(err_span.offset() + err_span.len());
            *src = source.into();
            *err_span = (start..end).into();
        }
        self
    }

    fn location_mut(&mut self) -> Option<(&mut String, &mut SourceSpan)> {
        match self {
            ParseError::EndOfTokens { src, err_span }
            | ParseError::UnexpectedToken { src, err_span, .. }
            | ParseError::UnknownIdentifier { src, err_span, .. }
            | ParseError::InvalidPrimitive { src, err_span, .. }
            | ParseError::NextKeyOccupied { src, err_span }
            | ParseError::TrailingTokens { src, err_span } => Some((src, err_span)),
            ParseError::Serde(_) => None,
        }
    }

    /// The byte range in the parsed text the error points at, if any
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::EndOfTokens { err_span, .. }
            | ParseError::UnexpectedToken { err_span, .. }
            | ParseError::UnknownIdentifier { err_span, .. }
            | ParseError::InvalidPrimitive { err_span, .. }
            | ParseError::NextKeyOccupied { err_span, .. }
            | ParseError::TrailingTokens { err_span, .. } => {
                Some(err_span.offset()..err_span.offset() + err_span.len())
            }
            ParseError::Serde(_) => None,
        }
    }
}

impl serde::de::Error for ParseError {
    fn custom<T>(msg: T) -> Self
    where
        T: Display,
    {
        ParseError::Serde(msg.to_string())
    }
}

/// List of expected tokens
#[derive(Clone, PartialEq, Eq)]
pub struct TokenList(Vec<Token>);

impl TokenList {
    pub fn contains(&self, token: Token) -> bool {
        self.0.contains(&token)
    }
}

impl Debug for TokenList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&[Token]> for TokenList {
    fn from(list: &[Token]) -> Self {
        TokenList(list.into())
    }
}

impl Display for TokenList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last = self.0.len().saturating_sub(1);
        for (i, token) in self.0.iter().enumerate() {
            match i {
                0 => write!(f, "{}", token)?,
                i if i == last => write!(f, " or {}", token)?,
                _ => write!(f, ", {}", token)?,
            }
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone)]
pub enum PrimitiveErrorKind {
    #[error("Invalid integer literal: {0}")]
    InvalidIntLiteral(#[from] ParseIntError),
    #[error("Invalid float literal: {0}")]
    InvalidFloatLiteral(#[from] ParseFloatError),
    #[error("Invalid string literal")]
    InvalidStringLiteral(#[from] UnescapeError),
}

pub trait ResultExt<T> {
    fn with_span(self, span: Span, source: &str) -> Result<T, ParseError>;
}

impl<T, E: Into<PrimitiveErrorKind>> ResultExt<T> for Result<T, E> {
    fn with_span(self, span: Span, source: &str) -> Result<T, ParseError> {
        self.map_err(|error| ParseError::InvalidPrimitive {
            src: source.into(),
            err_span: span.into(),
            kind: error.into(),
        })
    }
}

/// Errors from extracting array literals out of a larger source text
#[derive(Error, Debug, Diagnostic)]
pub enum ExtractError {
    /// The source file doesn't exist or can't be read
    #[error("Source {} not found or not readable", .path.display())]
    #[diagnostic(code(php_array_parser::source_not_found))]
    SourceNotFound {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
    /// The extraction pattern is not a valid regular expression
    #[error("Invalid extraction pattern")]
    #[diagnostic(code(php_array_parser::invalid_pattern))]
    InvalidPattern(#[from] regex::Error),
    /// The requested capture group doesn't exist in the pattern
    #[error("Capture group {group} requested but the pattern only has {available} groups")]
    #[diagnostic(code(php_array_parser::invalid_group))]
    InvalidGroup { group: usize, available: usize },
    /// The capture group did not take part in one of the matches
    #[error("Capture group {group} is empty in match {index}")]
    #[diagnostic(code(php_array_parser::missing_capture))]
    MissingCapture { group: usize, index: usize },
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_list_display() {
        let list: TokenList = [Token::Comma][..].into();
        assert_eq!(list.to_string(), "','");

        let list: TokenList = [Token::Comma, Token::BracketClose][..].into();
        assert_eq!(list.to_string(), "',' or ')'");

        let list: TokenList = [Token::Integer, Token::Float, Token::Minus][..].into();
        assert_eq!(list.to_string(), "integer literal, float literal or '-'");
    }

    #[test]
    fn test_error_span() {
        let err = ParseError::unexpected(&[Token::Comma], Token::Integer, "[1 2]", 3..4);
        assert_eq!(err.span(), Some(3..4));
        assert_eq!(
            err.to_string(),
            "Unexpected token, found integer literal expected ','"
        );
        assert_eq!(ParseError::end_of_tokens("[1").span(), Some(2..2));
    }

    #[test]
    fn test_relocate() {
        let err = ParseError::unexpected(&[Token::Comma], Token::Integer, "array(1 2\n)", 8..9)
            .relocate("1 2", 6);
        assert_eq!(err.span(), Some(2..3));
        match err {
            ParseError::UnexpectedToken { src, .. } => assert_eq!(src, "1 2"),
            err => panic!("unexpected error {:?}", err),
        }

        let err = ParseError::end_of_tokens("array(1 2\n)").relocate("1 2", 6);
        assert_eq!(err.span(), Some(3..3));
        assert_eq!(ParseError::Serde("x".into()).relocate("1 2", 6).span(), None);
    }
}
