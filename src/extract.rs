//! Extracting array literals from larger source files
use crate::error::ExtractError;
use crate::parser::{parse_list, parse_literal};
use crate::Value;
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

/// Finds array literals in source text with a regular expression and parses each capture
///
/// ## Example
///
/// ```rust
/// use php_array_parser::Extractor;
/// # use std::error::Error;
///
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let source = r#"<?php
/// $lang = array_merge($lang, array(
///     'HELLO' => 'Hello',
///     'BYE'   => 'Goodbye',
/// ));
/// "#;
/// let tables = Extractor::new(r"(?s)array_merge\(\$lang, array\((.*?)\)\);")?.parse_all(source)?;
///
/// assert_eq!(tables.len(), 1);
/// assert_eq!(tables[0]["BYE"], "Goodbye");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Extractor {
    pattern: Regex,
    group: usize,
    literal: bool,
}

impl Extractor {
    /// Compile `pattern`, captures are taken from group 1 and parsed as bare element lists
    pub fn new(pattern: &str) -> Result<Self, ExtractError> {
        Ok(Self::from_regex(Regex::new(pattern)?))
    }

    pub fn from_regex(pattern: Regex) -> Self {
        Extractor {
            pattern,
            group: 1,
            literal: false,
        }
    }

    /// Take the text to parse from capture group `group`, `0` is the whole match
    pub fn group(mut self, group: usize) -> Self {
        self.group = group;
        self
    }

    /// Parse captures as complete `array(...)` or `[...]` literals instead of bare lists
    pub fn literal(mut self, literal: bool) -> Self {
        self.literal = literal;
        self
    }

    /// Parse every match in `source`, in source order
    ///
    /// Fails on the first capture that is not a complete array, no partial results are returned.
    pub fn parse_all(&self, source: &str) -> Result<Vec<Value>, ExtractError> {
        let available = self.pattern.captures_len() - 1;
        if self.group > available {
            return Err(ExtractError::InvalidGroup {
                group: self.group,
                available,
            });
        }

        let values = self
            .pattern
            .captures_iter(source)
            .enumerate()
            .map(|(index, captures)| {
                let capture = captures
                    .get(self.group)
                    .ok_or(ExtractError::MissingCapture {
                        group: self.group,
                        index,
                    })?;
                trace!(index, start = capture.start(), "parsing capture");
                let parsed = if self.literal {
                    parse_literal(capture.as_str())
                } else {
                    parse_list(capture.as_str())
                };
                parsed.map_err(|error| {
                    debug!(index, %error, "failed to parse capture");
                    ExtractError::from(error)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = values.len(), "extracted arrays");
        Ok(values)
    }

    /// Read `path` and parse every match in it
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Vec<Value>, ExtractError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading source");
        let source = fs::read_to_string(path).map_err(|error| ExtractError::SourceNotFound {
            path: path.into(),
            error,
        })?;
        self.parse_all(&source)
    }
}

/// Parse every capture of `capture_group` for `pattern` in `source` as a bare element list
pub fn parse_all(
    pattern: &str,
    source: &str,
    capture_group: usize,
) -> Result<Vec<Value>, ExtractError> {
    Extractor::new(pattern)?.group(capture_group).parse_all(source)
}

/// Like [`parse_all`] but reading the source from a file
pub fn parse_file(
    pattern: &str,
    path: impl AsRef<Path>,
    capture_group: usize,
) -> Result<Vec<Value>, ExtractError> {
    Extractor::new(pattern)?
        .group(capture_group)
        .parse_file(path)
}
