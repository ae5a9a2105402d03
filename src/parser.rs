use crate::cursor::TokenCursor;
use crate::error::{ParseError, ResultExt};
use crate::lexer::{tokenize, SpannedToken, Token};
use crate::num::{parse_float, parse_int};
use crate::string::parse_string;
use crate::value::{Array, Key, Value};

/// Tokens that can start an array element
const VALUE_START: &[Token] = &[
    Token::LiteralString,
    Token::Integer,
    Token::Float,
    Token::Minus,
    Token::Identifier,
    Token::Variable,
    Token::Array,
    Token::SquareOpen,
];

/// Parse a php array literal in either `array(...)` or `[...]` syntax
///
/// ## Example
///
/// ```rust
/// use php_array_parser::{parse_literal, Value};
/// # use std::error::Error;
///
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let map = parse_literal(r#"["foo" => true, "nested" => array('foo' => $bar)]"#)?;
///
/// assert_eq!(map["foo"], true);
/// assert_eq!(map["nested"]["foo"], Value::Unresolved);
/// # Ok(())
/// # }
/// ```
pub fn parse_literal(text: &str) -> Result<Value, ParseError> {
    Parser::new(text).parse_literal()
}

/// Parse a bare list of array elements, as found between the brackets of an array literal
///
/// ```rust
/// use php_array_parser::parse_list;
/// # use std::error::Error;
///
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let map = parse_list(r#"'a' => 1, 'b' => 2"#)?;
///
/// assert_eq!(map["b"], 2);
/// # Ok(())
/// # }
/// ```
pub fn parse_list(text: &str) -> Result<Value, ParseError> {
    // the newline keeps a trailing line comment from swallowing the closing bracket
    let wrapped = format!("{}{}\n)", LIST_PREFIX, text);
    parse_literal(&wrapped).map_err(|err| err.relocate(text, LIST_PREFIX.len()))
}

const LIST_PREFIX: &str = "array(";

/// Recursive descent parser for array literals
pub struct Parser<'source> {
    cursor: TokenCursor<'source>,
}

impl<'source> Parser<'source> {
    pub fn new(source: &'source str) -> Self {
        Self::with_tokens(source, tokenize(source))
    }

    /// Parse an already lexed token list, spans of the tokens point into `source`
    pub fn with_tokens(source: &'source str, tokens: Vec<SpannedToken<'source>>) -> Self {
        Parser {
            cursor: TokenCursor::new(source, tokens),
        }
    }

    fn source(&self) -> &'source str {
        self.cursor.source()
    }

    /// Parse a complete array literal, failing when any tokens are left after it
    pub fn parse_literal(&mut self) -> Result<Value, ParseError> {
        self.skip_comments();
        let square = self.cursor.matches(Token::SquareOpen);
        if !square && !self.cursor.matches(Token::Array) {
            let front = self.cursor.peek()?;
            return Err(ParseError::unexpected(
                &[Token::Array, Token::SquareOpen],
                front.token,
                self.source(),
                front.span.clone(),
            ));
        }
        let value = self.parse_array(square)?;
        self.finish()?;
        Ok(value)
    }

    /// Fail with [`ParseError::TrailingTokens`] if anything but comments is left
    pub fn finish(&mut self) -> Result<(), ParseError> {
        self.skip_comments();
        match self.cursor.peek() {
            Ok(front) => Err(ParseError::trailing(
                self.source(),
                front.span.start..self.source().len(),
            )),
            Err(_) => Ok(()),
        }
    }

    pub fn parse_array(&mut self, square: bool) -> Result<Value, ParseError> {
        let close = if square {
            self.cursor.expect(Token::SquareOpen)?;
            Token::SquareClose
        } else {
            self.cursor.expect(Token::Array)?;
            self.cursor.expect(Token::BracketOpen)?;
            Token::BracketClose
        };

        let mut builder = ArrayBuilder::default();
        let mut found = 0usize;

        loop {
            self.skip_comments();
            if self.cursor.matches(close) {
                self.close_array(close)?;
                break;
            }

            if found > 0 {
                if !self.cursor.matches(Token::Comma) {
                    let front = self.cursor.peek()?;
                    return Err(ParseError::unexpected(
                        &[Token::Comma, close],
                        front.token,
                        self.source(),
                        front.span.clone(),
                    ));
                }
                self.cursor.pop()?;
                self.skip_comments();

                // trailing comma
                if self.cursor.matches(close) {
                    self.close_array(close)?;
                    break;
                }
            }

            let front = self.cursor.peek()?.clone();
            match front.token {
                Token::LiteralString | Token::Integer => {
                    let key_or_value = self.parse_value()?;
                    self.skip_comments();
                    if self.cursor.matches(Token::Arrow) {
                        self.cursor.pop()?;
                        self.skip_comments();
                        let key = key_or_value.into_key().ok_or_else(|| {
                            ParseError::unexpected(
                                &[Token::LiteralString, Token::Integer],
                                front.token,
                                self.source(),
                                front.span.clone(),
                            )
                        })?;
                        let value = self.parse_value()?;
                        builder.insert(key, value);
                    } else {
                        self.push(&mut builder, key_or_value, &front)?;
                    }
                }
                _ => {
                    let value = self.parse_value()?;
                    self.push(&mut builder, value, &front)?;
                }
            }

            found += 1;
        }

        Ok(Value::Array(builder.data))
    }

    fn close_array(&mut self, close: Token) -> Result<(), ParseError> {
        self.cursor.expect(close)?;
        if self.cursor.matches(Token::SemiColon) {
            self.cursor.pop()?;
        }
        Ok(())
    }

    fn push(
        &self,
        builder: &mut ArrayBuilder,
        value: Value,
        element: &SpannedToken,
    ) -> Result<(), ParseError> {
        let key = builder
            .next_key()
            .ok_or_else(|| ParseError::next_key_occupied(self.source(), element.span.clone()))?;
        builder.insert(Key::Int(key), value);
        Ok(())
    }

    pub fn parse_value(&mut self) -> Result<Value, ParseError> {
        let front = self.cursor.peek()?.clone();
        match front.token {
            Token::Variable => {
                self.skip_expression()?;
                Ok(Value::Unresolved)
            }
            Token::LiteralString => {
                self.cursor.pop()?;
                let string = parse_string(front.slice()).with_span(front.span, self.source())?;
                Ok(Value::String(string))
            }
            Token::Identifier => {
                self.cursor.pop()?;
                constant(&front.slice().to_ascii_lowercase()).ok_or_else(|| {
                    ParseError::unknown_identifier(front.slice(), self.source(), front.span.clone())
                })
            }
            token if token.opens_array() => self.parse_array(token == Token::SquareOpen),
            _ => self.parse_number(),
        }
    }

    fn parse_number(&mut self) -> Result<Value, ParseError> {
        let negative = self.cursor.matches(Token::Minus);
        if negative {
            self.cursor.pop()?;
        }

        let front = self.cursor.pop()?;
        match front.token {
            Token::Integer => Ok(Value::Int(
                parse_int(front.slice(), negative).with_span(front.span, self.source())?,
            )),
            Token::Float => Ok(Value::Float(
                parse_float(front.slice(), negative).with_span(front.span, self.source())?,
            )),
            token => {
                let expected = if negative {
                    &[Token::Integer, Token::Float][..]
                } else {
                    VALUE_START
                };
                Err(ParseError::unexpected(
                    expected,
                    token,
                    self.source(),
                    front.span,
                ))
            }
        }
    }

    /// Skip over an expression that depends on a variable.
    ///
    /// Stops before the `,`, `)` or `]` that ends the element, brackets opened inside the
    /// expression are matched so `$foo['bar']` is skipped as a whole.
    fn skip_expression(&mut self) -> Result<(), ParseError> {
        let mut depth = 0usize;
        loop {
            let token = self.cursor.peek()?.token;
            match token {
                Token::Comma | Token::BracketClose | Token::SquareClose if depth == 0 => {
                    return Ok(())
                }
                Token::BracketOpen | Token::SquareOpen => depth += 1,
                Token::BracketClose | Token::SquareClose => depth -= 1,
                _ => {}
            }
            self.cursor.pop()?;
        }
    }

    fn skip_comments(&mut self) {
        while self
            .cursor
            .peek()
            .map_or(false, |front| front.token.is_comment())
        {
            self.cursor.advance();
        }
    }
}

/// The constants that can be resolved statically
fn constant(name: &str) -> Option<Value> {
    match name {
        "null" => Some(Value::Null),
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        _ => None,
    }
}

/// Collects array elements, keeping track of the next automatic integer key
#[derive(Default)]
struct ArrayBuilder {
    max_int_key: Option<i64>,
    data: Array,
}

impl ArrayBuilder {
    /// One above the largest integer key so far, `0` if there are no integer keys
    fn next_key(&self) -> Option<i64> {
        match self.max_int_key {
            Some(max) => max.checked_add(1),
            None => Some(0),
        }
    }

    fn insert(&mut self, key: Key, value: Value) {
        if let Key::Int(int) = key {
            self.max_int_key = Some(self.max_int_key.map_or(int, |max| max.max(int)));
        }
        self.data.insert(key, value);
    }
}
