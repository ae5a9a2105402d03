use crate::error::ParseError;
use crate::lexer::{SpannedToken, Token};

/// What a token is compared against, either its kind or its exact text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Kind(Token),
    Text(&'static str),
}

impl From<Token> for Expected {
    fn from(token: Token) -> Self {
        Expected::Kind(token)
    }
}

impl From<&'static str> for Expected {
    fn from(text: &'static str) -> Self {
        Expected::Text(text)
    }
}

/// Forward only view over a token list with a single token of lookahead
pub struct TokenCursor<'source> {
    source: &'source str,
    tokens: Vec<SpannedToken<'source>>,
    position: usize,
}

impl<'source> TokenCursor<'source> {
    pub fn new(source: &'source str, tokens: Vec<SpannedToken<'source>>) -> Self {
        TokenCursor {
            source,
            tokens,
            position: 0,
        }
    }

    pub fn source(&self) -> &'source str {
        self.source
    }

    pub fn done(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub fn peek(&self) -> Result<&SpannedToken<'source>, ParseError> {
        self.tokens
            .get(self.position)
            .ok_or_else(|| ParseError::end_of_tokens(self.source))
    }

    pub fn pop(&mut self) -> Result<SpannedToken<'source>, ParseError> {
        let token = self.peek()?.clone();
        self.advance();
        Ok(token)
    }

    /// Move past the front token, does nothing when no tokens are left
    pub fn advance(&mut self) {
        if !self.done() {
            self.position += 1;
        }
    }

    /// Check the front token without consuming it, `false` when no tokens are left
    pub fn matches(&self, expected: impl Into<Expected>) -> bool {
        match (self.tokens.get(self.position), expected.into()) {
            (Some(front), Expected::Kind(kind)) => front.token == kind,
            (Some(front), Expected::Text(text)) => front.slice() == text,
            (None, _) => false,
        }
    }

    /// Consume the front token if it matches, fail otherwise
    pub fn expect(&mut self, expected: impl Into<Expected>) -> Result<(), ParseError> {
        let expected = expected.into();
        let front = self.peek()?;
        if self.matches(expected) {
            self.advance();
            return Ok(());
        }
        let kind = match expected {
            Expected::Kind(kind) => kind,
            Expected::Text(text) => token_for_text(text),
        };
        Err(ParseError::unexpected(
            &[kind],
            front.token,
            self.source,
            front.span.clone(),
        ))
    }
}

fn token_for_text(text: &str) -> Token {
    match text {
        "(" => Token::BracketOpen,
        ")" => Token::BracketClose,
        "[" => Token::SquareOpen,
        "]" => Token::SquareClose,
        "," => Token::Comma,
        ";" => Token::SemiColon,
        "-" => Token::Minus,
        "=>" => Token::Arrow,
        text if text.eq_ignore_ascii_case("array") => Token::Array,
        _ => Token::Error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    #[test]
    fn test_cursor() {
        let source = "[1, 'a']";
        let mut cursor = TokenCursor::new(source, tokenize(source));

        assert!(!cursor.done());
        assert!(cursor.matches(Token::SquareOpen));
        assert!(cursor.matches("["));
        assert!(!cursor.matches(Token::BracketOpen));
        cursor.expect("[").unwrap();

        assert_eq!(cursor.peek().unwrap().token, Token::Integer);
        assert_eq!(cursor.pop().unwrap().slice(), "1");
        cursor.expect(Token::Comma).unwrap();
        assert_eq!(cursor.pop().unwrap().slice(), "'a'");
        cursor.expect(Token::SquareClose).unwrap();

        assert!(cursor.done());
        assert!(!cursor.matches(Token::SquareClose));
        assert!(matches!(cursor.peek(), Err(ParseError::EndOfTokens { .. })));
        assert!(matches!(cursor.pop(), Err(ParseError::EndOfTokens { .. })));
        assert!(matches!(
            cursor.expect(","),
            Err(ParseError::EndOfTokens { .. })
        ));
    }

    #[test]
    fn test_advance() {
        let source = "1 2";
        let mut cursor = TokenCursor::new(source, tokenize(source));
        cursor.advance();
        assert_eq!(cursor.peek().unwrap().slice(), "2");
        cursor.advance();
        assert!(cursor.done());
        cursor.advance();
        assert!(cursor.done());
        assert!(matches!(cursor.pop(), Err(ParseError::EndOfTokens { .. })));
    }

    #[test]
    fn test_expect_mismatch() {
        let source = "array 1";
        let mut cursor = TokenCursor::new(source, tokenize(source));
        cursor.expect(Token::Array).unwrap();

        match cursor.expect("(") {
            Err(ParseError::UnexpectedToken {
                expected, found, ..
            }) => {
                assert!(expected.contains(Token::BracketOpen));
                assert_eq!(found, Token::Integer);
            }
            res => panic!("unexpected result {:?}", res),
        }
        // a failed expect doesn't consume
        assert_eq!(cursor.pop().unwrap().slice(), "1");
    }
}
