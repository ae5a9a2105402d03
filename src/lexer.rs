use logos::{Lexer, Logos, Span};
use memchr::memmem;
use parse_display::Display;
use std::fmt::{Debug, Formatter};

/// Lexical classes of the array literal grammar.
///
/// Whitespace is dropped by the lexer, comments are kept as tokens and skipped by the parser.
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy, Display)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    #[token("array", ignore(ascii_case))]
    #[display("'array'")]
    Array,
    #[token("=>")]
    #[display("'=>'")]
    Arrow,
    #[token("(")]
    #[display("'('")]
    BracketOpen,
    #[token(")")]
    #[display("')'")]
    BracketClose,
    #[token("[")]
    #[display("'['")]
    SquareOpen,
    #[token("]")]
    #[display("']'")]
    SquareClose,
    #[token(",")]
    #[display("','")]
    Comma,
    #[token(";")]
    #[display("';'")]
    SemiColon,
    #[token("-")]
    #[display("'-'")]
    Minus,
    #[regex("[a-zA-Z_][a-zA-Z0-9_]*")]
    #[display("identifier")]
    Identifier,
    #[regex("\\$[a-zA-Z_][a-zA-Z0-9_]*")]
    #[display("variable")]
    Variable,
    #[regex("(\"([^\"\\\\]|\\\\.)*\")|(\'([^\'\\\\]|\\\\.)*\')")]
    #[display("string literal")]
    LiteralString,
    #[regex("(([0-9]+(_[0-9]+)*\\.([0-9]+(_[0-9]+)*)?|\\.[0-9]+(_[0-9]+)*)([eE][+-]?[0-9]+(_[0-9]+)*)?|[0-9]+(_[0-9]+)*[eE][+-]?[0-9]+(_[0-9]+)*)")]
    #[display("float literal")]
    Float,
    #[regex("0|[1-9][0-9]*(_[0-9]+)*|0[xX][0-9a-fA-F]+(_[0-9a-fA-F]+)*|0[oO]?[0-7]+(_[0-7]+)*|0[bB][01]+(_[01]+)*")]
    #[display("integer literal")]
    Integer,
    #[regex("//[^\n]*")]
    #[display("comment")]
    LineComment,
    #[regex("#[^\n]*")]
    #[display("comment")]
    HashComment,
    #[token("/*", block_comment)]
    #[display("comment")]
    BlockComment,
    #[display("no valid token")]
    Error,
}

/// Consume the rest of a `/* ... */` comment, unterminated comments are lexing errors
fn block_comment(lex: &mut Lexer<Token>) -> bool {
    match memmem::find(lex.remainder().as_bytes(), b"*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => false,
    }
}

impl Token {
    pub fn is_comment(self) -> bool {
        matches!(
            self,
            Token::LineComment | Token::HashComment | Token::BlockComment
        )
    }

    /// Tokens that start a nested array
    pub fn opens_array(self) -> bool {
        matches!(self, Token::Array | Token::SquareOpen)
    }
}

#[derive(Clone, PartialEq)]
pub struct SpannedToken<'source> {
    pub token: Token,
    pub span: Span,
    pub source: &'source str,
}

impl<'source> SpannedToken<'source> {
    pub fn slice(&self) -> &'source str {
        &self.source[self.span.clone()]
    }
}

impl<'source> Debug for SpannedToken<'source> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}({:?})", self.token, self.slice())
    }
}

/// Split `source` into a flat token list, unrecognized input becomes [`Token::Error`]
pub fn tokenize(source: &str) -> Vec<SpannedToken<'_>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next() {
        tokens.push(SpannedToken {
            token: token.unwrap_or(Token::Error),
            span: lexer.span(),
            source,
        });
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).into_iter().map(|token| token.token).collect()
    }

    #[test]
    fn test_lex_array() {
        let source = r###"
        array (
            "double" => "quote",
            'single' => 'quote',
            "escaped" => "\"quote\"",
            1 => 2,
            "nested" => [
                "sub" => "key",
            ],
            "negative" => -1.5,
            "null" => NULL,
            "var" => $other;
        )
        "###;

        assert_eq!(
            kinds(source),
            vec![
                Token::Array,
                Token::BracketOpen,
                Token::LiteralString,
                Token::Arrow,
                Token::LiteralString,
                Token::Comma,
                Token::LiteralString,
                Token::Arrow,
                Token::LiteralString,
                Token::Comma,
                Token::LiteralString,
                Token::Arrow,
                Token::LiteralString,
                Token::Comma,
                Token::Integer,
                Token::Arrow,
                Token::Integer,
                Token::Comma,
                Token::LiteralString,
                Token::Arrow,
                Token::SquareOpen,
                Token::LiteralString,
                Token::Arrow,
                Token::LiteralString,
                Token::Comma,
                Token::SquareClose,
                Token::Comma,
                Token::LiteralString,
                Token::Arrow,
                Token::Minus,
                Token::Float,
                Token::Comma,
                Token::LiteralString,
                Token::Arrow,
                Token::Identifier,
                Token::Comma,
                Token::LiteralString,
                Token::Arrow,
                Token::Variable,
                Token::SemiColon,
                Token::BracketClose,
            ]
        );
    }

    #[test]
    fn test_lex_keyword_case() {
        assert_eq!(
            kinds("ARRAY Array arrays"),
            vec![Token::Array, Token::Array, Token::Identifier]
        );
    }

    #[test]
    fn test_lex_int() {
        assert_eq!(
            kinds("0,123,0x1F,0123,0o17,0b101,12_34"),
            vec![
                Token::Integer,
                Token::Comma,
                Token::Integer,
                Token::Comma,
                Token::Integer,
                Token::Comma,
                Token::Integer,
                Token::Comma,
                Token::Integer,
                Token::Comma,
                Token::Integer,
                Token::Comma,
                Token::Integer,
            ]
        );
    }

    #[test]
    fn test_lex_float() {
        assert_eq!(
            kinds(".5 1.0 1. 1e3 1E+3 2.5e-1 1_0.5 1.2_5e1_0"),
            vec![Token::Float; 8]
        );
    }

    #[test]
    fn test_lex_float_underscore() {
        assert_eq!(kinds("1._5"), vec![Token::Float, Token::Identifier]);
        assert_eq!(kinds("_1.5"), vec![Token::Identifier, Token::Float]);
    }

    #[test]
    fn test_lex_comments() {
        let source = "/**\n * doc\n */ 1 // line\n # hash\n /* a ** b */";
        let tokens = tokenize(source);
        assert_eq!(
            tokens.iter().map(|t| t.token).collect::<Vec<_>>(),
            vec![
                Token::BlockComment,
                Token::Integer,
                Token::LineComment,
                Token::HashComment,
                Token::BlockComment,
            ]
        );
        assert_eq!(tokens[2].slice(), "// line");
        assert_eq!(tokens[4].slice(), "/* a ** b */");
    }

    #[test]
    fn test_lex_block_comment() {
        let tokens = tokenize("/**/1/* skip */,/***/");
        assert_eq!(
            tokens.iter().map(|t| t.token).collect::<Vec<_>>(),
            vec![
                Token::BlockComment,
                Token::Integer,
                Token::BlockComment,
                Token::Comma,
                Token::BlockComment,
            ]
        );
        assert_eq!(tokens[0].slice(), "/**/");
        assert_eq!(tokens[2].slice(), "/* skip */");
        assert_eq!(tokens[4].slice(), "/***/");

        assert_eq!(kinds("/* open")[0], Token::Error);
    }

    #[test]
    fn test_lex_error() {
        assert_eq!(
            kinds("$a . 'b'"),
            vec![Token::Variable, Token::Error, Token::LiteralString]
        );
    }
}
