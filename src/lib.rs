//! Parser for statically defined php array literals.
//!
//! Reads `array(...)` and `[...]` literals, or lists of array elements extracted from a larger
//! php file, into an ordered [`Value`] tree without executing any php.
//!
//! ```rust
//! use php_array_parser::{parse_literal, Key, Value};
//! # use std::error::Error;
//!
//! # fn main() -> Result<(), Box<dyn Error>> {
//! let value = parse_literal("array(5 => 'a', 'b', 'c' => $config['c'])")?;
//!
//! assert_eq!(value[5i64], "a");
//! assert_eq!(value[6i64], "b");
//! assert!(value["c"].is_unresolved());
//! assert_eq!(
//!     value.keys().collect::<Vec<_>>(),
//!     vec![&Key::Int(5), &Key::Int(6), &Key::from("c")]
//! );
//! # Ok(())
//! # }
//! ```
mod cursor;
mod error;
mod extract;
mod lexer;
mod num;
mod parser;
mod serde_impl;
mod string;
mod value;

pub use cursor::{Expected, TokenCursor};
pub use error::{ExtractError, ParseError, PrimitiveErrorKind, TokenList};
pub use extract::{parse_all, parse_file, Extractor};
pub use lexer::{tokenize, SpannedToken, Token};
pub use num::ParseIntError;
pub use parser::{parse_list, parse_literal, Parser};
pub use serde_impl::{from_str, from_value};
pub use string::UnescapeError;
pub use value::{Array, Key, Value};
