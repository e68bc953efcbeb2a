//! Syntax module for the recdesc recognizer
//!
//! The recognizer works over single characters. Every character of the input is
//! one grammar symbol, and a distinguished end marker stands for "no more input".

use std::fmt;

use serde::{Serialize, Serializer};

pub mod cursor;
pub mod error;
pub mod parser;

pub use cursor::Cursor;
pub use error::{Expected, SyntaxError, SyntaxResult};
pub use parser::Recognizer;

/// A terminal symbol as seen by the recognizer.
///
/// `End` is the virtual terminal returned by lookahead once the whole input has
/// been consumed. It never equals any `Char`, including `'\0'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Char(char),
    End,
}

impl Symbol {
    pub fn is_end(self) -> bool {
        matches!(self, Symbol::End)
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        Symbol::Char(c)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Char(c) => write!(f, "{}", c),
            Symbol::End => f.write_str("\\0"),
        }
    }
}

/// The end marker serializes as `null` so JSON consumers can tell it apart
/// from any character.
impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Symbol::Char(c) => serializer.serialize_char(*c),
            Symbol::End => serializer.serialize_none(),
        }
    }
}
