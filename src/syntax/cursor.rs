//! Input cursor for the recognizer.
//!
//! Owns the candidate string and the scan position. The position only moves
//! forward, one symbol per successful `consume`.

use tracing::trace;

use super::error::{Expected, SyntaxError, SyntaxResult};
use super::Symbol;

/// Immutable input plus the current scan position.
#[derive(Debug, Clone)]
pub struct Cursor {
    input: Vec<char>,
    pos: usize,
}

impl Cursor {
    /// Creates a cursor positioned at the first symbol of `input`.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
        }
    }

    /// Zero-based index of the symbol currently under inspection.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of symbols in the input.
    pub fn len(&self) -> usize {
        self.input.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Returns the symbol under the cursor, or the end marker past the last one.
    pub fn lookahead(&self) -> Symbol {
        self.input
            .get(self.pos)
            .copied()
            .map_or(Symbol::End, Symbol::Char)
    }

    /// Matches `expected` against the lookahead.
    ///
    /// On a match the cursor advances by one symbol; matching the end marker
    /// leaves the position where it is. On a mismatch the cursor does not move
    /// and the error names `expected` as the only acceptable symbol.
    pub fn consume(&mut self, expected: Symbol) -> SyntaxResult<()> {
        let found = self.lookahead();
        if found != expected {
            return Err(self.error(found, Expected::one(expected)));
        }

        if !found.is_end() {
            self.pos += 1;
        }
        trace!(symbol = %found, position = self.pos, "consumed");
        Ok(())
    }

    /// Builds a syntax error anchored at the current position.
    pub fn error(&self, found: Symbol, expected: Expected) -> SyntaxError {
        SyntaxError::new(self.pos, found, expected)
    }
}
