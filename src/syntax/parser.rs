//! Predictive recognizer for the fixed grammar
//!
//! ```text
//! S0 -> S <end>
//! S  -> A S | d
//! A  -> B c | a A
//! B  -> <empty> | b
//! ```
//!
//! One procedure per nonterminal. Each reads the lookahead once per decision,
//! picks exactly one production from it, and walks that production left to
//! right. The right-recursive productions `S -> A S` and `A -> a A` loop instead
//! of calling themselves, so stack depth stays constant in the input length.
//! The first error aborts the whole attempt and is returned unchanged.

use tracing::{debug, trace};

use super::cursor::Cursor;
use super::error::{Expected, SyntaxResult};
use super::Symbol;

// FIRST(A S) = {a, b, c}, FIRST(d) = {d}
const S_EXPECTED: [char; 4] = ['a', 'b', 'c', 'd'];
// FIRST(a A) = {a}, FIRST(B c) = {b, c}
const A_EXPECTED: [char; 3] = ['a', 'b', 'c'];
// FIRST(b) = {b}, FOLLOW(B) = {c}
const B_EXPECTED: [char; 2] = ['b', 'c'];

/// A single recognition attempt over one candidate string.
///
/// `recognize` takes the recognizer by value; retrying requires a new instance.
#[derive(Debug, Clone)]
pub struct Recognizer {
    cursor: Cursor,
}

impl Recognizer {
    /// Binds a recognizer to `input` at position 0.
    pub fn new(input: &str) -> Self {
        Self {
            cursor: Cursor::new(input),
        }
    }

    /// Runs the augmented start rule `S0 -> S <end>`.
    pub fn recognize(mut self) -> SyntaxResult<()> {
        let result = self.start();
        match &result {
            Ok(()) => debug!(length = self.cursor.len(), "input accepted"),
            Err(e) => debug!(
                position = e.position,
                found = %e.found,
                expected = %e.expected,
                "input rejected"
            ),
        }
        result
    }

    // =========================================================================
    // NONTERMINAL PROCEDURES
    // =========================================================================

    fn start(&mut self) -> SyntaxResult<()> {
        self.s()?;
        self.cursor.consume(Symbol::End)
    }

    fn s(&mut self) -> SyntaxResult<()> {
        loop {
            match self.enter("S") {
                // S -> A S; the trailing S is the next iteration
                Symbol::Char('a' | 'b' | 'c') => self.a()?,
                // S -> d
                Symbol::Char('d') => return self.cursor.consume(Symbol::Char('d')),
                found => return Err(self.cursor.error(found, Expected::chars(&S_EXPECTED))),
            }
        }
    }

    fn a(&mut self) -> SyntaxResult<()> {
        loop {
            match self.enter("A") {
                // A -> a A; the trailing A is the next iteration
                Symbol::Char('a') => self.cursor.consume(Symbol::Char('a'))?,
                // A -> B c
                Symbol::Char('b' | 'c') => {
                    self.b()?;
                    return self.cursor.consume(Symbol::Char('c'));
                }
                found => return Err(self.cursor.error(found, Expected::chars(&A_EXPECTED))),
            }
        }
    }

    fn b(&mut self) -> SyntaxResult<()> {
        let next = self.enter("B");
        match next {
            // B -> b
            Symbol::Char('b') => self.cursor.consume(Symbol::Char('b')),
            // B -> <empty>, chosen on FOLLOW(B)
            Symbol::Char('c') => Ok(()),
            found => Err(self.cursor.error(found, Expected::chars(&B_EXPECTED))),
        }
    }

    fn enter(&self, nonterminal: &'static str) -> Symbol {
        let next = self.cursor.lookahead();
        trace!(
            nonterminal,
            position = self.cursor.position(),
            lookahead = %next,
            "enter"
        );
        next
    }
}
