use std::fmt;

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

use super::Symbol;

// =============================================================================
// EXPECTED SYMBOLS
// =============================================================================

/// The symbols that would have been acceptable at the failure position.
///
/// Order is preserved as given at the failure site and duplicates are dropped,
/// so the rendering is stable for a given decision point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Expected(Vec<Symbol>);

impl Expected {
    /// A single acceptable symbol, as produced by `consume`.
    pub fn one(symbol: Symbol) -> Self {
        Self(vec![symbol])
    }

    /// One of several acceptable symbols, as produced by a procedure's dispatch.
    pub fn one_of(symbols: &[Symbol]) -> Self {
        let mut unique = Vec::with_capacity(symbols.len());
        for &symbol in symbols {
            if !unique.contains(&symbol) {
                unique.push(symbol);
            }
        }
        Self(unique)
    }

    /// Shorthand for a set made only of characters.
    pub fn chars(chars: &[char]) -> Self {
        let symbols: Vec<Symbol> = chars.iter().copied().map(Symbol::Char).collect();
        Self::one_of(&symbols)
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.0.contains(&symbol)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, symbol) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}

// =============================================================================
// SYNTAX ERROR
// =============================================================================

pub type SyntaxResult<T> = Result<T, SyntaxError>;

/// The single failure value of a recognition attempt.
///
/// Built once where the mismatch is detected and handed back to the caller
/// untouched; callers rely on field equality to compare attempts.
///
/// Rendering is uniform across failure sites: expected symbols are always
/// joined with `", "` (`expected: a, b, c, d` where S fails, `expected: a, b, c`
/// where A fails), and the end marker prints as the two characters `\0`.
/// Tools matching older `a,b,c,d` output need to accept the spaced form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error, Serialize)]
#[error("Position {position}, found '{found}', expected: {expected}")]
pub struct SyntaxError {
    /// Cursor position at failure time (zero-based symbol index).
    pub position: usize,
    /// The lookahead actually observed, possibly the end marker.
    pub found: Symbol,
    /// What would have been accepted instead.
    pub expected: Expected,
}

impl SyntaxError {
    pub fn new(position: usize, found: Symbol, expected: Expected) -> Self {
        Self {
            position,
            found,
            expected,
        }
    }

    /// True when the attempt failed because the input ran out.
    pub fn is_unexpected_end(&self) -> bool {
        self.found.is_end()
    }

    /// True when input remained after a complete derivation of the start symbol.
    pub fn is_trailing_input(&self) -> bool {
        self.expected == Expected::one(Symbol::End)
    }

    pub const fn error_code(&self) -> &'static str {
        "recdesc::syntax::unexpected_symbol"
    }

    /// Short label for the offending symbol, used by report renderers.
    pub fn label(&self) -> String {
        if self.is_unexpected_end() {
            "input ends here".into()
        } else if self.is_trailing_input() {
            format!("unexpected trailing '{}'", self.found)
        } else {
            format!("unexpected '{}'", self.found)
        }
    }

    pub fn help_text(&self) -> String {
        if self.expected.len() == 1 {
            format!("expected '{}' at position {}", self.expected, self.position)
        } else {
            format!(
                "expected one of {} at position {}",
                self.expected, self.position
            )
        }
    }
}

impl Diagnostic for SyntaxError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.error_code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.help_text()))
    }
}
