//! Recdesc Error Handling
//!
//! The recognizer itself only ever produces a `SyntaxError`. This module holds
//! what surrounds it when a driver reports results: the candidate's source
//! context for rich diagnostics, and the failures a driver can hit on its own.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use thiserror::Error;

use crate::syntax::SyntaxError;

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// A candidate string together with the name it is reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Convert to NamedSource for use with miette error reporting
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }

    /// Byte span of the symbol at `position` (a character index).
    ///
    /// Positions at or past the end map to an empty span at the end of the
    /// content, so "ran out of input" points just after the last character.
    pub fn span_at(&self, position: usize) -> SourceSpan {
        match self.content.char_indices().nth(position) {
            Some((offset, c)) => SourceSpan::from(offset..offset + c.len_utf8()),
            None => SourceSpan::from(self.content.len()..self.content.len()),
        }
    }
}

// ============================================================================
// SOURCED SYNTAX ERROR - SyntaxError with its candidate attached
// ============================================================================

/// A syntax error bound to the text it was found in, for miette rendering.
#[derive(Debug, Clone)]
pub struct SourcedSyntaxError {
    pub error: SyntaxError,
    pub source: Arc<NamedSource<String>>,
    pub primary_span: SourceSpan,
}

impl SourcedSyntaxError {
    pub fn new(error: SyntaxError, context: &SourceContext) -> Self {
        let primary_span = context.span_at(error.position);
        Self {
            error,
            source: context.to_named_source(),
            primary_span,
        }
    }
}

impl fmt::Display for SourcedSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Syntax error: {}", self.error)
    }
}

impl std::error::Error for SourcedSyntaxError {}

impl Diagnostic for SourcedSyntaxError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.error.error_code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.error.help_text()))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = vec![LabeledSpan::new_with_span(
            Some(self.error.label()),
            self.primary_span,
        )];
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&*self.source)
    }
}

// ============================================================================
// DRIVER ERRORS
// ============================================================================

/// Failures outside recognition: reading candidates or writing reports.
#[derive(Debug, Error, Diagnostic)]
pub enum AppError {
    #[error("failed to read input from {path}")]
    #[diagnostic(code(recdesc::io::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write report")]
    #[diagnostic(code(recdesc::io::write))]
    Write(#[source] std::io::Error),

    #[error("failed to encode report as JSON")]
    #[diagnostic(code(recdesc::io::json))]
    Json(#[from] serde_json::Error),
}

impl AppError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints any diagnostic with full miette formatting to stderr.
pub fn print_error<E>(error: E)
where
    E: Diagnostic + Send + Sync + 'static,
{
    use miette::Report;
    let report = Report::new(error);
    eprintln!("{report:?}");
}

/// Renders a diagnostic to a string using miette's graphical handler
/// without colors, for buffers and tests.
pub fn render_plain(error: &dyn Diagnostic) -> String {
    use miette::{GraphicalReportHandler, GraphicalTheme};

    let mut out = String::new();
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    if handler.render_report(&mut out, error).is_err() {
        out = error.to_string();
    }
    out
}
