//! Handles all user-facing output for the CLI.
//!
//! Every reporter renders the same two messages; they differ only in where
//! the text goes and how it is decorated.

use std::io::Write;

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::errors::{print_error, AppError, SourcedSyntaxError};
use crate::session::{Candidate, Reporter};
use crate::syntax::{Expected, Symbol, SyntaxError};
use crate::validation::grammar::{GrammarAnalysis, SymbolSet, ValidationResult};

// ============================================================================
// MESSAGE FORMATS
// ============================================================================

pub fn accepted_message(candidate: &Candidate) -> String {
    format!("'{}' accepted!", candidate.input)
}

pub fn rejected_message(candidate: &Candidate, error: &SyntaxError) -> String {
    format!("Syntax error in '{}': {}", candidate.input, error)
}

// ============================================================================
// OUTPUT SINKS: OutputBuffer, TextReporter, JsonReporter, MietteReporter
// ============================================================================

/// OutputBuffer: collects report lines for testing or programmatic capture.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    pub lines: Vec<String>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_text(&self) -> String {
        self.lines.join("\n")
    }
}

impl Reporter for OutputBuffer {
    fn accepted(&mut self, candidate: &Candidate) -> Result<(), AppError> {
        self.lines.push(accepted_message(candidate));
        Ok(())
    }

    fn rejected(&mut self, candidate: &Candidate, error: &SyntaxError) -> Result<(), AppError> {
        self.lines.push(rejected_message(candidate, error));
        Ok(())
    }
}

/// Plain one-line-per-candidate output, colored when the sink supports it.
pub struct TextReporter<W> {
    out: W,
}

impl TextReporter<StandardStream> {
    pub fn stdout(choice: ColorChoice) -> Self {
        Self::new(StandardStream::stdout(choice))
    }
}

impl<W: WriteColor> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, color: Color, text: &str) -> Result<(), AppError> {
        self.out
            .set_color(ColorSpec::new().set_fg(Some(color)))
            .map_err(AppError::Write)?;
        write!(self.out, "{}", text).map_err(AppError::Write)?;
        self.out.reset().map_err(AppError::Write)?;
        writeln!(self.out).map_err(AppError::Write)
    }
}

impl<W: WriteColor> Reporter for TextReporter<W> {
    fn accepted(&mut self, candidate: &Candidate) -> Result<(), AppError> {
        self.write_line(Color::Green, &accepted_message(candidate))
    }

    fn rejected(&mut self, candidate: &Candidate, error: &SyntaxError) -> Result<(), AppError> {
        self.write_line(Color::Red, &rejected_message(candidate, error))
    }
}

/// JSON lines: one object per candidate.
pub struct JsonReporter<W> {
    out: W,
}

#[derive(Debug, Serialize)]
struct JsonOutcome<'a> {
    name: &'a str,
    input: &'a str,
    accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonError<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonError<'a> {
    position: usize,
    found: Symbol,
    expected: &'a Expected,
    message: String,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, outcome: &JsonOutcome<'_>) -> Result<(), AppError> {
        serde_json::to_writer(&mut self.out, outcome)?;
        writeln!(self.out).map_err(AppError::Write)
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn accepted(&mut self, candidate: &Candidate) -> Result<(), AppError> {
        self.emit(&JsonOutcome {
            name: &candidate.name,
            input: &candidate.input,
            accepted: true,
            error: None,
        })
    }

    fn rejected(&mut self, candidate: &Candidate, error: &SyntaxError) -> Result<(), AppError> {
        self.emit(&JsonOutcome {
            name: &candidate.name,
            input: &candidate.input,
            accepted: false,
            error: Some(JsonError {
                position: error.position,
                found: error.found,
                expected: &error.expected,
                message: error.to_string(),
            }),
        })
    }
}

/// Acceptances as text on stdout, rejections as full miette reports on stderr.
pub struct MietteReporter {
    text: TextReporter<StandardStream>,
}

impl MietteReporter {
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            text: TextReporter::stdout(choice),
        }
    }
}

impl Reporter for MietteReporter {
    fn accepted(&mut self, candidate: &Candidate) -> Result<(), AppError> {
        self.text.accepted(candidate)
    }

    fn rejected(&mut self, candidate: &Candidate, error: &SyntaxError) -> Result<(), AppError> {
        print_error(SourcedSyntaxError::new(
            error.clone(),
            &candidate.source_context(),
        ));
        Ok(())
    }
}

// ============================================================================
// GRAMMAR REPORT
// ============================================================================

fn format_set(set: &SymbolSet) -> String {
    let items: Vec<String> = set.iter().map(|s| s.to_string()).collect();
    format!("{{ {} }}", items.join(", "))
}

/// Writes the productions, FIRST/FOLLOW/predict sets and the LL(1) verdict.
pub fn write_grammar_text<W: WriteColor>(
    out: &mut W,
    analysis: &GrammarAnalysis,
    validation: &ValidationResult,
) -> std::io::Result<()> {
    let grammar = analysis.grammar();

    out.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(out, "Grammar (start symbol {})", grammar.start)?;
    out.reset()?;
    for (i, production) in grammar.productions.iter().enumerate() {
        writeln!(out, "  {}: {}", i, production)?;
    }

    writeln!(out)?;
    for name in grammar.nonterminals() {
        let empty = SymbolSet::new();
        let first = analysis.first_of(name).unwrap_or(&empty);
        let follow = analysis.follow_of(name).unwrap_or(&empty);
        writeln!(
            out,
            "  {:<2} nullable={:<5} FIRST={} FOLLOW={}",
            name,
            analysis.is_nullable(name),
            format_set(first),
            format_set(follow)
        )?;
    }

    writeln!(out)?;
    for (i, production) in grammar.productions.iter().enumerate() {
        writeln!(
            out,
            "  predict({}) = {}",
            production,
            format_set(&analysis.predict[i])
        )?;
    }

    writeln!(out)?;
    for warning in &validation.warnings {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        writeln!(out, "warning: {}", warning)?;
        out.reset()?;
    }
    for error in &validation.errors {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
        writeln!(out, "error: {}", error)?;
        out.reset()?;
    }

    if validation.is_valid() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        writeln!(out, "Grammar is LL(1)")?;
    } else {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
        writeln!(out, "Grammar is not LL(1)")?;
    }
    out.reset()
}

#[derive(Debug, Serialize)]
struct GrammarReport<'a> {
    start: &'static str,
    productions: Vec<String>,
    analysis: &'a GrammarAnalysis,
    validation: &'a ValidationResult,
    ll1: bool,
}

/// Writes the same report as a single JSON object.
pub fn write_grammar_json<W: Write>(
    out: &mut W,
    analysis: &GrammarAnalysis,
    validation: &ValidationResult,
) -> Result<(), AppError> {
    let grammar = analysis.grammar();
    let report = GrammarReport {
        start: grammar.start,
        productions: grammar.productions.iter().map(|p| p.to_string()).collect(),
        analysis,
        validation,
        ll1: validation.is_valid(),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out).map_err(AppError::Write)
}
