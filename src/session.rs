//! Recognition sessions
//!
//! A session pulls candidate strings from an `InputSource`, recognizes each
//! with a fresh `Recognizer`, and hands the outcome to a `Reporter`. The
//! recognizer never touches I/O; everything observable happens here.

use std::io::BufRead;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::errors::{AppError, SourceContext};
use crate::syntax::{Recognizer, SyntaxError};

// ============================================================================
// CANDIDATES AND SOURCES
// ============================================================================

/// One string to recognize, named for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub input: String,
}

impl Candidate {
    pub fn new(name: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            input: input.into(),
        }
    }

    pub fn source_context(&self) -> SourceContext {
        SourceContext::new(self.name.clone(), self.input.clone())
    }
}

/// Obtains the next candidate string; `Ok(None)` ends the session.
pub trait InputSource {
    fn next_candidate(&mut self) -> Result<Option<Candidate>, AppError>;
}

/// Candidates given up front, e.g. command-line arguments.
#[derive(Debug, Clone)]
pub struct ArgsSource {
    inputs: std::vec::IntoIter<String>,
    index: usize,
}

impl ArgsSource {
    pub fn new(inputs: Vec<String>) -> Self {
        Self {
            inputs: inputs.into_iter(),
            index: 0,
        }
    }
}

impl InputSource for ArgsSource {
    fn next_candidate(&mut self) -> Result<Option<Candidate>, AppError> {
        let Some(input) = self.inputs.next() else {
            return Ok(None);
        };
        self.index += 1;
        Ok(Some(Candidate::new(format!("<arg:{}>", self.index), input)))
    }
}

/// One candidate per line of a reader.
///
/// Only the line terminator is stripped. Spaces and tabs are part of the
/// candidate, and an empty line is the empty candidate. Bytes that are not
/// valid UTF-8 become U+FFFD, so such a line is rejected like any other line
/// holding a foreign symbol instead of ending the session.
pub struct LineSource<R> {
    reader: R,
    name: String,
    line: usize,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        Self {
            reader,
            name: name.into(),
            line: 0,
        }
    }

    /// Reads one line without its terminator, `None` at end of stream.
    pub fn read_line(&mut self) -> Result<Option<String>, AppError> {
        let mut buf = Vec::new();
        let read = self
            .reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| AppError::read(PathBuf::from(&self.name), e))?;
        if read == 0 {
            return Ok(None);
        }
        self.line += 1;
        strip_line_terminator(&mut buf);
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }

    pub fn line_number(&self) -> usize {
        self.line
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<R: BufRead> InputSource for LineSource<R> {
    fn next_candidate(&mut self) -> Result<Option<Candidate>, AppError> {
        let Some(input) = self.read_line()? else {
            return Ok(None);
        };
        Ok(Some(Candidate::new(
            format!("{}:{}", self.name, self.line),
            input,
        )))
    }
}

fn strip_line_terminator(line: &mut Vec<u8>) {
    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }
}

// ============================================================================
// REPORTING
// ============================================================================

/// Receives the outcome of each recognition attempt.
pub trait Reporter {
    fn accepted(&mut self, candidate: &Candidate) -> Result<(), AppError>;
    fn rejected(&mut self, candidate: &Candidate, error: &SyntaxError) -> Result<(), AppError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Stop after the first rejected candidate.
    pub fail_fast: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub accepted: usize,
    pub rejected: usize,
}

impl SessionSummary {
    pub fn total(&self) -> usize {
        self.accepted + self.rejected
    }

    pub fn all_accepted(&self) -> bool {
        self.rejected == 0
    }
}

/// Recognizes a single candidate and reports the outcome.
pub fn check_candidate(
    candidate: &Candidate,
    reporter: &mut dyn Reporter,
) -> Result<bool, AppError> {
    match Recognizer::new(&candidate.input).recognize() {
        Ok(()) => {
            reporter.accepted(candidate)?;
            Ok(true)
        }
        Err(e) => {
            reporter.rejected(candidate, &e)?;
            Ok(false)
        }
    }
}

/// Runs every candidate from `source` through its own recognizer.
pub fn run_session(
    source: &mut dyn InputSource,
    reporter: &mut dyn Reporter,
    options: SessionOptions,
) -> Result<SessionSummary, AppError> {
    let mut summary = SessionSummary::default();

    while let Some(candidate) = source.next_candidate()? {
        debug!(name = %candidate.name, "checking candidate");
        if check_candidate(&candidate, reporter)? {
            summary.accepted += 1;
        } else {
            summary.rejected += 1;
            if options.fail_fast {
                debug!("stopping after first rejection");
                break;
            }
        }
    }

    info!(
        accepted = summary.accepted,
        rejected = summary.rejected,
        "session finished"
    );
    Ok(summary)
}
