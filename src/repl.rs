//! Recdesc REPL (Read-Recognize-Print Loop)
//!
//! Reads one candidate per line and reports each through the given reporter.
//! Every line gets its own recognizer; nothing carries over between lines.

use std::io::{BufRead, Write};

use crate::errors::AppError;
use crate::session::{
    check_candidate, Candidate, LineSource, Reporter, SessionOptions, SessionSummary,
};

const PROMPT: &str = "input> ";

const HELP: &str = "\
Enter a string to check it against the grammar:
  S -> A S | d
  A -> B c | a A
  B -> <empty> | b
Commands: :help, :h  :quit, :q
";

/// REPL command results
enum ReplCommand {
    Continue,
    Quit,
}

/// Main REPL entry point.
///
/// Stops at end of input, on `:quit`, or after the first rejected line when
/// `options.fail_fast` is set. Returns how many lines were accepted and
/// rejected.
pub fn run_repl<R, W>(
    input: R,
    mut out: W,
    reporter: &mut dyn Reporter,
    options: SessionOptions,
) -> Result<SessionSummary, AppError>
where
    R: BufRead,
    W: Write,
{
    writeln!(out, "recdesc v{}", env!("CARGO_PKG_VERSION")).map_err(AppError::Write)?;
    writeln!(out, "Type :help for help, :quit to exit").map_err(AppError::Write)?;

    let mut lines = LineSource::new(input, "<stdin>");
    let mut summary = SessionSummary::default();

    loop {
        write!(out, "{}", PROMPT).map_err(AppError::Write)?;
        out.flush().map_err(AppError::Write)?;

        let Some(line) = lines.read_line()? else {
            writeln!(out).map_err(AppError::Write)?;
            break;
        };

        if line.starts_with(':') {
            if let Some(command) = handle_repl_command(&line, &mut out)? {
                match command {
                    ReplCommand::Continue => continue,
                    ReplCommand::Quit => break,
                }
            }
        }

        let candidate = Candidate::new(format!("<stdin:{}>", lines.line_number()), line);
        if check_candidate(&candidate, reporter)? {
            summary.accepted += 1;
        } else {
            summary.rejected += 1;
            if options.fail_fast {
                break;
            }
        }
    }

    Ok(summary)
}

/// Handles lines naming a REPL command; any other line is recognized as input.
fn handle_repl_command<W: Write>(
    line: &str,
    out: &mut W,
) -> Result<Option<ReplCommand>, AppError> {
    match line {
        ":help" | ":h" => {
            write!(out, "{}", HELP).map_err(AppError::Write)?;
            Ok(Some(ReplCommand::Continue))
        }
        ":quit" | ":q" => Ok(Some(ReplCommand::Quit)),
        _ => Ok(None),
    }
}
