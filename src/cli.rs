//! The recdesc Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands. It owns every
//! source of input and every output channel; the recognizer only sees strings.

use std::{
    fs::File,
    io::{self, BufReader},
    path::Path,
    process,
};

use clap::Parser;
use termcolor::{ColorChoice, StandardStream};

use crate::{
    errors::{print_error, AppError},
    repl::run_repl,
    session::{
        run_session, ArgsSource, InputSource, LineSource, Reporter, SessionOptions,
        SessionSummary,
    },
    validation::{validate_grammar, ANALYSIS},
};

pub mod args;
pub mod output;

use args::{Command, OutputFormat, RecdescArgs};
use output::{JsonReporter, MietteReporter, TextReporter};

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
///
/// Exits with status 1 when any input is rejected, the grammar check fails,
/// or input cannot be read. The interactive `repl` exits with status 0 on
/// `:quit` or end of input however many lines were rejected, unless
/// `--fail-fast` stopped it at a rejected line.
pub fn run() {
    let args = RecdescArgs::parse();
    let choice = args.color.color_choice();
    let options = SessionOptions {
        fail_fast: args.fail_fast,
    };

    let outcome = match args.command {
        Command::Check { inputs } => {
            let mut source = ArgsSource::new(inputs);
            check_all(&mut source, args.format, choice, options)
        }
        Command::File { path } => check_file(&path, args.format, choice, options),
        // Rejected lines only fail the process when --fail-fast ended the loop.
        Command::Repl => {
            let mut reporter = make_reporter(args.format, choice);
            let stdin = io::stdin();
            run_repl(stdin.lock(), io::stdout(), reporter.as_mut(), options)
                .map(|summary| !options.fail_fast || summary.all_accepted())
        }
        Command::Grammar => show_grammar(args.format, choice),
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            print_error(e);
            process::exit(1);
        }
    }
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

fn make_reporter(format: OutputFormat, choice: ColorChoice) -> Box<dyn Reporter> {
    match format {
        OutputFormat::Text => Box::new(TextReporter::stdout(choice)),
        OutputFormat::Json => Box::new(JsonReporter::new(io::stdout())),
        OutputFormat::Rich => Box::new(MietteReporter::new(choice)),
    }
}

fn check_all(
    source: &mut dyn InputSource,
    format: OutputFormat,
    choice: ColorChoice,
    options: SessionOptions,
) -> Result<bool, AppError> {
    let mut reporter = make_reporter(format, choice);
    let summary: SessionSummary = run_session(source, reporter.as_mut(), options)?;
    Ok(summary.all_accepted())
}

fn check_file(
    path: &Path,
    format: OutputFormat,
    choice: ColorChoice,
    options: SessionOptions,
) -> Result<bool, AppError> {
    if path == Path::new("-") {
        let stdin = io::stdin();
        let mut source = LineSource::new(stdin.lock(), "<stdin>");
        return check_all(&mut source, format, choice, options);
    }

    let file = File::open(path).map_err(|e| AppError::read(path, e))?;
    let mut source = LineSource::new(BufReader::new(file), path.display().to_string());
    check_all(&mut source, format, choice, options)
}

fn show_grammar(format: OutputFormat, choice: ColorChoice) -> Result<bool, AppError> {
    let validation = validate_grammar();
    match format {
        OutputFormat::Json => {
            output::write_grammar_json(&mut io::stdout(), &ANALYSIS, &validation)?
        }
        OutputFormat::Text | OutputFormat::Rich => {
            let mut stdout = StandardStream::stdout(choice);
            output::write_grammar_text(&mut stdout, &ANALYSIS, &validation)
                .map_err(AppError::Write)?;
        }
    }
    Ok(validation.is_valid())
}
