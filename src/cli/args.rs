//! Defines the command-line arguments and subcommands for the recdesc CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use termcolor::ColorChoice;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "recdesc",
    version,
    about = "Predictive recursive-descent recognizer for S -> AS | d, A -> Bc | aA, B -> ε | b."
)]
pub struct RecdescArgs {
    #[command(subcommand)]
    pub command: Command,

    /// How results are reported.
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// When to use colored output.
    #[arg(long, value_enum, global = true, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Stop at the first rejected input (also ends `repl` with status 1).
    #[arg(long, global = true)]
    pub fail_fast: bool,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Recognize each argument as a separate input string.
    Check {
        /// The strings to recognize.
        #[arg(required = true, allow_hyphen_values = true)]
        inputs: Vec<String>,
    },
    /// Recognize every line of a file ('-' reads stdin).
    File {
        /// The path to the file holding one input per line.
        #[arg(required = true)]
        path: PathBuf,
    },
    /// Read inputs interactively, one per line. Exits 0 on `:quit` or end of
    /// input unless `--fail-fast` stops it at a rejected line.
    Repl,
    /// Show FIRST/FOLLOW/predict sets and check the grammar is LL(1).
    Grammar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per input.
    Text,
    /// One JSON object per input.
    Json,
    /// Rich diagnostics with the offending position underlined.
    Rich,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolves `Auto` against whether stdout is a terminal.
    pub fn color_choice(self) -> ColorChoice {
        match self {
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
            ColorMode::Auto if atty::is(atty::Stream::Stdout) => ColorChoice::Auto,
            ColorMode::Auto => ColorChoice::Never,
        }
    }
}
