pub use crate::errors::{AppError, SourceContext, SourcedSyntaxError};
pub use crate::syntax::{Expected, Recognizer, Symbol, SyntaxError, SyntaxResult};

pub mod cli;
pub mod errors;
pub mod repl;
pub mod session;
pub mod syntax;
pub mod validation;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Recognizes `input` against `S -> A S | d`, `A -> B c | a A`, `B -> <empty> | b`.
///
/// Each call runs a fresh recognizer; no state is shared between calls.
pub fn recognize(input: &str) -> SyntaxResult<()> {
    Recognizer::new(input).recognize()
}

/// Install a tracing subscriber on stderr when `RUST_LOG` is set.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
