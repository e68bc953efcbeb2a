pub mod grammar;

// Re-exports for concise imports
pub use grammar::{
    validate_grammar, Grammar, GrammarAnalysis, GrammarSymbol, Production, ValidationResult,
    ANALYSIS, GRAMMAR,
};
