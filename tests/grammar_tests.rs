// tests/grammar_tests.rs

use recdesc::cli::output::{write_grammar_json, write_grammar_text};
use recdesc::recognize;
use recdesc::syntax::Symbol;
use recdesc::validation::grammar::{validate, PredictEntry, SymbolSet};
use recdesc::validation::{
    validate_grammar, Grammar, GrammarAnalysis, GrammarSymbol::Nonterminal as N,
    GrammarSymbol::Terminal as T, Production, ANALYSIS,
};
use termcolor::NoColor;

fn lookaheads() -> Vec<Symbol> {
    let mut all: Vec<Symbol> = ['a', 'b', 'c', 'd', 'x']
        .into_iter()
        .map(Symbol::Char)
        .collect();
    all.push(Symbol::End);
    all
}

fn with_lookahead(prefix: &str, lookahead: Symbol) -> String {
    match lookahead {
        Symbol::Char(c) => format!("{}{}", prefix, c),
        Symbol::End => prefix.to_string(),
    }
}

fn entry(nonterminal: &'static str, c: char, production: usize) -> PredictEntry {
    PredictEntry {
        nonterminal,
        lookahead: Symbol::Char(c),
        production,
    }
}

// ---
// Parse table of the built-in grammar
// ---

#[test]
fn test_predict_table_rows() {
    assert_eq!(
        ANALYSIS.predict_table(),
        vec![
            entry("S", 'a', 0),
            entry("S", 'b', 0),
            entry("S", 'c', 0),
            entry("S", 'd', 1),
            entry("A", 'b', 2),
            entry("A", 'c', 2),
            entry("A", 'a', 3),
            entry("B", 'c', 4),
            entry("B", 'b', 5),
        ]
    );
}

#[test]
fn test_end_marker_is_in_follow_of_start_only() {
    assert!(ANALYSIS.follow_of("S").unwrap().contains(&Symbol::End));
    assert!(!ANALYSIS.follow_of("A").unwrap().contains(&Symbol::End));
    assert!(!ANALYSIS.follow_of("B").unwrap().contains(&Symbol::End));
}

/// `S` is entered at position 0 and `A` right after a leading `a`. For every
/// lookahead the table rejects, the recognizer must fail right there with the
/// union of the predict sets as its expected symbols; for every lookahead the
/// table accepts it must get past that position.
#[test]
fn test_recognizer_agrees_with_predict_table() {
    for (nonterminal, prefix) in [("S", ""), ("A", "a")] {
        let expected: SymbolSet = ANALYSIS.expected_for(nonterminal);

        for lookahead in lookaheads() {
            let input = with_lookahead(prefix, lookahead);
            let outcome = recognize(&input);

            match ANALYSIS.select(nonterminal, lookahead) {
                Some(_) => {
                    if let Err(err) = outcome {
                        assert!(
                            err.position > prefix.len(),
                            "{} on '{}' should have been predicted: {}",
                            nonterminal,
                            lookahead,
                            err
                        );
                    }
                }
                None => {
                    let err = outcome.unwrap_err();
                    assert_eq!(err.position, prefix.len(), "input '{}'", input);
                    assert_eq!(err.found, lookahead);
                    let reported: SymbolSet = err.expected.symbols().iter().copied().collect();
                    assert_eq!(reported, expected, "{} on '{}'", nonterminal, lookahead);
                }
            }
        }
    }
}

#[test]
fn test_epsilon_production_is_taken_only_on_c() {
    assert_eq!(ANALYSIS.select("B", Symbol::Char('c')), Some(4));
    assert_eq!(ANALYSIS.select("B", Symbol::Char('b')), Some(5));
    for c in ['a', 'd', 'x'] {
        assert_eq!(ANALYSIS.select("B", Symbol::Char(c)), None);
    }
    assert_eq!(ANALYSIS.select("B", Symbol::End), None);

    // Both B productions lead to the same c.
    assert_eq!(recognize("cd"), Ok(()));
    assert_eq!(recognize("bcd"), Ok(()));
}

#[test]
fn test_built_in_grammar_validates_cleanly() {
    let result = validate_grammar();
    assert!(result.is_valid());
    assert!(result.errors.is_empty());
    assert!(result.warnings.is_empty());
}

// ---
// Validators on other grammars
// ---

const CONFLICTING: Grammar = Grammar {
    start: "S",
    productions: &[
        Production {
            lhs: "S",
            rhs: &[N("A"), T('d')],
        },
        Production {
            lhs: "A",
            rhs: &[N("B"), T('c')],
        },
        Production {
            lhs: "A",
            rhs: &[T('c')],
        },
        Production {
            lhs: "B",
            rhs: &[],
        },
        Production {
            lhs: "B",
            rhs: &[T('b')],
        },
    ],
};

#[test]
fn test_conflicting_predict_sets_are_reported() {
    let result = validate(&CONFLICTING);
    assert!(!result.is_valid());
    assert_eq!(
        result.errors,
        vec!["LL(1) conflict in 'A': 'A -> B c' and 'A -> c' are both predicted by c".to_string()]
    );
}

const UNDEFINED: Grammar = Grammar {
    start: "S",
    productions: &[
        Production {
            lhs: "S",
            rhs: &[N("A"), T('d')],
        },
        Production {
            lhs: "A",
            rhs: &[N("C")],
        },
    ],
};

#[test]
fn test_undefined_nonterminal_is_reported() {
    let result = validate(&UNDEFINED);
    assert!(!result.is_valid());
    assert!(result
        .errors
        .contains(&"Production 'A -> C' references undefined nonterminal 'C'".to_string()));
}

const UNREACHABLE: Grammar = Grammar {
    start: "S",
    productions: &[
        Production {
            lhs: "S",
            rhs: &[T('d')],
        },
        Production {
            lhs: "X",
            rhs: &[T('x')],
        },
    ],
};

#[test]
fn test_unreachable_nonterminal_is_a_warning() {
    let result = validate(&UNREACHABLE);
    assert!(result.is_valid());
    assert_eq!(
        result.warnings,
        vec!["Nonterminal 'X' is unreachable from 'S'".to_string()]
    );
}

const MISSING_START: Grammar = Grammar {
    start: "Z",
    productions: &[Production {
        lhs: "S",
        rhs: &[T('d')],
    }],
};

#[test]
fn test_start_symbol_without_productions_is_an_error() {
    let result = validate(&MISSING_START);
    assert!(result
        .errors
        .contains(&"Start symbol 'Z' has no productions".to_string()));
}

#[test]
fn test_nullable_chain_propagates_follow() {
    const CHAIN: Grammar = Grammar {
        start: "S",
        productions: &[
            Production {
                lhs: "S",
                rhs: &[N("X"), N("Y"), T('z')],
            },
            Production {
                lhs: "X",
                rhs: &[],
            },
            Production {
                lhs: "X",
                rhs: &[T('x')],
            },
            Production {
                lhs: "Y",
                rhs: &[],
            },
            Production {
                lhs: "Y",
                rhs: &[T('y')],
            },
        ],
    };
    let analysis = GrammarAnalysis::compute(&CHAIN);
    let follow_x: SymbolSet = ['y', 'z'].into_iter().map(Symbol::Char).collect();
    assert_eq!(analysis.follow_of("X"), Some(&follow_x));
    assert_eq!(analysis.predict[1], follow_x);
    assert!(analysis.check_ll1().is_valid());
}

// ---
// Grammar reports
// ---

#[test]
fn test_grammar_text_report() {
    let mut out = NoColor::new(Vec::new());
    write_grammar_text(&mut out, &ANALYSIS, &validate_grammar()).unwrap();
    let text = String::from_utf8(out.into_inner()).unwrap();

    assert!(text.contains("Grammar (start symbol S)"));
    assert!(text.contains("4: B -> <empty>"));
    assert!(text.contains("predict(B -> <empty>) = { c }"));
    assert!(text.contains(r"FOLLOW={ \0 }"));
    assert!(text.trim_end().ends_with("Grammar is LL(1)"));
}

#[test]
fn test_grammar_text_report_flags_conflicts() {
    let analysis = GrammarAnalysis::compute(&CONFLICTING);
    let mut out = NoColor::new(Vec::new());
    write_grammar_text(&mut out, &analysis, &analysis.check_ll1()).unwrap();
    let text = String::from_utf8(out.into_inner()).unwrap();

    assert!(text.contains("error: LL(1) conflict in 'A'"));
    assert!(text.trim_end().ends_with("Grammar is not LL(1)"));
}

#[test]
fn test_grammar_json_report() {
    let mut out = Vec::new();
    write_grammar_json(&mut out, &ANALYSIS, &validate_grammar()).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

    assert_eq!(json["start"], "S");
    assert_eq!(json["ll1"], true);
    assert_eq!(json["productions"][4], "B -> <empty>");
    assert_eq!(json["analysis"]["follow"]["S"], serde_json::json!([null]));
    assert_eq!(json["analysis"]["predict"][4], serde_json::json!(["c"]));
}
