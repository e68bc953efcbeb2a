//! Static description of the recognized grammar and its LL(1) analysis.
//!
//! The hand-written procedures in `syntax::parser` pick productions from one
//! symbol of lookahead. That is only sound while the predict sets of each
//! nonterminal's productions are pairwise disjoint; this module computes those
//! sets from the grammar below and reports any conflict.

pub mod validators;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::syntax::Symbol;

// =====================
// Core Data Structures
// =====================

/// A symbol on the right-hand side of a production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum GrammarSymbol {
    Terminal(char),
    Nonterminal(&'static str),
}

impl fmt::Display for GrammarSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarSymbol::Terminal(c) => write!(f, "{}", c),
            GrammarSymbol::Nonterminal(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Production {
    pub lhs: &'static str,
    pub rhs: &'static [GrammarSymbol],
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.lhs)?;
        if self.rhs.is_empty() {
            return f.write_str(" <empty>");
        }
        for symbol in self.rhs {
            write!(f, " {}", symbol)?;
        }
        Ok(())
    }
}

/// A context-free grammar fixed at compile time.
///
/// The start symbol is implicitly augmented with the end marker, so
/// `FOLLOW(start)` always contains `Symbol::End`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Grammar {
    pub start: &'static str,
    pub productions: &'static [Production],
}

use GrammarSymbol::{Nonterminal as N, Terminal as T};

/// `S -> A S | d`, `A -> B c | a A`, `B -> <empty> | b`
pub const GRAMMAR: Grammar = Grammar {
    start: "S",
    productions: &[
        Production {
            lhs: "S",
            rhs: &[N("A"), N("S")],
        },
        Production {
            lhs: "S",
            rhs: &[T('d')],
        },
        Production {
            lhs: "A",
            rhs: &[N("B"), T('c')],
        },
        Production {
            lhs: "A",
            rhs: &[T('a'), N("A")],
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

impl Grammar {
    /// Nonterminals in order of first definition.
    pub fn nonterminals(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        for production in self.productions {
            if !names.contains(&production.lhs) {
                names.push(production.lhs);
            }
        }
        names
    }

    pub fn productions_of(
        &self,
        nonterminal: &str,
    ) -> impl Iterator<Item = (usize, &'static Production)> + '_ {
        let name = nonterminal.to_string();
        self.productions
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.lhs == name)
    }

    pub fn is_defined(&self, nonterminal: &str) -> bool {
        self.productions.iter().any(|p| p.lhs == nonterminal)
    }
}

// =====================
// Validation Results
// =====================

#[derive(Debug, Default, Serialize)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

pub trait ValidationReporter {
    fn report_error(&mut self, message: impl Into<String>);
    fn report_warning(&mut self, message: impl Into<String>);
}

impl ValidationReporter for ValidationResult {
    fn report_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }
    fn report_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

// =====================
// Analysis
// =====================

pub type SymbolSet = BTreeSet<Symbol>;

/// One row of the LL(1) parse table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictEntry {
    pub nonterminal: &'static str,
    pub lookahead: Symbol,
    /// Index into `Grammar::productions`.
    pub production: usize,
}

/// Nullable, FIRST, FOLLOW and predict sets of a grammar.
#[derive(Debug, Clone, Serialize)]
pub struct GrammarAnalysis {
    #[serde(skip)]
    grammar: Grammar,
    pub nullable: BTreeSet<&'static str>,
    pub first: BTreeMap<&'static str, SymbolSet>,
    pub follow: BTreeMap<&'static str, SymbolSet>,
    /// Predict set of each production, indexed like `Grammar::productions`.
    pub predict: Vec<SymbolSet>,
}

impl GrammarAnalysis {
    /// Computes all sets by fixpoint iteration.
    pub fn compute(grammar: &Grammar) -> Self {
        let nonterminals = grammar.nonterminals();
        let nullable = compute_nullable(grammar);
        let first = compute_first(grammar, &nonterminals, &nullable);
        let follow = compute_follow(grammar, &nonterminals, &nullable, &first);

        let predict = grammar
            .productions
            .iter()
            .map(|p| {
                let (mut set, rhs_nullable) = first_of_sequence(p.rhs, &nullable, &first);
                if rhs_nullable {
                    if let Some(follow_set) = follow.get(p.lhs) {
                        set.extend(follow_set.iter().copied());
                    }
                }
                set
            })
            .collect();

        Self {
            grammar: *grammar,
            nullable,
            first,
            follow,
            predict,
        }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn is_nullable(&self, nonterminal: &str) -> bool {
        self.nullable.contains(nonterminal)
    }

    pub fn first_of(&self, nonterminal: &str) -> Option<&SymbolSet> {
        self.first.get(nonterminal)
    }

    pub fn follow_of(&self, nonterminal: &str) -> Option<&SymbolSet> {
        self.follow.get(nonterminal)
    }

    /// Union of the predict sets of every production of `nonterminal`: the
    /// lookaheads on which its procedure does not fail.
    pub fn expected_for(&self, nonterminal: &str) -> SymbolSet {
        self.grammar
            .productions_of(nonterminal)
            .flat_map(|(i, _)| self.predict[i].iter().copied())
            .collect()
    }

    /// The production selected for `nonterminal` on `lookahead`, if any.
    ///
    /// With conflicts present the first matching production wins.
    pub fn select(&self, nonterminal: &str, lookahead: Symbol) -> Option<usize> {
        self.grammar
            .productions_of(nonterminal)
            .map(|(i, _)| i)
            .find(|&i| self.predict[i].contains(&lookahead))
    }

    /// Every `(nonterminal, lookahead) -> production` cell of the parse table.
    pub fn predict_table(&self) -> Vec<PredictEntry> {
        self.grammar
            .productions
            .iter()
            .enumerate()
            .flat_map(|(i, p)| {
                self.predict[i].iter().map(move |&lookahead| PredictEntry {
                    nonterminal: p.lhs,
                    lookahead,
                    production: i,
                })
            })
            .collect()
    }

    /// Runs every structural check and the LL(1) disjointness check.
    pub fn check_ll1(&self) -> ValidationResult {
        use validators::GrammarValidators;

        let mut result = ValidationResult::new();
        GrammarValidators::check_rule_references(&self.grammar, &mut result);
        GrammarValidators::check_reachability(&self.grammar, &mut result);
        GrammarValidators::check_predict_disjointness(self, &mut result);
        result
    }
}

fn compute_nullable(grammar: &Grammar) -> BTreeSet<&'static str> {
    let mut nullable = BTreeSet::new();
    let mut changed = true;
    while changed {
        changed = false;
        for p in grammar.productions {
            if nullable.contains(p.lhs) {
                continue;
            }
            let all_nullable = p.rhs.iter().all(|s| match s {
                GrammarSymbol::Terminal(_) => false,
                GrammarSymbol::Nonterminal(n) => nullable.contains(n),
            });
            if all_nullable {
                nullable.insert(p.lhs);
                changed = true;
            }
        }
    }
    nullable
}

fn compute_first(
    grammar: &Grammar,
    nonterminals: &[&'static str],
    nullable: &BTreeSet<&'static str>,
) -> BTreeMap<&'static str, SymbolSet> {
    let mut first: BTreeMap<&'static str, SymbolSet> =
        nonterminals.iter().map(|&n| (n, SymbolSet::new())).collect();
    let mut changed = true;
    while changed {
        changed = false;
        for p in grammar.productions {
            let (set, _) = first_of_sequence(p.rhs, nullable, &first);
            let entry = first.entry(p.lhs).or_default();
            let before = entry.len();
            entry.extend(set);
            changed |= entry.len() != before;
        }
    }
    first
}

fn compute_follow(
    grammar: &Grammar,
    nonterminals: &[&'static str],
    nullable: &BTreeSet<&'static str>,
    first: &BTreeMap<&'static str, SymbolSet>,
) -> BTreeMap<&'static str, SymbolSet> {
    let mut follow: BTreeMap<&'static str, SymbolSet> =
        nonterminals.iter().map(|&n| (n, SymbolSet::new())).collect();
    follow.entry(grammar.start).or_default().insert(Symbol::End);

    let mut changed = true;
    while changed {
        changed = false;
        for p in grammar.productions {
            for (i, symbol) in p.rhs.iter().enumerate() {
                let GrammarSymbol::Nonterminal(name) = *symbol else {
                    continue;
                };
                let rest = &p.rhs[i + 1..];
                let (mut set, rest_nullable) = first_of_sequence(rest, nullable, first);
                if rest_nullable {
                    set.extend(follow.get(p.lhs).cloned().unwrap_or_default());
                }
                let entry = follow.entry(name).or_default();
                let before = entry.len();
                entry.extend(set);
                changed |= entry.len() != before;
            }
        }
    }
    follow
}

/// FIRST of a symbol sequence, plus whether the whole sequence can derive
/// the empty string.
fn first_of_sequence(
    symbols: &[GrammarSymbol],
    nullable: &BTreeSet<&'static str>,
    first: &BTreeMap<&'static str, SymbolSet>,
) -> (SymbolSet, bool) {
    let mut set = SymbolSet::new();
    for symbol in symbols {
        match symbol {
            GrammarSymbol::Terminal(c) => {
                set.insert(Symbol::Char(*c));
                return (set, false);
            }
            GrammarSymbol::Nonterminal(name) => {
                if let Some(f) = first.get(name) {
                    set.extend(f.iter().copied());
                }
                if !nullable.contains(name) {
                    return (set, false);
                }
            }
        }
    }
    (set, true)
}

// =====================
// Public API
// =====================

/// Analysis of the built-in grammar, computed on first use.
pub static ANALYSIS: Lazy<GrammarAnalysis> = Lazy::new(|| GrammarAnalysis::compute(&GRAMMAR));

/// Validates the built-in grammar.
pub fn validate_grammar() -> ValidationResult {
    ANALYSIS.check_ll1()
}

/// Validates an arbitrary grammar; used to exercise the checks themselves.
pub fn validate(grammar: &Grammar) -> ValidationResult {
    GrammarAnalysis::compute(grammar).check_ll1()
}
