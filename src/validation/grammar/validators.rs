use std::collections::BTreeSet;

use crate::validation::grammar::{
    Grammar, GrammarAnalysis, GrammarSymbol, ValidationReporter, ValidationResult,
};

/// Validates a grammar for the properties predictive parsing depends on.
/// Each validator focuses on a single concern.
pub struct GrammarValidators;

impl GrammarValidators {
    /// Checks that every referenced nonterminal has at least one production.
    pub fn check_rule_references(grammar: &Grammar, result: &mut ValidationResult) {
        if !grammar.is_defined(grammar.start) {
            result.report_error(format!(
                "Start symbol '{}' has no productions",
                grammar.start
            ));
        }

        for production in grammar.productions {
            for symbol in production.rhs {
                let GrammarSymbol::Nonterminal(name) = symbol else {
                    continue;
                };
                if grammar.is_defined(name) {
                    continue;
                }
                result.report_error(format!(
                    "Production '{}' references undefined nonterminal '{}'",
                    production, name
                ));
            }
        }
    }

    /// Warns about nonterminals that cannot be reached from the start symbol.
    pub fn check_reachability(grammar: &Grammar, result: &mut ValidationResult) {
        let mut reached = BTreeSet::new();
        let mut pending = vec![grammar.start];

        while let Some(name) = pending.pop() {
            if !reached.insert(name) {
                continue;
            }
            for (_, production) in grammar.productions_of(name) {
                for symbol in production.rhs {
                    if let GrammarSymbol::Nonterminal(next) = symbol {
                        pending.push(*next);
                    }
                }
            }
        }

        for name in grammar.nonterminals() {
            if reached.contains(name) {
                continue;
            }
            result.report_warning(format!(
                "Nonterminal '{}' is unreachable from '{}'",
                name, grammar.start
            ));
        }
    }

    /// Checks that no two productions of a nonterminal share a predict symbol.
    pub fn check_predict_disjointness(analysis: &GrammarAnalysis, result: &mut ValidationResult) {
        let grammar = analysis.grammar();

        for name in grammar.nonterminals() {
            let productions: Vec<_> = grammar.productions_of(name).collect();
            for (pos, &(i, left)) in productions.iter().enumerate() {
                for &(j, right) in &productions[pos + 1..] {
                    let overlap: Vec<String> = analysis.predict[i]
                        .intersection(&analysis.predict[j])
                        .map(|s| s.to_string())
                        .collect();
                    if overlap.is_empty() {
                        continue;
                    }
                    result.report_error(format!(
                        "LL(1) conflict in '{}': '{}' and '{}' are both predicted by {}",
                        name,
                        left,
                        right,
                        overlap.join(", ")
                    ));
                }
            }
        }
    }
}
