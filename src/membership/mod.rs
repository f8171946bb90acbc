/*
    This module decides whether a string belongs to a grammar and shows how
    it is derived
*/

mod backtrack;
mod derivation;
mod regular;
mod search;

use std::fmt::Display;

use log::{debug, info};

use crate::classifier::linearity;
use crate::config::{Config, Strategy};
use crate::error_handling::ErrorType;
use crate::grammar::{Grammar, Symbol};

pub use derivation::{Derivation, DerivationStep, SententialForm};

// The limit a search ran into before it could settle the question
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Exhaustion {
    // The input is longer than any search is allowed to handle
    InputLength,
    // The search expanded as many forms as it may
    SearchBudget,
    // Forms longer than twice the input were dropped along the way
    SententialLength,
    // The backtracking search nested as deep as it may
    RecursionDepth,
}

impl ErrorType for Exhaustion {}

impl Display for Exhaustion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Exhaustion::InputLength => write!(f, "Input is longer than the search allows"),
            Exhaustion::SearchBudget => write!(f, "Search budget exceeded"),
            Exhaustion::SententialLength => write!(f, "Sentential forms outgrew the length bound"),
            Exhaustion::RecursionDepth => write!(f, "Recursion depth exceeded"),
        }
    }
}

// Ok(None) means the search space was covered and holds no derivation
pub type SearchResult = Result<Option<Derivation>, Exhaustion>;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Outcome {
    Derived,
    ProvenAbsent,
    // Reported as a rejection, but the string may still be derivable
    Exhausted(Exhaustion),
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Verdict {
    pub accepted: bool,
    pub derivation: Option<Derivation>,
    pub outcome: Outcome,
}

impl Verdict {
    fn derived(derivation: Derivation) -> Self {
        Verdict { accepted: true, derivation: Some(derivation), outcome: Outcome::Derived }
    }

    fn rejected(outcome: Outcome) -> Self {
        Verdict { accepted: false, derivation: None, outcome }
    }
}

impl From<SearchResult> for Verdict {
    fn from(result: SearchResult) -> Self {
        match result {
            Ok(Some(derivation)) => Verdict::derived(derivation),
            Ok(None) => Verdict::rejected(Outcome::ProvenAbsent),
            Err(exhaustion) => Verdict::rejected(Outcome::Exhausted(exhaustion)),
        }
    }
}

fn decide(grammar: &Grammar, input: &str, config: &Config) -> Verdict {
    if input.is_empty() {
        // Only a direct empty alternative of the start symbol counts here
        return if grammar.start_has_empty_alternative() {
            let mut derivation = Derivation::starting_at(grammar.start());
            derivation.push(Vec::new());
            Verdict::derived(derivation)
        } else {
            Verdict::rejected(Outcome::ProvenAbsent)
        };
    }

    if input.chars().count() > config.limits.max_input_length {
        return Verdict::rejected(Outcome::Exhausted(Exhaustion::InputLength));
    }

    if let Some(c) = input.chars().find(|c| !grammar.is_terminal_char(*c)) {
        debug!("`{}` is not a terminal of the grammar", c);
        return Verdict::rejected(Outcome::ProvenAbsent);
    }

    let target = input.chars().map(|c| Symbol::Terminal(c.to_string())).collect::<Vec<_>>();

    match linearity(&grammar.rules) {
        Some(side) => {
            debug!("Simulating {:?}-linear grammar as an automaton", side);
            Verdict::from(Ok(regular::derive(grammar, &target, side)))
        }
        None => {
            debug!("Searching context-free grammar with {:?}", config.strategy);
            let result = match config.strategy {
                Strategy::BreadthFirst => search::derive(grammar, &target, &config.limits),
                Strategy::Backtracking => backtrack::derive(grammar, &target, &config.limits),
            };
            Verdict::from(result)
        }
    }
}

// A search that runs out of budget rejects, see `Verdict::outcome`
pub fn check_membership(grammar: &Grammar, input: &str, config: &Config) -> Verdict {
    let verdict = decide(grammar, input, config);

    match verdict.outcome {
        Outcome::Derived => info!("`{}` accepted in {} step(s)", input, verdict.derivation.as_ref().map_or(0, Derivation::len)),
        Outcome::ProvenAbsent => info!("`{}` rejected: no derivation exists", input),
        Outcome::Exhausted(exhaustion) => info!("`{}` rejected without proof: {}", input, exhaustion),
    }

    verdict
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::config::Limits;
    use crate::parser::{parse_file, parse_grammar};

    const AB_PLUS: &str = "N = S A\nT = a b\nS = S\nP = { S → a A | b A ; A → a A | b A | ε }";
    const AB_CONCAT: &str = "N = S A B\nT = a b\nS = S\nP = { S → A B ; A → a ; B → b }";

    fn check(text: &str, input: &str) -> Verdict {
        check_membership(&parse_grammar(text).unwrap(), input, &Config::default())
    }

    #[test]
    fn accept_regular_string() {
        let verdict = check(AB_PLUS, "ab");

        assert!(verdict.accepted);
        assert_eq!(verdict.outcome, Outcome::Derived);
        assert_eq!(verdict.derivation.unwrap().rendered(), vec!["*S*", "a*A*", "ab*A*", "ab"]);
    }

    #[test]
    fn empty_input_needs_empty_start() {
        let verdict = check(AB_PLUS, "");
        assert!(!verdict.accepted);
        assert_eq!(verdict.derivation, None);
        assert_eq!(verdict.outcome, Outcome::ProvenAbsent);

        let verdict = check("N = S\nT = a\nS = S\nP = { S → a S | ε }", "");
        assert!(verdict.accepted);
        assert_eq!(verdict.derivation.unwrap().to_string(), "*S* → ε");

        // Nullable through another nonterminal is not enough
        let verdict = check("N = S A\nT = a\nS = S\nP = { S → A ; A → ε }", "");
        assert!(!verdict.accepted);
    }

    #[rstest]
    #[case::concat_accepts(AB_CONCAT, "ab", true)]
    #[case::concat_rejects_order(AB_CONCAT, "ba", false)]
    #[case::concat_rejects_short(AB_CONCAT, "a", false)]
    #[case::plus_accepts_long(AB_PLUS, "abbaab", true)]
    #[case::plus_rejects_foreign(AB_PLUS, "abc", false)]
    #[case::left_linear("N = S\nT = a b\nS = S\nP = { S → S a | b }", "baaa", true)]
    #[case::left_linear_rejects("N = S\nT = a b\nS = S\nP = { S → S a | b }", "abaa", false)]
    #[case::mixed_sides("N = S A\nT = a b\nS = S\nP = { S → a A ; A → S b | b }", "aabb", true)]
    fn membership_cases(#[case] text: &str, #[case] input: &str, #[case] accepted: bool) {
        let verdict = check(text, input);

        assert_eq!(verdict.accepted, accepted);
        assert_eq!(verdict.derivation.is_some(), accepted);
        if let Some(derivation) = verdict.derivation {
            assert_eq!(derivation.steps().first().unwrap().to_string(), "*S*");
            assert_eq!(derivation.steps().last().unwrap().to_string(), input);
        }
    }

    #[rstest]
    #[case(Strategy::BreadthFirst)]
    #[case(Strategy::Backtracking)]
    fn strategies_agree(#[case] strategy: Strategy) {
        let grammar = parse_file(&"example_data/balanced.grammar".into()).unwrap();
        let config = Config { strategy, ..Config::default() };

        for (input, accepted) in [("ab", true), ("aabb", true), ("abab", true), ("abba", false), ("aab", false)] {
            let verdict = check_membership(&grammar, input, &config);
            assert_eq!(verdict.accepted, accepted, "{input}");
        }
    }

    #[test]
    fn membership_is_deterministic() {
        let grammar = parse_file(&"example_data/sum.grammar".into()).unwrap();

        let first = check_membership(&grammar, "1p0p1", &Config::default());
        let second = check_membership(&grammar, "1p0p1", &Config::default());
        assert!(first.accepted);
        assert_eq!(first, second);
    }

    #[test]
    fn reject_without_proof() {
        let grammar = parse_grammar(AB_CONCAT).unwrap();

        let limits = Limits { max_input_length: 1, ..Limits::default() };
        let verdict = check_membership(&grammar, "ab", &Config { limits, ..Config::default() });
        assert!(!verdict.accepted);
        assert_eq!(verdict.outcome, Outcome::Exhausted(Exhaustion::InputLength));

        let limits = Limits { max_expansions: 1, ..Limits::default() };
        let verdict = check_membership(&grammar, "ab", &Config { limits, ..Config::default() });
        assert!(!verdict.accepted);
        assert_eq!(verdict.outcome, Outcome::Exhausted(Exhaustion::SearchBudget));
    }
}
