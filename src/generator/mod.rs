/*
    This module generates sentences
*/

use rand::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::fmt::Display;

use itertools::Itertools;
use log::debug;

use crate::config::Limits;
use crate::error_handling::*;
use crate::grammar::*;

#[derive(Debug, PartialEq)]
pub enum GenerateError {
    // The requested length is outside 1..=max
    InvalidLengthBound { length: usize, max: usize },
    // A nonterminal with no productions was reached
    UndefinedNonterminal(String),
    // A random derivation did not finish within the allowed rewrites
    SampleStepsExceeded(usize),
}

impl ErrorType for GenerateError {}

impl Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateError::InvalidLengthBound { length, max } => write!(f, "Length {} is outside 1..={}", length, max),
            GenerateError::UndefinedNonterminal(nonterminal) => write!(f, "No productions for nonterminal `{}`", nonterminal),
            GenerateError::SampleStepsExceeded(steps) => write!(f, "Sentence still unfinished after {} rewrites", steps),
        }
    }
}

pub type GenResult<T> = Result<T, GenerateError>;

fn terminal_count(alternative: &Alternative) -> usize {
    alternative.iter().filter(|symbol| !symbol.is_nonterminal()).count()
}

// The strings each nonterminal derives at each length, keyed by
// (nonterminal, length). Only the `keep` smallest strings of every entry are
// held: for strings of fixed length the smallest results of a concatenation or
// union only ever come from the smallest strings of its parts
struct Table<'g> {
    grammar: &'g Grammar,
    keep: usize,
    memo: HashMap<(&'g str, usize), BTreeSet<String>>,
}

impl<'g> Table<'g> {
    fn new(grammar: &'g Grammar, keep: usize) -> Self {
        Table { grammar, keep, memo: HashMap::new() }
    }

    fn lookup(&self, nonterminal: &'g str, length: usize) -> Option<&BTreeSet<String>> {
        self.memo.get(&(nonterminal, length))
    }

    fn symbol(&self, symbol: &'g Symbol, length: usize) -> BTreeSet<String> {
        match symbol {
            Symbol::Terminal(t) if t.chars().count() == length => BTreeSet::from([t.clone()]),
            Symbol::Terminal(_) => BTreeSet::new(),
            Symbol::Nonterminal(n) => self.lookup(n, length).cloned().unwrap_or_default(),
        }
    }

    // Tries every way of splitting `length` between the first symbol and the
    // rest of the sequence
    fn sequence(&self, symbols: &'g [Symbol], length: usize) -> BTreeSet<String> {
        let Some((first, rest)) = symbols.split_first() else {
            return if length == 0 { BTreeSet::from([String::new()]) } else { BTreeSet::new() };
        };

        let rest_terminals = rest.iter().filter(|symbol| !symbol.is_nonterminal()).count();
        let mut strings = BTreeSet::new();

        for head_length in 0..=length.saturating_sub(rest_terminals) {
            let heads = self.symbol(first, head_length);
            if heads.is_empty() {
                continue;
            }
            let tails = self.sequence(rest, length - head_length);
            strings.extend(
                heads.iter()
                    .cartesian_product(tails.iter())
                    .map(|(head, tail)| format!("{}{}", head, tail))
            );
        }

        self.truncate(strings)
    }

    fn truncate(&self, strings: BTreeSet<String>) -> BTreeSet<String> {
        if strings.len() <= self.keep {
            strings
        } else {
            strings.into_iter().take(self.keep).collect()
        }
    }

    // Entries of one length can depend on each other through unit and empty
    // productions, so they are recomputed until none of them changes
    fn fill(&mut self, length: usize) {
        let grammar = self.grammar;
        let mut rounds = 0;
        loop {
            rounds += 1;
            let mut changed = false;
            for (name, rewrite) in &grammar.rules {
                let mut found = BTreeSet::new();
                for alternative in rewrite.iter().filter(|a| terminal_count(a) <= length) {
                    found.extend(self.sequence(alternative, length));
                }

                let current = self.memo.entry((name.as_str(), length)).or_default();
                let mut merged = current.clone();
                merged.extend(found);
                let merged = if merged.len() > self.keep {
                    merged.into_iter().take(self.keep).collect()
                } else {
                    merged
                };

                if merged != *current {
                    *current = merged;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        debug!("Length {} settled after {} round(s)", length, rounds);
    }
}

pub fn generate_strings(grammar: &Grammar, length: usize, max_results: usize, limits: &Limits) -> GenResult<Vec<String>> {
    if length < 1 || length > limits.max_generate_length {
        return Err(GenerateError::InvalidLengthBound { length, max: limits.max_generate_length });
    }

    let mut table = Table::new(grammar, max_results);
    for level in 0..=length {
        table.fill(level);
    }

    Ok(table.lookup(&grammar.start_symbol, length)
        .map(|strings| strings.iter().take(max_results).cloned().collect_vec())
        .unwrap_or_default())
}

fn nonterminal_count(alternative: &Alternative) -> usize {
    alternative.iter().filter(|symbol| symbol.is_nonterminal()).count()
}

// Past half the allowed rewrites only the alternatives with the fewest
// nonterminals are picked
pub fn sample(grammar: &Grammar, rng: &mut impl Rng, limits: &Limits) -> GenResult<String> {
    let mut form = vec![grammar.start()];
    let mut steps = 0;

    while let Some(position) = form.iter().position(Symbol::is_nonterminal) {
        if steps >= limits.max_sample_steps {
            return Err(GenerateError::SampleStepsExceeded(steps));
        }

        let rewrite = grammar.alternatives(form[position].text());
        let candidates = if steps < limits.max_sample_steps / 2 {
            rewrite.iter().collect_vec()
        } else {
            rewrite.iter().min_set_by_key(|alternative| nonterminal_count(alternative))
        };

        let alternative = candidates
            .choose(rng)
            .ok_or_else(|| GenerateError::UndefinedNonterminal(form[position].text().to_string()))?;

        form.splice(position..=position, alternative.iter().cloned());
        steps += 1;
    }

    Ok(form.iter().map(Symbol::text).collect())
}
