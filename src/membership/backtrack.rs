/*
    Depth-first search over leftmost derivations. It finds the same
    strings as the breadth-first search but gives no shortest-first ordering
    and needs a depth bound to get out of left recursion
*/

use std::iter;

use log::debug;

use crate::config::Limits;
use crate::grammar::{Grammar, Symbol};
use super::derivation::{Derivation, SententialForm};
use super::search::{substitute, Pruner, Viability};
use super::{Exhaustion, SearchResult};

// A form on the current path and the next alternative to try for its
// leftmost nonterminal
struct Frame {
    form: SententialForm,
    position: usize,
    next: usize,
}

struct Backtracker<'g, 't, 'l> {
    grammar: &'g Grammar,
    pruner: Pruner<'g, 't>,
    limits: &'l Limits,
    expansions: usize,
    length_pruned: bool,
    // The path from the start symbol, deepest form last
    frames: Vec<Frame>,
}

impl<'g, 't, 'l> Backtracker<'g, 't, 'l> {
    // Some(found) when the form has no nonterminal left, None once a frame was
    // pushed for it
    fn enter(&mut self, form: SententialForm, depth: usize) -> Result<Option<bool>, Exhaustion> {
        if depth > self.limits.max_recursion_depth {
            return Err(Exhaustion::RecursionDepth);
        }

        let Some(position) = form.iter().position(Symbol::is_nonterminal) else {
            return Ok(Some(form == self.pruner.target));
        };

        if self.expansions >= self.limits.max_expansions {
            return Err(Exhaustion::SearchBudget);
        }
        self.expansions += 1;

        self.frames.push(Frame { form, position, next: 0 });
        Ok(None)
    }

    // The path is kept on the heap, so deep limits never grow the call stack
    fn search(&mut self, start: SententialForm) -> Result<Option<Derivation>, Exhaustion> {
        if let Some(found) = self.enter(start.clone(), 0)? {
            return Ok(found.then(|| iter::once(start).collect()));
        }

        let grammar = self.grammar;
        while let Some(frame) = self.frames.last_mut() {
            let alternatives = grammar.alternatives(frame.form[frame.position].text());
            let Some(alternative) = alternatives.get(frame.next) else {
                self.frames.pop();
                continue;
            };
            frame.next += 1;

            let successor = substitute(&frame.form, frame.position, alternative);
            match self.pruner.check(&successor) {
                Viability::Dead => continue,
                Viability::TooLong => {
                    self.length_pruned = true;
                    continue;
                }
                Viability::Keep => {}
            }

            let depth = self.frames.len();
            if let Some(true) = self.enter(successor.clone(), depth)? {
                let forms = self.frames.iter().map(|frame| frame.form.clone());
                return Ok(Some(forms.chain(iter::once(successor)).collect()));
            }
        }

        Ok(None)
    }
}

// Depth first over leftmost derivations, alternatives in declaration order
pub fn derive(grammar: &Grammar, target: &[Symbol], limits: &Limits) -> SearchResult {
    let mut backtracker = Backtracker {
        grammar,
        pruner: Pruner::new(grammar, target),
        limits,
        expansions: 0,
        length_pruned: false,
        frames: Vec::new(),
    };

    let found = backtracker.search(vec![grammar.start()])?;
    debug!("Backtracking stopped after {} expansion(s)", backtracker.expansions);

    match (found, backtracker.length_pruned) {
        (Some(derivation), _) => Ok(Some(derivation)),
        (None, true) => Err(Exhaustion::SententialLength),
        (None, false) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_grammar;

    fn target(input: &str) -> Vec<Symbol> {
        input.chars().map(|c| Symbol::Terminal(c.to_string())).collect()
    }

    fn run(grammar: &Grammar, input: &str, limits: &Limits) -> std::result::Result<Option<String>, Exhaustion> {
        derive(grammar, &target(input), limits).map(|d| d.map(|d| d.to_string()))
    }

    #[test]
    fn backtrack_into_later_alternative() {
        let grammar = parse_grammar("N = S A B\nT = a b\nS = S\nP = { S → A B ; A → a | a a ; B → b }").unwrap();

        assert_eq!(
            run(&grammar, "aab", &Limits::default()),
            Ok(Some("*S* → *A**B* → aa*B* → aab".to_string()))
        );
        assert_eq!(run(&grammar, "b", &Limits::default()), Ok(None));
    }

    #[test]
    fn backtrack_matches_breadth_first() {
        let grammar = parse_grammar("N = S\nT = a b\nS = S\nP = { S → a S b S | ε }").unwrap();

        for input in ["ab", "aabb", "abab", "aababb"] {
            let found = derive(&grammar, &target(input), &Limits::default()).unwrap();
            let derivation = found.unwrap();
            assert_eq!(derivation.steps().last().unwrap().to_string(), input);
        }
        assert_eq!(run(&grammar, "ba", &Limits::default()), Ok(None));
    }

    #[test]
    fn backtrack_depth_bound() {
        // Unit cycles never grow the form, so only the depth bound stops them
        let grammar = parse_grammar("N = S A\nT = a\nS = S\nP = { S → A ; A → S | a a }").unwrap();
        let limits = Limits { max_recursion_depth: 20, ..Limits::default() };

        assert_eq!(run(&grammar, "a", &limits), Err(Exhaustion::RecursionDepth));
    }

    #[test]
    fn backtrack_expansion_budget() {
        let grammar = parse_grammar("N = S A\nT = a\nS = S\nP = { S → A ; A → S | a a }").unwrap();
        let limits = Limits { max_expansions: 10, ..Limits::default() };

        assert_eq!(run(&grammar, "a", &limits), Err(Exhaustion::SearchBudget));
    }

    #[test]
    fn backtrack_deep_limits() {
        // A path this long would overflow the call stack if each step recursed
        let grammar = parse_grammar("N = S A\nT = a\nS = S\nP = { S → A ; A → S | a a }").unwrap();
        let limits = Limits { max_recursion_depth: 200_000, max_expansions: 300_000, ..Limits::default() };
        assert_eq!(run(&grammar, "a", &limits), Err(Exhaustion::RecursionDepth));

        let limits = Limits { max_recursion_depth: 200_000, max_expansions: 200_000, ..Limits::default() };
        assert_eq!(run(&grammar, "a", &limits), Err(Exhaustion::SearchBudget));
    }
}
