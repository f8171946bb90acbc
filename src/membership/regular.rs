/*
    Runs a regular grammar as an automaton: every nonterminal is a state and
    every `A → aB` (or `A → Ba`) consumes one input symbol on the way to `B`
*/

use std::collections::HashSet;

use log::trace;

use crate::classifier::Linearity;
use crate::grammar::{Grammar, Symbol};
use super::derivation::{Derivation, SententialForm};

struct Walk<'g, 't> {
    grammar: &'g Grammar,
    target: &'t [Symbol],
    side: Linearity,
    // (state, boundary) pairs already known not to reach acceptance
    dead: HashSet<(&'g str, usize)>,
    derivation: Derivation,
}

impl<'g, 't> Walk<'g, 't> {
    // Right-linear grammars consume the input front to back, so the boundary
    // marks the end of the consumed prefix. Left-linear grammars consume back
    // to front and the boundary marks the start of the consumed suffix
    fn remaining(&self, boundary: usize) -> &'t [Symbol] {
        match self.side {
            Linearity::Right => &self.target[boundary..],
            Linearity::Left => &self.target[..boundary],
        }
    }

    fn form(&self, state: &str, boundary: usize) -> SententialForm {
        let state = Symbol::Nonterminal(state.to_string());
        match self.side {
            Linearity::Right => {
                let mut form = self.target[..boundary].to_vec();
                form.push(state);
                form
            }
            Linearity::Left => {
                let mut form = vec![state];
                form.extend_from_slice(&self.target[boundary..]);
                form
            }
        }
    }

    // Alternatives are tried in declaration order. When the first choice
    // dead-ends the walk falls back to the next one for the same state
    fn accepts_from(&mut self, state: &'g str, boundary: usize) -> bool {
        if self.dead.contains(&(state, boundary)) {
            return false;
        }

        let grammar = self.grammar;
        let remaining = self.remaining(boundary);

        for alternative in grammar.alternatives(state) {
            let next = match (self.side, alternative.as_slice()) {
                (_, []) if remaining.is_empty() => None,
                (_, [a]) if remaining.len() == 1 && remaining[0] == *a => None,
                (Linearity::Right, [a, Symbol::Nonterminal(b)]) if remaining.first() == Some(a) => {
                    Some((b.as_str(), boundary + 1))
                }
                (Linearity::Left, [Symbol::Nonterminal(b), a]) if remaining.last() == Some(a) => {
                    Some((b.as_str(), boundary - 1))
                }
                _ => continue,
            };

            match next {
                None => {
                    // A final production fired exactly as the input ran out
                    self.derivation.push(self.target.to_vec());
                    return true;
                }
                Some((next_state, next_boundary)) => {
                    trace!("{} → {} at {}", state, next_state, next_boundary);
                    let form = self.form(next_state, next_boundary);
                    self.derivation.push(form);
                    if self.accepts_from(next_state, next_boundary) {
                        return true;
                    }
                    self.derivation.pop();
                }
            }
        }

        self.dead.insert((state, boundary));
        false
    }
}

// Each (nonterminal, position) pair is explored at most once
pub fn derive(grammar: &Grammar, target: &[Symbol], side: Linearity) -> Option<Derivation> {
    let mut walk = Walk {
        grammar,
        target,
        side,
        dead: HashSet::new(),
        derivation: Derivation::starting_at(grammar.start()),
    };

    let boundary = match side {
        Linearity::Right => 0,
        Linearity::Left => target.len(),
    };

    if walk.accepts_from(&grammar.start_symbol, boundary) {
        Some(walk.derivation)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_grammar;

    fn target(input: &str) -> Vec<Symbol> {
        input.chars().map(|c| Symbol::Terminal(c.to_string())).collect()
    }

    fn rendered(grammar: &Grammar, input: &str, side: Linearity) -> Option<String> {
        derive(grammar, &target(input), side).map(|d| d.to_string())
    }

    #[test]
    fn right_linear_walk() {
        let grammar = parse_grammar("N = S A\nT = a b\nS = S\nP = { S → a A | b A ; A → a A | b A | ε }").unwrap();

        assert_eq!(rendered(&grammar, "ab", Linearity::Right), Some("*S* → a*A* → ab*A* → ab".to_string()));
        assert_eq!(rendered(&grammar, "b", Linearity::Right), Some("*S* → b*A* → b".to_string()));
        assert_eq!(rendered(&grammar, "abc", Linearity::Right), None);
    }

    #[test]
    fn right_linear_final_terminal() {
        let grammar = parse_grammar("N = A\nT = a\nS = A\nP = { A → a | a A }").unwrap();

        assert_eq!(rendered(&grammar, "a", Linearity::Right), Some("*A* → a".to_string()));
        assert_eq!(rendered(&grammar, "aaa", Linearity::Right), Some("*A* → a*A* → aa*A* → aaa".to_string()));
    }

    #[test]
    fn right_linear_falls_back() {
        // The first choice for `a` leads to B, which can only finish on `c`
        let grammar = parse_grammar("N = S B C\nT = a b c\nS = S\nP = { S → a B | a C ; B → c ; C → b }").unwrap();

        assert_eq!(rendered(&grammar, "ab", Linearity::Right), Some("*S* → a*C* → ab".to_string()));
        assert_eq!(rendered(&grammar, "ac", Linearity::Right), Some("*S* → a*B* → ac".to_string()));
        assert_eq!(rendered(&grammar, "aa", Linearity::Right), None);
    }

    #[test]
    fn left_linear_walk() {
        let grammar = parse_grammar("N = S\nT = a b\nS = S\nP = { S → S a | b }").unwrap();

        assert_eq!(rendered(&grammar, "baa", Linearity::Left), Some("*S* → *S*a → *S*aa → baa".to_string()));
        assert_eq!(rendered(&grammar, "b", Linearity::Left), Some("*S* → b".to_string()));
        assert_eq!(rendered(&grammar, "aab", Linearity::Left), None);
    }

    #[test]
    fn left_linear_falls_back() {
        let grammar = parse_grammar("N = S A B\nT = a b\nS = S\nP = { S → A a | B a ; A → a ; B → b }").unwrap();

        assert_eq!(rendered(&grammar, "ba", Linearity::Left), Some("*S* → *B*a → ba".to_string()));
        assert_eq!(rendered(&grammar, "aa", Linearity::Left), Some("*S* → *A*a → aa".to_string()));
    }
}
