/*
    Breadth-first search over leftmost derivations for context-free grammars
*/

use std::collections::{HashSet, VecDeque};

use itertools::Itertools;
use log::{debug, trace};

use crate::config::Limits;
use crate::grammar::{Alternative, Grammar, Symbol};
use super::derivation::{Derivation, SententialForm};
use super::{Exhaustion, SearchResult};

// What to do with a freshly rewritten sentential form
#[derive(Debug, PartialEq, Eq)]
pub(super) enum Viability {
    Keep,
    // It provably cannot derive the target
    Dead,
    // It grew past the length bound and was dropped unexamined
    TooLong,
}

// The sentential forms a search may keep, given the target it looks for
pub(super) struct Pruner<'g, 't> {
    pub target: &'t [Symbol],
    nullable: HashSet<&'g str>,
    max_length: usize,
}

impl<'g, 't> Pruner<'g, 't> {
    pub fn new(grammar: &'g Grammar, target: &'t [Symbol]) -> Self {
        Pruner {
            target,
            nullable: crate::grammar::symbol::nullable_set(grammar),
            max_length: 2 * target.len(),
        }
    }

    // Terminals never disappear, so the ones left of the first nonterminal
    // must start the target and the ones right of the last must end it. Every
    // nonterminal that cannot vanish adds at least one more terminal
    pub fn check(&self, form: &[Symbol]) -> Viability {
        let target = self.target;
        let first = form.iter().position(Symbol::is_nonterminal);
        let last = form.iter().rposition(Symbol::is_nonterminal);

        let (Some(first), Some(last)) = (first, last) else {
            return if form == target { Viability::Keep } else { Viability::Dead };
        };

        let prefix = &form[..first];
        let suffix = &form[last + 1..];
        if !target.starts_with(prefix) || !target.ends_with(suffix) {
            return Viability::Dead;
        }

        let min_yield = form.iter()
            .filter(|symbol| match symbol {
                Symbol::Terminal(_) => true,
                Symbol::Nonterminal(n) => !self.nullable.contains(n.as_str()),
            })
            .count();
        if min_yield > target.len() {
            return Viability::Dead;
        }

        if form.len() > self.max_length {
            return Viability::TooLong;
        }

        Viability::Keep
    }
}

// Replaces the symbol at `position` with the symbols of `alternative`
pub(super) fn substitute(form: &[Symbol], position: usize, alternative: &Alternative) -> SententialForm {
    let mut successor = Vec::with_capacity(form.len() + alternative.len());
    successor.extend_from_slice(&form[..position]);
    successor.extend_from_slice(alternative);
    successor.extend_from_slice(&form[position + 1..]);
    successor
}

// A queued sentential form and the form it was rewritten from
struct Node {
    form: SententialForm,
    parent: Option<usize>,
}

fn trace_back(nodes: &[Node], mut index: usize) -> Derivation {
    let mut forms = vec![nodes[index].form.clone()];
    while let Some(parent) = nodes[index].parent {
        forms.push(nodes[parent].form.clone());
        index = parent;
    }
    forms.into_iter().rev().collect()
}

// Alternatives starting with the next expected terminal are queued first
pub fn derive(grammar: &Grammar, target: &[Symbol], limits: &Limits) -> SearchResult {
    let pruner = Pruner::new(grammar, target);
    let start = vec![grammar.start()];

    let mut nodes = vec![Node { form: start.clone(), parent: None }];
    let mut queue = VecDeque::from([0]);
    let mut visited = HashSet::from([start]);
    let mut expansions = 0;
    let mut length_pruned = false;

    while let Some(index) = queue.pop_front() {
        let form = nodes[index].form.clone();

        let Some(position) = form.iter().position(Symbol::is_nonterminal) else {
            if form == target {
                debug!("Derived after {} expansion(s)", expansions);
                return Ok(Some(trace_back(&nodes, index)));
            }
            continue;
        };

        if expansions >= limits.max_expansions {
            return Err(Exhaustion::SearchBudget);
        }
        expansions += 1;

        let expected = target.get(position);
        let alternatives = grammar.alternatives(form[position].text())
            .iter()
            .sorted_by_key(|alternative| alternative.first() != expected || expected.is_none());

        for alternative in alternatives {
            let successor = substitute(&form, position, alternative);
            match pruner.check(&successor) {
                Viability::Dead => continue,
                Viability::TooLong => {
                    length_pruned = true;
                    continue;
                }
                Viability::Keep => {}
            }

            if visited.contains(&successor) {
                continue;
            }
            trace!("Queued {:?}", successor);
            visited.insert(successor.clone());
            nodes.push(Node { form: successor, parent: Some(index) });
            queue.push_back(nodes.len() - 1);
        }
    }

    debug!("Search space emptied after {} expansion(s)", expansions);
    if length_pruned {
        Err(Exhaustion::SententialLength)
    } else {
        Ok(None)
    }
}
