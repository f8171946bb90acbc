/*
    Predicates that tell symbol spellings apart
*/

use std::collections::{HashMap, HashSet};

use super::{Grammar, Symbol};

// Every spelling accepted for the empty string
pub const EMPTY_SPELLINGS: [&str; 4] = ["ε", "epsilon", "λ", ""];

// How the empty string is shown in derivations
pub const EMPTY_MARKER: &str = "ε";

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

pub fn is_empty(s: &str) -> bool {
    EMPTY_SPELLINGS.contains(&s)
}

pub fn is_non_terminal(s: &str) -> bool {
    !is_empty(s) && single_char(s).is_some_and(char::is_uppercase)
}

pub fn is_terminal(s: &str) -> bool {
    !is_empty(s) && single_char(s).is_some_and(|c| c.is_lowercase() || c.is_ascii_digit())
}

// Cycles met while still being explored count as not nullable on that path
pub fn can_derive_empty(symbol: &Symbol, grammar: &Grammar) -> bool {
    let mut memo = HashMap::new();
    let mut visiting = HashSet::new();
    derives_empty(symbol, grammar, &mut memo, &mut visiting).0
}

// Returns (nullable, whether the answer leaned on a cut cycle). Answers that
// leaned on a cut cycle may be too pessimistic and are not remembered
fn derives_empty<'g>(
    symbol: &'g Symbol,
    grammar: &'g Grammar,
    memo: &mut HashMap<&'g str, bool>,
    visiting: &mut HashSet<&'g str>,
) -> (bool, bool) {
    let name = match symbol {
        Symbol::Terminal(_) => return (false, false),
        Symbol::Nonterminal(name) => name.as_str(),
    };

    if let Some(&known) = memo.get(name) {
        return (known, false);
    }
    if !visiting.insert(name) {
        return (false, true);
    }

    let mut cut = false;
    let mut nullable = false;
    for alternative in grammar.alternatives(name) {
        let mut all_nullable = true;
        for part in alternative {
            let (part_nullable, part_cut) = derives_empty(part, grammar, memo, visiting);
            cut |= part_cut;
            if !part_nullable {
                all_nullable = false;
                break;
            }
        }
        if all_nullable {
            nullable = true;
            break;
        }
    }

    visiting.remove(name);
    if nullable || !cut {
        memo.insert(name, nullable);
    }
    (nullable, cut && !nullable)
}

pub fn nullable_set(grammar: &Grammar) -> HashSet<&str> {
    let mut nullable = HashSet::new();
    loop {
        let before = nullable.len();
        for (name, rewrite) in &grammar.rules {
            if nullable.contains(name.as_str()) {
                continue;
            }
            let derives = rewrite.iter().any(|alternative| {
                alternative.iter().all(|s| match s {
                    Symbol::Terminal(_) => false,
                    Symbol::Nonterminal(n) => nullable.contains(n.as_str()),
                })
            });
            if derives {
                nullable.insert(name.as_str());
            }
        }
        if nullable.len() == before {
            return nullable;
        }
    }
}
