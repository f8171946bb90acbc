/*
    This module places grammars in the Chomsky hierarchy
*/

use std::fmt::Display;

use crate::grammar::symbol::{is_non_terminal, is_terminal};
use crate::grammar::*;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum GrammarType {
    Type3Regular,
    Type2ContextFree,
    Neither,
}

impl Display for GrammarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrammarType::Type3Regular => write!(f, "Type 3 (Regular)"),
            GrammarType::Type2ContextFree => write!(f, "Type 2 (Context-free)"),
            GrammarType::Neither => write!(f, "Neither Type 2 nor Type 3"),
        }
    }
}

// Which side of a two-symbol alternative the nonterminal sits on
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Linearity {
    // A → aB
    Right,
    // A → Ba
    Left,
}

fn is_terminal_symbol(symbol: &Symbol) -> bool {
    matches!(symbol, Symbol::Terminal(t) if is_terminal(t))
}

fn is_nonterminal_symbol(symbol: &Symbol) -> bool {
    matches!(symbol, Symbol::Nonterminal(n) if is_non_terminal(n))
}

// A → a and A → ε fit either side
fn is_final(alternative: &Alternative) -> bool {
    match alternative.as_slice() {
        [] => true,
        [a] => is_terminal_symbol(a),
        _ => false,
    }
}

pub fn is_right_linear(alternative: &Alternative) -> bool {
    match alternative.as_slice() {
        [a, b] => is_terminal_symbol(a) && is_nonterminal_symbol(b),
        _ => is_final(alternative),
    }
}

pub fn is_left_linear(alternative: &Alternative) -> bool {
    match alternative.as_slice() {
        [a, b] => is_nonterminal_symbol(a) && is_terminal_symbol(b),
        _ => is_final(alternative),
    }
}

// Mixed sides are never regular here, even when an equivalent one-sided
// grammar exists
pub fn linearity(rules: &Rules) -> Option<Linearity> {
    let mut right = true;
    let mut left = true;

    for (lhs, rewrite) in rules {
        if !is_non_terminal(lhs) {
            return None;
        }
        for alternative in rewrite {
            right &= is_right_linear(alternative);
            left &= is_left_linear(alternative);
            if !right && !left {
                return None;
            }
        }
    }

    if right {
        Some(Linearity::Right)
    } else {
        Some(Linearity::Left)
    }
}

pub fn is_type_3(rules: &Rules) -> bool {
    linearity(rules).is_some()
}

// Only the shape of the symbols is checked, there is no further analysis
pub fn is_type_2(rules: &Rules) -> bool {
    rules.iter().all(|(lhs, rewrite)| {
        is_non_terminal(lhs) && rewrite.iter().flatten().all(|symbol| {
            is_terminal_symbol(symbol) || is_nonterminal_symbol(symbol)
        })
    })
}

pub fn classify(rules: &Rules) -> GrammarType {
    if is_type_3(rules) {
        GrammarType::Type3Regular
    } else if is_type_2(rules) {
        GrammarType::Type2ContextFree
    } else {
        GrammarType::Neither
    }
}
