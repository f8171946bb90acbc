/*
    This module is for storing and inspecting grammars
*/

pub mod symbol;

use std::collections::{BTreeSet, HashMap};
use std::fmt::Display;

// The base unit in a grammar rule
#[derive(Debug, PartialEq, Eq, Hash, Clone, PartialOrd, Ord)]
pub enum Symbol {
    Terminal(String),
    Nonterminal(String),
}

impl Symbol {
    pub fn text(&self) -> &str {
        match self {
            Symbol::Terminal(t) | Symbol::Nonterminal(t) => t,
        }
    }

    pub fn is_nonterminal(&self) -> bool {
        matches!(self, Symbol::Nonterminal(_))
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text())
    }
}

// The symbols in a single alternative. The empty production has no symbols
pub type Alternative = Vec<Symbol>;

// The alternatives of a rewrite rule, in declaration order
pub type Rewrite = Vec<Alternative>;

pub type Rules = HashMap<String, Rewrite>;

#[derive(Debug, PartialEq, Clone)]
pub struct Grammar {
    pub nonterminals: BTreeSet<String>,
    pub terminals: BTreeSet<String>,
    pub start_symbol: String,
    pub rules: Rules,
}

impl Grammar {
    pub fn alternatives(&self, nonterminal: &str) -> &[Alternative] {
        self.rules.get(nonterminal).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn start(&self) -> Symbol {
        Symbol::Nonterminal(self.start_symbol.clone())
    }

    pub fn start_has_empty_alternative(&self) -> bool {
        self.alternatives(&self.start_symbol).iter().any(Vec::is_empty)
    }

    pub fn is_terminal_char(&self, c: char) -> bool {
        let mut buffer = [0; 4];
        self.terminals.contains(&*c.encode_utf8(&mut buffer))
    }
}
