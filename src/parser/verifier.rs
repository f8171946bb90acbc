use log::warn;

use crate::grammar::Grammar;
use super::Malformation::{OverlappingSymbol, UndeclaredStart};
use super::{malformed, Declarations, Document, Location, ParseErrors};

fn get_overlapping_symbols(declarations: &Declarations, location: &Location) -> ParseErrors {
    // Anything declared on both sides makes the two sets no longer disjoint
    declarations.terminals.intersection(&declarations.nonterminals)
        .map(|symbol| malformed(OverlappingSymbol(symbol.to_owned()), location.to_owned()))
        .collect()
}

fn get_undeclared_start(declarations: &Declarations, location: &Location) -> ParseErrors {
    if declarations.nonterminals.contains(&declarations.start_symbol) {
        Vec::new()
    } else {
        vec![malformed(UndeclaredStart(declarations.start_symbol.to_owned()), location.to_owned())]
    }
}

fn line_of(declared: Option<(&str, usize)>) -> Location {
    declared.map_or_else(Location::whole, |(_, line)| Location::line(line))
}

pub fn verify_declarations(declarations: &Declarations, document: &Document) -> ParseErrors {
    let mut errors = Vec::new();

    errors.extend(get_overlapping_symbols(declarations, &line_of(document.terminals)));
    errors.extend(get_undeclared_start(declarations, &line_of(document.start)));

    errors
}

// Nonterminals without productions are legal, but nothing can be derived
// through them
pub fn warn_undefined_nonterminals(grammar: &Grammar) {
    grammar.nonterminals.iter()
        .filter(|nonterminal| !grammar.rules.contains_key(*nonterminal))
        .for_each(|nonterminal| warn!("Nonterminal `{}` has no productions", nonterminal));
}
