/*
    This module parses grammar definitions written as N, T, S and P sections
*/

mod lexer;
mod verifier;

use std::collections::BTreeSet;
use std::fmt::Display;
use std::path::PathBuf;

use crate::grammar::*;
use crate::error_handling::*;
use itertools::Itertools;
use lexer::*;
use log::{debug, warn};
use verifier::verify_declarations;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Section {
    Nonterminals,
    Terminals,
    Start,
    Productions,
}

impl Section {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "N" => Some(Section::Nonterminals),
            "T" => Some(Section::Terminals),
            "S" => Some(Section::Start),
            "P" => Some(Section::Productions),
            _ => None,
        }
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Section::Nonterminals => write!(f, "N"),
            Section::Terminals => write!(f, "T"),
            Section::Start => write!(f, "S"),
            Section::Productions => write!(f, "P"),
        }
    }
}

// Ways the layout of a grammar can be wrong
#[derive(Debug, PartialEq, Clone)]
pub enum Malformation {
    // One of N, T or S was never given
    MissingSection(Section),
    // A section was given twice
    DuplicateSection(Section),
    // The start section has no symbol
    EmptySection(Section),
    // `P =` is not followed by `{`
    MissingBrace,
    // The production block is never closed with `}`
    UnterminatedProductions,
    // A production has no `→`
    MissingArrow,
    // A production has nothing before its `→`
    MissingLeftHandSide,
    // A line outside the production block that is not a section
    UnexpectedLine(String),
    // The start symbol is not a declared nonterminal
    UndeclaredStart(String),
    // A symbol is declared as both a terminal and a nonterminal
    OverlappingSymbol(String),
}

impl Display for Malformation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Malformation::MissingSection(section) => write!(f, "Missing `{} =` section", section),
            Malformation::DuplicateSection(section) => write!(f, "Section `{}` given more than once", section),
            Malformation::EmptySection(section) => write!(f, "Section `{}` is empty", section),
            Malformation::MissingBrace => write!(f, "Expected `{{` after `P =`"),
            Malformation::UnterminatedProductions => write!(f, "Production block is never closed with `}}`"),
            Malformation::MissingArrow => write!(f, "Expected `→` in production"),
            Malformation::MissingLeftHandSide => write!(f, "Production has no left-hand side"),
            Malformation::UnexpectedLine(line) => write!(f, "Unexpected line `{}`", line),
            Malformation::UndeclaredStart(start) => write!(f, "Start symbol `{}` is not in N", start),
            Malformation::OverlappingSymbol(symbol) => write!(f, "`{}` is declared in both N and T", symbol),
        }
    }
}

#[derive(Debug)]
pub enum ParseErrorType {
    // The grammar text does not have the expected layout
    MalformedGrammar(Malformation),
    // A production is given for something that is not in N
    UndeclaredLeftHandSide(String),
    // A production uses a symbol that is in neither N nor T
    UnknownSymbol(String),
    // There was an issue with reading a file
    FileError(std::io::Error),
}

impl ErrorType for ParseErrorType {}

impl PartialEq for ParseErrorType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ParseErrorType::FileError(a), ParseErrorType::FileError(b)) => a.kind() == b.kind(),
            (ParseErrorType::MalformedGrammar(a), ParseErrorType::MalformedGrammar(b)) => a == b,
            (ParseErrorType::UndeclaredLeftHandSide(a), ParseErrorType::UndeclaredLeftHandSide(b)) => a == b,
            (ParseErrorType::UnknownSymbol(a), ParseErrorType::UnknownSymbol(b)) => a == b,
            _ => false,
        }
    }
}

impl Display for ParseErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseErrorType::MalformedGrammar(malformation) => write!(f, "Malformed grammar: {}", malformation),
            ParseErrorType::UndeclaredLeftHandSide(lhs) => write!(f, "Left-hand side `{}` is not in N", lhs),
            ParseErrorType::UnknownSymbol(symbol) => write!(f, "Symbol `{}` is in neither N nor T", symbol),
            ParseErrorType::FileError(e) => write!(f, "File error: {}", e),
        }
    }
}

pub type ParseError = Error<ParseErrorType>;
pub type ParseErrors = Errors<ParseErrorType>;

pub type Result<T> = std::result::Result<T, ParseErrorType>;
pub type LineResult<T> = std::result::Result<T, ParseError>;
pub type FileResult<T> = std::result::Result<T, ParseErrors>;

fn malformed(malformation: Malformation, location: Location) -> ParseError {
    ParseError {
        location,
        error: ParseErrorType::MalformedGrammar(malformation)
    }
}

#[derive(PartialEq, Debug)]
struct Rule {
    symbol: String,
    rewrite: Rewrite,
    location: Location
}

// A section's value together with the line it was found on
type Declared<'a> = Option<(&'a str, usize)>;

// The raw pieces of a grammar text, before any symbol is checked
#[derive(Default, Debug)]
struct Document<'a> {
    nonterminals: Declared<'a>,
    terminals: Declared<'a>,
    start: Declared<'a>,
    // The line the production block opens on
    productions: Option<usize>,
    // Production entries, one per line or `;`
    entries: Vec<(&'a str, usize)>
}

// The declared symbol sets that productions are checked against
#[derive(Debug)]
pub struct Declarations {
    pub nonterminals: BTreeSet<String>,
    pub terminals: BTreeSet<String>,
    pub start_symbol: String,
}

fn push_entries<'a>(body: &'a str, line: usize, entries: &mut Vec<(&'a str, usize)>) {
    entries.extend(
        body.split(';')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| (entry, line))
    );
}

// Splits the text into its sections and production entries
fn split_document(text: &str) -> (Document<'_>, ParseErrors) {
    let mut document = Document::default();
    let mut errors = Vec::new();
    let mut in_block = false;

    let lines = text.lines()
        .enumerate()
        .map(|(num, line)| (num + 1, strip_comment(line).trim()))
        .filter(|(_, line)| !line.is_empty());

    for (num, line) in lines {
        let body = if in_block {
            line
        } else {
            match lex_header(line) {
                None => {
                    errors.push(malformed(Malformation::UnexpectedLine(line.to_string()), Location::line(num)));
                    continue;
                }
                Some(Header { section: Section::Productions, value }) => {
                    let Some(rest) = value.strip_prefix('{') else {
                        errors.push(malformed(Malformation::MissingBrace, Location::line(num)));
                        continue;
                    };
                    if document.productions.is_some() {
                        errors.push(malformed(Malformation::DuplicateSection(Section::Productions), Location::line(num)));
                    }
                    document.productions = Some(num);
                    in_block = true;
                    rest
                }
                Some(Header { section, value }) => {
                    let slot = match section {
                        Section::Nonterminals => &mut document.nonterminals,
                        Section::Terminals => &mut document.terminals,
                        Section::Start | Section::Productions => &mut document.start,
                    };
                    if slot.is_some() {
                        errors.push(malformed(Malformation::DuplicateSection(section), Location::line(num)));
                    } else {
                        *slot = Some((value, num));
                    }
                    continue;
                }
            }
        };

        match body.split_once('}') {
            Some((inside, after)) => {
                push_entries(inside, num, &mut document.entries);
                in_block = false;
                if !after.trim().is_empty() {
                    errors.push(malformed(Malformation::UnexpectedLine(after.trim().to_string()), Location::line(num)));
                }
            }
            None => push_entries(body, num, &mut document.entries),
        }
    }

    if let (true, Some(num)) = (in_block, document.productions) {
        errors.push(malformed(Malformation::UnterminatedProductions, Location::line(num)));
    }

    (document, errors)
}

fn split_symbols(value: &str) -> BTreeSet<String> {
    value.split_whitespace().map(str::to_string).collect()
}

fn declarations_from(document: &Document) -> FileResult<Declarations> {
    let sections = [
        (document.nonterminals, Section::Nonterminals),
        (document.terminals, Section::Terminals),
        (document.start, Section::Start),
    ];
    let errors = sections.iter()
        .filter(|(declared, _)| declared.is_none())
        .map(|(_, section)| malformed(Malformation::MissingSection(*section), Location::whole()))
        .collect_vec();

    let (Some((nonterminals, _)), Some((terminals, _)), Some((start, start_line))) =
        (document.nonterminals, document.terminals, document.start) else {
        return Err(errors);
    };

    if start.is_empty() {
        return Err(vec![malformed(Malformation::EmptySection(Section::Start), Location::line(start_line))]);
    }

    Ok(Declarations {
        nonterminals: split_symbols(nonterminals),
        terminals: split_symbols(terminals),
        start_symbol: start.to_string()
    })
}

fn parse_symbol(text: &str, declarations: &Declarations) -> Result<Symbol> {
    if declarations.nonterminals.contains(text) {
        Ok(Symbol::Nonterminal(text.to_string()))
    } else if declarations.terminals.contains(text) {
        Ok(Symbol::Terminal(text.to_string()))
    } else {
        Err(ParseErrorType::UnknownSymbol(text.to_string()))
    }
}

fn parse_alternative(tokens: &[Token], declarations: &Declarations) -> Result<Alternative> {
    // Empty markers contribute no symbols, so an alternative made only of
    // them is the empty production
    tokens.iter().filter_map(|t| match t {
        Token::Symbol(s) => Some(parse_symbol(s, declarations)),
        Token::Arrow => Some(Err(ParseErrorType::UnknownSymbol("→".to_string()))),
        Token::Or | Token::Empty => None
    }).collect()
}

fn parse_rewrite(tokens: &[Token], declarations: &Declarations) -> Result<Rewrite> {
    tokens.split(|t| *t == Token::Or).map(|alternative| parse_alternative(alternative, declarations)).collect()
}

fn parse_entry(tokens: &[Token], location: Location, declarations: &Declarations) -> Result<Rule> {
    let symbol = match tokens.first() {
        Some(Token::Symbol(s)) => Ok(s.clone()),
        _ => Err(ParseErrorType::MalformedGrammar(Malformation::MissingLeftHandSide))
    }?;

    if !declarations.nonterminals.contains(&symbol) {
        return Err(ParseErrorType::UndeclaredLeftHandSide(symbol));
    }

    if tokens.get(1) != Some(&Token::Arrow) {
        return Err(ParseErrorType::MalformedGrammar(Malformation::MissingArrow));
    }

    let rewrite = parse_rewrite(&tokens[2..], declarations)?;

    Ok(Rule {
        symbol,
        rewrite,
        location
    })
}

fn parse_lex_entry(entry: &str, location: Location, declarations: &Declarations, spellings: &[&str]) -> LineResult<Rule> {
    lexer::lex_entry(entry, spellings)
        .and_then(|tokens| parse_entry(&tokens, location.clone(), declarations))
        .map_err(|error| ParseError { location, error })
}

// Builds the grammar, letting alternatives for the same nonterminal
// accumulate in the order they were declared
fn grammar_from_rules(rules: Vec<Rule>, declarations: Declarations) -> Grammar {
    let mut grammar = Grammar {
        nonterminals: declarations.nonterminals,
        terminals: declarations.terminals,
        start_symbol: declarations.start_symbol,
        rules: Rules::new()
    };

    for rule in rules {
        debug!("{}: {} has {} alternative(s)", rule.location, rule.symbol, rule.rewrite.len());
        grammar.rules.entry(rule.symbol).or_default().extend(rule.rewrite);
    }

    grammar
}

pub fn parse_grammar(text: &str) -> FileResult<Grammar> {
    let (document, mut errors) = split_document(text);

    let declarations = match declarations_from(&document) {
        Ok(declarations) => declarations,
        Err(missing) => {
            errors.extend(missing);
            errors.sort_by_key(|e| e.location.line);
            return Err(errors);
        }
    };
    errors.extend(verify_declarations(&declarations, &document));

    if document.productions.is_none() {
        warn!("Grammar has no `P` section, so it has no productions");
    }

    // Longest spellings first so that `AB` wins over `A`
    let spellings = declarations.nonterminals.iter()
        .map(String::as_str)
        .sorted_by_key(|s| std::cmp::Reverse(s.len()))
        .collect_vec();

    let (rules, rule_errors): (Vec<_>, Vec<_>) = document.entries.iter()
        .map(|(entry, num)| parse_lex_entry(entry, Location::line(*num), &declarations, &spellings))
        .partition_result();
    errors.extend(rule_errors);

    if !errors.is_empty() {
        errors.sort_by_key(|e| e.location.line);
        return Err(errors);
    }

    let grammar = grammar_from_rules(rules, declarations);
    verifier::warn_undefined_nonterminals(&grammar);
    Ok(grammar)
}

pub fn parse_file(path: &PathBuf) -> FileResult<Grammar> {
    let text = std::fs::read_to_string(path).map_err(|e| vec![ParseError {
        location: Location::whole().in_file(path),
        error: ParseErrorType::FileError(e)
    }])?;

    parse_grammar(&text).map_err(|errors| {
        errors.into_iter()
            .map(|e| ParseError { location: e.location.in_file(path), error: e.error })
            .collect_vec()
    })
}
