use itertools::Itertools;

use crate::grammar::symbol::is_empty;
use super::{Malformation, ParseErrorType, Result, Section};

#[derive(PartialEq, Debug)]
pub enum Token {
    Arrow,
    Or,
    // An empty-string marker standing for no symbols at all
    Empty,
    Symbol(String)
}

// A `KEY = value` line opening one of the grammar sections
#[derive(PartialEq, Debug)]
pub struct Header<'a> {
    pub section: Section,
    pub value: &'a str
}

pub fn strip_comment(line: &str) -> &str {
    match line.split_once('#') {
        Some((content, _)) => content,
        None => line,
    }
}

pub fn lex_header(line: &str) -> Option<Header<'_>> {
    let (key, value) = line.split_once('=')?;
    let section = Section::from_key(key.trim())?;
    Some(Header { section, value: value.trim() })
}

// Splits a production entry at its arrow, accepting both `→` and `->`
pub fn split_arrow(entry: &str) -> Option<(&str, &str)> {
    ["→", "->"].iter()
        .filter_map(|arrow| entry.find(arrow).map(|i| (i, arrow.len())))
        .min()
        .map(|(i, len)| (&entry[..i], &entry[i + len..]))
}

// Tokenizes one alternative. Declared non-terminal spellings are matched
// longest first, anything else is taken one character at a time
pub fn lex_alternative(alternative: &str, nonterminals: &[&str]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = alternative;

    while let Some(c) = rest.chars().next() {
        if c.is_whitespace() {
            rest = &rest[c.len_utf8()..];
            continue;
        }

        let matched = nonterminals.iter().find(|nt| !nt.is_empty() && rest.starts_with(*nt));
        let taken = match matched {
            Some(nt) => *nt,
            None => &rest[..c.len_utf8()],
        };

        if is_empty(taken) {
            tokens.push(Token::Empty);
        } else {
            tokens.push(Token::Symbol(taken.to_string()));
        }
        rest = &rest[taken.len()..];
    }

    tokens
}

pub fn lex_entry(entry: &str, nonterminals: &[&str]) -> Result<Vec<Token>> {
    let (lhs, rhs) = split_arrow(entry)
        .ok_or(ParseErrorType::MalformedGrammar(Malformation::MissingArrow))?;

    let lhs = lhs.trim();
    if lhs.is_empty() {
        return Err(ParseErrorType::MalformedGrammar(Malformation::MissingLeftHandSide));
    }

    let mut tokens = vec![Token::Symbol(lhs.to_string()), Token::Arrow];
    let alternatives = rhs.split('|').map(str::trim).collect_vec();
    for (i, alternative) in alternatives.into_iter().enumerate() {
        if i > 0 {
            tokens.push(Token::Or);
        }
        if is_empty(alternative) {
            tokens.push(Token::Empty);
        } else {
            tokens.extend(lex_alternative(alternative, nonterminals));
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;

    fn symbol(text: &str) -> Token {
        Token::Symbol(text.to_string())
    }

    #[test]
    fn lex_headers() {
        let lines = vec![
            "N = S A B",
            "T=a b",
            "S =  S ",
            "P = {",
            "Q = x",
            "S → a"
        ];
        let answers = vec![
            Some(Header { section: Section::Nonterminals, value: "S A B" }),
            Some(Header { section: Section::Terminals, value: "a b" }),
            Some(Header { section: Section::Start, value: "S" }),
            Some(Header { section: Section::Productions, value: "{" }),
            None,
            None
        ];

        for (line, answer) in zip(lines, answers) {
            assert_eq!(lex_header(line), answer);
        }
    }

    #[test]
    fn strip_comments() {
        assert_eq!(strip_comment("S → a # the base case"), "S → a ");
        assert_eq!(strip_comment("# whole line"), "");
        assert_eq!(strip_comment("A → b"), "A → b");
    }

    #[test]
    fn split_both_arrows() {
        assert_eq!(split_arrow("S → a A"), Some(("S ", " a A")));
        assert_eq!(split_arrow("S -> a A"), Some(("S ", " a A")));
        assert_eq!(split_arrow("S a A"), None);
    }

    #[test]
    fn lex_alternative_longest_match() {
        let nonterminals = ["AB", "A", "B"];
        let alternatives = vec![
            "aA",
            "a A",
            "ABa",
            "A B",
            "aεb",
            "0A1"
        ];
        let answers = vec![
            vec![symbol("a"), symbol("A")],
            vec![symbol("a"), symbol("A")],
            vec![symbol("AB"), symbol("a")],
            vec![symbol("A"), symbol("B")],
            vec![symbol("a"), Token::Empty, symbol("b")],
            vec![symbol("0"), symbol("A"), symbol("1")]
        ];

        for (alternative, answer) in zip(alternatives, answers) {
            assert_eq!(lex_alternative(alternative, &nonterminals), answer);
        }
    }

    #[test]
    fn lex_normal_entry() {
        let tokens = lex_entry("S → a A | ε | ", &["S", "A"]).unwrap();
        assert_eq!(tokens, vec![
            symbol("S"),
            Token::Arrow,
            symbol("a"),
            symbol("A"),
            Token::Or,
            Token::Empty,
            Token::Or,
            Token::Empty
        ]);

        let tokens = lex_entry("A -> epsilon", &["S", "A"]).unwrap();
        assert_eq!(tokens, vec![symbol("A"), Token::Arrow, Token::Empty]);
    }

    #[test]
    fn lex_malformed_entry() {
        assert_eq!(
            lex_entry("S a A", &["S"]).unwrap_err(),
            ParseErrorType::MalformedGrammar(Malformation::MissingArrow)
        );
        assert_eq!(
            lex_entry(" → a", &["S"]).unwrap_err(),
            ParseErrorType::MalformedGrammar(Malformation::MissingLeftHandSide)
        );
    }
}
