//! Places small hand-written grammars in the Chomsky hierarchy, decides
//! whether strings belong to them and lists the strings they derive.

pub mod classifier;
pub mod config;
pub mod error_handling;
pub mod generator;
pub mod grammar;
pub mod membership;
pub mod parser;

pub use classifier::{classify, GrammarType};
pub use generator::{generate_strings, sample};
pub use membership::{check_membership, Verdict};
pub use parser::{parse_file, parse_grammar};
