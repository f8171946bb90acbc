use std::path::PathBuf;

use clap::{Parser, Subcommand};

use chomsky::config::{Config, Limits, Strategy, DEFAULT_MAX_RESULTS};

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// File containing the grammar
    pub file: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print where the grammar sits in the Chomsky hierarchy
    Classify,

    /// Check whether a string is derived by the grammar
    Check {
        /// String to check, may be empty
        input: String,

        /// Search used for context-free grammars (default: bfs)
        #[arg(long, value_enum)]
        strategy: Option<Strategy>,

        /// Sentential forms expanded before giving up (default: 2000)
        #[arg(long, value_name = "COUNT")]
        max_expansions: Option<usize>,

        /// Nesting allowed in the backtracking search (default: 1000)
        #[arg(long, value_name = "DEPTH")]
        max_depth: Option<usize>
    },

    /// List the strings of one length the grammar derives
    Generate {
        /// Length of the strings, from 1 to 10
        length: usize,

        /// Most strings to list
        #[arg(short = 'm', long, value_name = "COUNT", default_value_t = DEFAULT_MAX_RESULTS)]
        max_results: usize
    },

    /// Derive random sentences
    Sample {
        /// Amount to generate (default: 1)
        #[arg(short = 'n', long, value_name = "AMOUNT")]
        amount: Option<u32>,

        /// Seed for repeatable output
        #[arg(long)]
        seed: Option<u64>
    }
}

impl Command {
    pub fn config(&self) -> Config {
        let defaults = Limits::default();
        match self {
            Command::Check { strategy, max_expansions, max_depth, .. } => Config {
                strategy: strategy.unwrap_or_default(),
                limits: Limits {
                    max_expansions: max_expansions.unwrap_or(defaults.max_expansions),
                    max_recursion_depth: max_depth.unwrap_or(defaults.max_recursion_depth),
                    ..defaults
                }
            },
            _ => Config::default(),
        }
    }
}
