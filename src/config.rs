/*
    Bounds on how much work a single request may do
*/

use clap::ValueEnum;

// How context-free grammars are searched for a derivation
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, ValueEnum)]
pub enum Strategy {
    // Breadth-first over leftmost derivations
    #[default]
    #[value(name = "bfs")]
    BreadthFirst,
    // Depth-first recursive descent, kept for comparison
    Backtracking,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Limits {
    // Longer inputs are rejected without searching
    pub max_input_length: usize,
    // Sentential forms expanded before a search gives up
    pub max_expansions: usize,
    // Nesting allowed in the backtracking search
    pub max_recursion_depth: usize,
    // Longest string the generator will enumerate
    pub max_generate_length: usize,
    // Rewrites allowed while sampling one random sentence
    pub max_sample_steps: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_input_length: 100,
            max_expansions: 2000,
            max_recursion_depth: 1000,
            max_generate_length: 10,
            max_sample_steps: 1000,
        }
    }
}

pub const DEFAULT_MAX_RESULTS: usize = 50;

#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Config {
    pub strategy: Strategy,
    pub limits: Limits,
}
