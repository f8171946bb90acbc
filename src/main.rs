mod cli;

use std::process::ExitCode;

use chomsky::membership::Outcome;
use chomsky::{check_membership, classify, generate_strings, parser, sample};
use clap::Parser;
use log::info;
use rand::prelude::*;

use cli::{Cli, Command};

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let grammar = match parser::parse_file(&cli.file) {
        Ok(grammar) => grammar,
        Err(errors) => {
            for error in errors {
                eprintln!("{}", error);
            }
            return ExitCode::FAILURE;
        }
    };
    info!("Parsed {} with {} nonterminal(s)", cli.file.display(), grammar.nonterminals.len());

    let config = cli.command.config();
    match cli.command {
        Command::Classify => {
            println!("{}", classify(&grammar.rules));
        }
        Command::Check { input, .. } => {
            let verdict = check_membership(&grammar, &input, &config);
            println!("{}", classify(&grammar.rules));
            match (verdict.derivation, verdict.outcome) {
                (Some(derivation), _) => println!("accepted: {}", derivation),
                (None, Outcome::Exhausted(exhaustion)) => println!("rejected ({}; the string may still be derivable)", exhaustion),
                (None, _) => println!("rejected"),
            }
        }
        Command::Generate { length, max_results } => {
            match generate_strings(&grammar, length, max_results, &config.limits) {
                Ok(strings) => strings.iter().for_each(|s| println!("{}", s)),
                Err(e) => {
                    eprintln!("{}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
        Command::Sample { amount, seed } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            for _ in 0..amount.unwrap_or(1) {
                match sample(&grammar, &mut rng, &config.limits) {
                    Ok(sentence) => println!("{}", sentence),
                    Err(e) => {
                        eprintln!("{}", e);
                        return ExitCode::FAILURE;
                    }
                }
            }
        }
    }

    ExitCode::SUCCESS
}
