//! Bookbot - automated space booking
//!
//! Computes a target date in the venue timezone, reads that day's occupancy,
//! picks the first free space from a ranked preference list, and issues
//! exactly one booking attempt against a Skedda-style scheduling service.

use clap::Parser;

mod availability;
mod cli;
mod commands;
mod config;
mod dates;
mod domain;
mod engine;
mod error;
mod provider;
mod snapshot;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Book(args)) => commands::book::run(args),
        Some(Commands::Setup(args)) => commands::setup::run(args),
        Some(Commands::Version) => commands::version::run(),
        Some(Commands::Completions(args)) => commands::completions::run(args),
        None => commands::book::run(cli.book),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
