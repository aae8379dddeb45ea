//! depsync CLI
//!
//! Keeps `node_modules` in step with a dependency repository.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let dir = commands::resolve_dir(cli.dir.as_deref())?;

    match cli.command.unwrap_or(Commands::Sync) {
        Commands::Sync => commands::run_sync(&dir, &cli.sync, cli.verbose),
        Commands::Fingerprint => {
            logging::init(cli.verbose);
            commands::run_fingerprint(&dir)
        }
    }
}
