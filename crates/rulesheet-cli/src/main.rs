//! Rulesheet CLI - validate spreadsheet rows against rule sheets.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging(verbose: bool) {
    let default = if verbose { "rulesheet=debug" } else { "rulesheet=warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Validate {
            input,
            rules,
            output,
            json,
            claim_column,
            flag_blank_cells,
            limit,
        } => commands::validate::run(commands::validate::ValidateArgs {
            input,
            rules,
            output,
            json,
            claim_column,
            flag_blank_cells,
            limit,
            verbose: cli.verbose,
        }),

        Commands::Lint { rules } => commands::lint::run(rules, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
