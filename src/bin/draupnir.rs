//! Draupnir CLI - function-level clone detection over a source tree.

use clap::Parser;

mod cli;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing/logging
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Detect(args) => cli::detect_command(*args),
        Commands::PrintDefaultConfig => cli::print_default_config(),
        Commands::ListLanguages => cli::list_languages(),
    };

    if let Err(err) = result {
        eprintln!("draupnir: {err}");
        std::process::exit(err.exit_code());
    }
}
