//! Logwarden CLI entry point
//!
//! Parses arguments, initializes tracing from the effective configuration
//! and dispatches to the subcommand handlers. Errors map to process exit
//! codes via [`CliError::exit_code`].

use clap::Parser;

use logwarden_core::config::{GeneralConfig, LogwardenConfig};

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

mod cli;
mod commands;
mod error;
mod output;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let exit = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("error: {}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit);
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // Logging setup never blocks a subcommand: config errors are
    // reported by the handlers themselves with proper exit codes.
    let general = match LogwardenConfig::load(&cli.config).await {
        Ok(config) => config.general,
        Err(_) => GeneralConfig::default(),
    };

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| general.log_level.clone());
    init_tracing(&level, &general.log_format);

    tracing::debug!(config = %cli.config.display(), "logwarden starting");

    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Analyze(args) => commands::analyze::execute(args, &cli.config, &writer).await,
        Commands::Message(args) => commands::message::execute(args, &cli.config, &writer).await,
        Commands::Patterns(args) => commands::patterns::execute(args, &cli.config, &writer).await,
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    }
}

/// Initialize the global tracing subscriber.
///
/// Diagnostics go to stderr so stdout stays clean for command output.
fn init_tracing(level: &str, format: &str) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_writer(std::io::stderr);

    if format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
