//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Logwarden -- log threat analysis toolkit.
///
/// Use `logwarden <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "logwarden", version, about, long_about = None)]
pub struct Cli {
    /// Path to the logwarden.toml configuration file.
    #[arg(short, long, default_value = "logwarden.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a log file and report threats and anomalies.
    Analyze(AnalyzeArgs),

    /// Analyze a single message string against the loaded patterns.
    Message(MessageArgs),

    /// Manage threat patterns.
    Patterns(PatternsArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- analyze ----

/// Analyze a log file line by line.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Path to the log file to analyze.
    pub file: PathBuf,

    /// Override the pattern file from configuration.
    #[arg(long)]
    pub patterns: Option<PathBuf>,

    /// Only print flagged entries (threats and anomalies).
    #[arg(long)]
    pub flagged_only: bool,
}

// ---- message ----

/// Analyze a single message without log-line structure.
#[derive(Args, Debug)]
pub struct MessageArgs {
    /// Message text to check against the threat patterns.
    pub text: String,

    /// Override the pattern file from configuration.
    #[arg(long)]
    pub patterns: Option<PathBuf>,
}

// ---- patterns ----

/// Manage threat patterns.
#[derive(Args, Debug)]
pub struct PatternsArgs {
    #[command(subcommand)]
    pub action: PatternsAction,
}

#[derive(Subcommand, Debug)]
pub enum PatternsAction {
    /// Validate a pattern file without running any analysis.
    Validate {
        /// Pattern file to validate (default: path from configuration).
        file: Option<PathBuf>,
    },
    /// List the patterns that would be used for analysis.
    List {
        /// Pattern file to list (default: path from configuration).
        file: Option<PathBuf>,
    },
}

// ---- config ----

/// Manage logwarden configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, analysis).
        #[arg(long)]
        section: Option<String>,
    },
}
