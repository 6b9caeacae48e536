//! `logwarden patterns` command handler

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use logwarden_analysis::PatternStore;

use crate::cli::{PatternsAction, PatternsArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `patterns` command.
pub async fn execute(
    args: PatternsArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        PatternsAction::Validate { file } => execute_validate(file, config_path, writer).await,
        PatternsAction::List { file } => execute_list(file, config_path, writer).await,
    }
}

/// Resolve the pattern file path from the argument or configuration.
async fn resolve_path(
    file: Option<PathBuf>,
    config_path: &Path,
) -> Result<String, CliError> {
    match file {
        Some(path) => Ok(path.display().to_string()),
        None => {
            let config = super::load_or_default(config_path).await?;
            Ok(config.analysis.pattern_file)
        }
    }
}

/// Execute the patterns validate subcommand.
///
/// Unlike analysis commands, a missing pattern file here is a failure:
/// validate answers "would this exact file load", not "can analysis run".
async fn execute_validate(
    file: Option<PathBuf>,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let path = resolve_path(file, config_path).await?;

    info!(path = %path, "validating pattern file");

    let exists = tokio::fs::metadata(&path).await.is_ok();
    let load_result = if exists {
        PatternStore::load_file(&path).await
    } else {
        Err(logwarden_analysis::AnalysisError::PatternLoad {
            path: path.clone(),
            reason: "file not found".to_owned(),
        })
    };

    let report = match load_result {
        Ok(store) => PatternValidationReport {
            path,
            valid: true,
            patterns: store.len(),
            errors: Vec::new(),
        },
        Err(e) => PatternValidationReport {
            path,
            valid: false,
            patterns: 0,
            errors: vec![e.to_string()],
        },
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Pattern("pattern file is invalid".to_owned()));
    }

    Ok(())
}

/// Execute the patterns list subcommand.
async fn execute_list(
    file: Option<PathBuf>,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let path = resolve_path(file, config_path).await?;

    let store = PatternStore::load_file(&path).await?;

    let report = PatternListReport {
        path,
        total: store.len(),
        patterns: store.iter().map(str::to_owned).collect(),
    };

    writer.render(&report)?;

    Ok(())
}

/// Pattern file validation report.
#[derive(Serialize)]
pub struct PatternValidationReport {
    /// Pattern file path
    pub path: String,
    /// Whether the file loaded successfully
    pub valid: bool,
    /// Number of usable patterns after normalization
    pub patterns: usize,
    /// Load error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for PatternValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Pattern Validation: {}", self.path.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
            writeln!(w, "  Patterns: {}", self.patterns)?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}

/// Pattern listing report.
#[derive(Serialize)]
pub struct PatternListReport {
    /// Pattern file path (or the configured default)
    pub path: String,
    /// Number of patterns
    pub total: usize,
    /// Normalized patterns in sorted order
    pub patterns: Vec<String>,
}

impl Render for PatternListReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Patterns ({}): {}", self.total, self.path.bold())?;
        for pattern in &self.patterns {
            writeln!(w, "  - {}", pattern)?;
        }

        Ok(())
    }
}
