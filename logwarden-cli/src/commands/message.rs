//! `logwarden message` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use logwarden_analysis::{PatternStore, ThreatMatcher};

use crate::cli::MessageArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `message` command.
///
/// Checks a single message string against the threat patterns without
/// requiring log-line structure. Exits with code 4 when the message
/// matches any pattern.
pub async fn execute(
    args: MessageArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = super::load_or_default(config_path).await?;

    let pattern_path = args
        .patterns
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| config.analysis.pattern_file.clone());
    let store = PatternStore::load_file(&pattern_path).await?;

    info!(patterns = store.len(), "checking message");

    let matcher = ThreatMatcher::build(&store);
    let matched: Vec<String> = matcher
        .matching_patterns(&args.text)
        .into_iter()
        .map(str::to_owned)
        .collect();

    let report = MessageReport {
        text: args.text,
        threat_detected: !matched.is_empty(),
        matched_patterns: matched,
    };

    writer.render(&report)?;

    if report.threat_detected {
        return Err(CliError::Flagged(1));
    }

    Ok(())
}

/// Single-message check report.
#[derive(Serialize)]
pub struct MessageReport {
    /// The checked message text
    pub text: String,
    /// Whether any pattern matched
    pub threat_detected: bool,
    /// All patterns found in the message
    pub matched_patterns: Vec<String>,
}

impl Render for MessageReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Message: {}", self.text)?;
        if self.threat_detected {
            writeln!(w, "  Result: {}", "THREAT".red().bold())?;
            for pattern in &self.matched_patterns {
                writeln!(w, "  Matched: {}", pattern)?;
            }
        } else {
            writeln!(w, "  Result: {}", "clean".green())?;
        }

        Ok(())
    }
}
