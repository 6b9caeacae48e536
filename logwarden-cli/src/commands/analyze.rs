//! `logwarden analyze` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use logwarden_analysis::{AnalysisPipelineBuilder, PatternStore};
use logwarden_core::types::BatchReport;

use crate::cli::AnalyzeArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `analyze` command.
///
/// Loads the configured patterns, runs the full file through the
/// analysis pipeline and renders a per-entry report. Exits non-zero
/// (code 4) when any entry is flagged so scripts can gate on findings.
pub async fn execute(
    args: AnalyzeArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = super::load_or_default(config_path).await?;

    let pattern_path = args
        .patterns
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| config.analysis.pattern_file.clone());
    let store = PatternStore::load_file(&pattern_path).await?;

    info!(
        file = %args.file.display(),
        patterns = store.len(),
        "analyzing log file"
    );

    let content = tokio::fs::read_to_string(&args.file).await?;

    let pipeline = AnalysisPipelineBuilder::new()
        .config(config.analysis)
        .patterns(store)
        .build();

    let batch = pipeline.analyze_batch(content.lines());
    let flagged = batch.results.iter().filter(|r| r.is_flagged()).count();

    let report = AnalyzeReport::from_batch(&args.file, batch, args.flagged_only);
    writer.render(&report)?;

    if flagged > 0 {
        return Err(CliError::Flagged(flagged));
    }

    Ok(())
}

/// Per-file analysis report.
#[derive(Serialize)]
pub struct AnalyzeReport {
    /// Analyzed file path
    pub file: String,
    /// Entries analyzed (parse failures excluded)
    pub analyzed: usize,
    /// Lines excluded because they could not be parsed
    pub skipped: u64,
    /// Entries with a threat pattern match
    pub threats: usize,
    /// Entries flagged anomalous by the classifier
    pub anomalies: usize,
    /// Per-entry results (filtered when --flagged-only)
    pub entries: Vec<EntryReport>,
}

/// One analyzed entry in the report.
#[derive(Serialize)]
pub struct EntryReport {
    pub level: String,
    pub source: String,
    pub message: String,
    pub threat_detected: bool,
    pub anomaly_detected: bool,
    /// "threat", "anomaly" or "clean"
    pub status: String,
}

impl AnalyzeReport {
    fn from_batch(file: &Path, batch: BatchReport, flagged_only: bool) -> Self {
        let analyzed = batch.len();
        let threats = batch.threat_count();
        let anomalies = batch.anomaly_count();

        let entries = batch
            .results
            .into_iter()
            .filter(|r| !flagged_only || r.is_flagged())
            .map(|r| EntryReport {
                // threat takes display precedence over anomaly
                status: if r.threat_detected {
                    "threat".to_owned()
                } else if r.anomaly_detected {
                    "anomaly".to_owned()
                } else {
                    "clean".to_owned()
                },
                level: r.entry.level,
                source: r.entry.source,
                message: r.entry.message,
                threat_detected: r.threat_detected,
                anomaly_detected: r.anomaly_detected,
            })
            .collect();

        Self {
            file: file.display().to_string(),
            analyzed,
            skipped: batch.skipped_lines,
            threats,
            anomalies,
            entries,
        }
    }
}

impl Render for AnalyzeReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Analysis: {}", self.file.bold())?;
        writeln!(
            w,
            "  {} analyzed, {} skipped, {} threats, {} anomalies",
            self.analyzed, self.skipped, self.threats, self.anomalies
        )?;
        writeln!(w)?;

        for entry in &self.entries {
            let status = match entry.status.as_str() {
                "threat" => "THREAT ".red().bold(),
                "anomaly" => "ANOMALY".yellow().bold(),
                _ => "clean  ".green(),
            };
            writeln!(
                w,
                "  {} [{}] {}: {}",
                status, entry.level, entry.source, entry.message
            )?;
        }

        Ok(())
    }
}
