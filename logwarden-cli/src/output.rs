//! Output formatting abstraction for text vs JSON rendering
//!
//! Every report the CLI prints (analysis results, pattern listings,
//! validation verdicts) flows through [`OutputWriter`], which switches
//! between human-readable text and machine-readable JSON. Command
//! handlers stay format-agnostic.

use std::io::Write;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Abstraction for writing CLI output in different formats.
///
/// Subcommand handlers call `writer.render(&report)` where the report
/// implements both `Serialize` (for JSON) and `Render` (for text).
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    /// Create a new output writer with the specified format.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render a report to stdout.
    ///
    /// For `Text` format, delegates to `Render::render_text()`.
    /// For `Json` format, serialises via `serde_json`.
    pub fn render<T: Render + Serialize>(&self, report: &T) -> Result<(), CliError> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        match self.format {
            OutputFormat::Text => {
                report.render_text(&mut handle)?;
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut handle, report)?;
                writeln!(handle)?;
            }
        }
        Ok(())
    }
}

/// Trait for human-readable text rendering.
///
/// Implemented by every CLI report alongside `serde::Serialize`.
pub trait Render {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct SummaryReport {
        file: String,
        threats: u32,
    }

    impl Render for SummaryReport {
        fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
            writeln!(w, "File: {}", self.file)?;
            writeln!(w, "Threats: {}", self.threats)?;
            Ok(())
        }
    }

    #[test]
    fn test_render_text_format() {
        let report = SummaryReport {
            file: "auth.log".to_owned(),
            threats: 3,
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("File: auth.log"), "should render file name");
        assert!(output.contains("Threats: 3"), "should render threat count");
    }

    #[test]
    fn test_json_format_structure() {
        let report = SummaryReport {
            file: "auth.log".to_owned(),
            threats: 1,
        };

        let json = serde_json::to_string(&report).expect("json serialization should succeed");
        let parsed: serde_json::Value =
            serde_json::from_str(&json).expect("should parse back to JSON");

        assert_eq!(
            parsed["file"].as_str(),
            Some("auth.log"),
            "file should be in JSON"
        );
        assert_eq!(
            parsed["threats"].as_u64(),
            Some(1),
            "threat count should be in JSON"
        );
    }

    #[test]
    fn test_json_pretty_formatting() {
        let report = SummaryReport {
            file: "app.log".to_owned(),
            threats: 0,
        };

        let json = serde_json::to_string_pretty(&report).expect("pretty JSON should succeed");
        assert!(json.contains('\n'), "pretty JSON should contain newlines");
        assert!(
            json.contains("  "),
            "pretty JSON should contain indentation"
        );
    }

    #[test]
    fn test_render_text_unicode_content() {
        #[derive(Serialize)]
        struct MessageLine {
            text: String,
        }

        impl Render for MessageLine {
            fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
                writeln!(w, "{}", self.text)?;
                Ok(())
            }
        }

        let report = MessageLine {
            text: "권한 없는 접근 attempt from 10.0.0.7".to_owned(),
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("rendering unicode should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("권한 없는 접근"));
        assert!(output.contains("10.0.0.7"));
    }

    #[test]
    fn test_json_serialization_with_vec() {
        #[derive(Serialize)]
        struct MatchedPatterns {
            patterns: Vec<String>,
        }

        let report = MatchedPatterns {
            patterns: vec![
                "sql injection".to_owned(),
                "ddos attack".to_owned(),
                "data breach".to_owned(),
            ],
        };

        let json = serde_json::to_string(&report).expect("vec serialization should succeed");
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("should parse JSON");

        let patterns = parsed["patterns"]
            .as_array()
            .expect("patterns should be array");
        assert_eq!(patterns.len(), 3, "should have 3 patterns");
    }
}
