//! Integration tests for the analyze command flow.
//!
//! Exercises the same config + pattern + pipeline path the CLI drives,
//! with real files on disk.

use std::fs;

use tempfile::TempDir;

use logwarden_analysis::{AnalysisPipelineBuilder, PatternStore};
use logwarden_core::config::LogwardenConfig;

#[tokio::test]
async fn test_config_validate_valid_toml() {
    // Given: A valid config file
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("logwarden.toml");

    let valid_config = r#"
[general]
log_level = "info"
log_format = "json"

[analysis]
pattern_file = "threat_patterns.json"
timestamp_format = "%Y-%m-%d %H:%M:%S"
max_line_bytes = 65536
"#;

    fs::write(&config_path, valid_config).expect("should write config");

    // When: Loading the config
    let result = LogwardenConfig::load(&config_path).await;

    // Then: Should succeed
    assert!(result.is_ok(), "valid config should load successfully");
}

#[tokio::test]
async fn test_config_validate_malformed_toml() {
    // Given: A malformed TOML file
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("bad.toml");

    let malformed_config = r#"
[general
log_level = "info"
"#;

    fs::write(&config_path, malformed_config).expect("should write bad config");

    // When: Loading the config
    let result = LogwardenConfig::load(&config_path).await;

    // Then: Should fail
    assert!(result.is_err(), "malformed TOML should fail to load");
}

#[tokio::test]
async fn test_config_validate_missing_file() {
    let config_path = std::path::PathBuf::from("/nonexistent/logwarden.toml");

    let result = LogwardenConfig::load(&config_path).await;

    assert!(result.is_err(), "missing file should fail to load");
}

#[tokio::test]
async fn test_config_validate_empty_file() {
    // Given: An empty config file
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("empty.toml");

    fs::write(&config_path, "").expect("should write empty file");

    // When: Loading the config
    let result = LogwardenConfig::load(&config_path).await;

    // Then: Should succeed with defaults
    assert!(result.is_ok(), "empty config should use defaults");
    let config = result.expect("config should load");
    assert_eq!(config.analysis.pattern_file, "threat_patterns.json");
}

#[tokio::test]
async fn test_analyze_flow_with_real_files() {
    // Given: A pattern file and a log file on disk
    let temp_dir = TempDir::new().expect("should create temp dir");
    let pattern_path = temp_dir.path().join("patterns.json");
    let log_path = temp_dir.path().join("app.log");

    fs::write(&pattern_path, r#"["port scan", "sql injection"]"#)
        .expect("should write patterns");
    fs::write(
        &log_path,
        "[2024-05-01 09:00:00] INFO - auth: session opened\n\
         not a log line\n\
         [2024-05-01 09:00:01] WARN - ids: PORT SCAN from 10.0.0.7\n",
    )
    .expect("should write log");

    // When: Running the pipeline the way `analyze` does
    let store = PatternStore::load_file(&pattern_path)
        .await
        .expect("patterns should load");
    let pipeline = AnalysisPipelineBuilder::new().patterns(store).build();

    let content = tokio::fs::read_to_string(&log_path)
        .await
        .expect("log should read");
    let report = pipeline.analyze_batch(content.lines());

    // Then: One clean entry, one threat, one skipped line
    assert_eq!(report.len(), 2);
    assert_eq!(report.skipped_lines, 1);
    assert!(!report.results[0].threat_detected);
    assert!(report.results[1].threat_detected);
    assert!(report.any_flagged());
}

#[tokio::test]
async fn test_analyze_flow_malformed_pattern_file() {
    // Given: A pattern file that is not a JSON string array
    let temp_dir = TempDir::new().expect("should create temp dir");
    let pattern_path = temp_dir.path().join("patterns.json");

    fs::write(&pattern_path, r#"{"patterns": ["sql injection"]}"#)
        .expect("should write patterns");

    // When: Loading it
    let result = PatternStore::load_file(&pattern_path).await;

    // Then: Should fail (missing file falls back, malformed does not)
    assert!(result.is_err(), "malformed pattern file should fail to load");
}

#[tokio::test]
async fn test_analyze_flow_env_override_pattern_file() {
    // Given: A config file pointing elsewhere plus an env override
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("logwarden.toml");

    fs::write(&config_path, "[analysis]\npattern_file = \"from_file.json\"")
        .expect("should write config");

    unsafe {
        std::env::set_var("LOGWARDEN_ANALYSIS_PATTERN_FILE", "/tmp/from_env.json");
    }

    let config = LogwardenConfig::load(&config_path)
        .await
        .expect("config should load");

    unsafe {
        std::env::remove_var("LOGWARDEN_ANALYSIS_PATTERN_FILE");
    }

    // Then: The environment wins over the file
    assert_eq!(config.analysis.pattern_file, "/tmp/from_env.json");
}
