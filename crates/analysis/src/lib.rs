#![doc = include_str!("../README.md")]
//!
//! # 데이터 흐름
//! ```text
//! pattern file ─► PatternStore ─► ThreatMatcher ─┐
//!                                                 ▼
//! raw log lines ─► LogEntryParser ─► LogEntry ─► AnalysisPipeline ─► AnalysisResult
//!                                                 ▲
//!                                   Classifier ───┘
//! ```

pub mod error;
pub mod matcher;
pub mod parser;
pub mod pattern;
pub mod pipeline;

pub use error::AnalysisError;
pub use matcher::ThreatMatcher;
pub use parser::LogEntryParser;
pub use pattern::{DEFAULT_PATTERNS, PatternStore};
pub use pipeline::{AnalysisPipeline, AnalysisPipelineBuilder};
