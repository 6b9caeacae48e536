//! 로그 줄 파서 -- 원시 텍스트 한 줄을 구조화된 엔트리로 변환
//!
//! # 기대 형식
//! ```text
//! [<timestamp>] <LEVEL> - <source>: <message>
//! ```
//! 타임스탬프는 고정 형식(기본 `%Y-%m-%d %H:%M:%S`)으로 파싱됩니다.
//!
//! 형식에 맞지 않는 줄은 [`AnalysisError::ParseSkip`]으로 보고되며,
//! 호출자는 해당 줄을 카운트하고 다음 줄 처리를 계속합니다 —
//! 어떤 한 줄도 배치를 중단시키지 않습니다.
//!
//! # 사용 예시
//! ```
//! use logwarden_analysis::parser::LogEntryParser;
//!
//! let parser = LogEntryParser::new();
//! let entry = parser
//!     .parse("[2024-01-01 10:00:00] INFO - auth: User logged in successfully")
//!     .unwrap();
//! assert_eq!(entry.level, "INFO");
//! assert_eq!(entry.source, "auth");
//! ```

use std::time::SystemTime;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

use logwarden_core::types::LogEntry;

use crate::error::AnalysisError;

/// 로그 줄 구조 패턴
///
/// 캡처 그룹: 1=timestamp, 2=level, 3=source, 4=message
const LINE_SHAPE: &str = r"^\[([^\]]+)\]\s+(\w+)\s+-\s+([^:]+):\s*(.+)$";

/// 로그 줄 파서
///
/// 입력만의 순수 함수이며 공유 상태를 변경하지 않습니다.
/// 줄마다 독립적으로 동작하므로 여러 스레드가 동시에 사용할 수 있습니다.
pub struct LogEntryParser {
    /// 컴파일된 줄 구조 정규식
    shape: Regex,
    /// 타임스탬프 형식 (chrono strftime)
    timestamp_format: String,
    /// 최대 허용 입력 크기 (바이트)
    max_line_bytes: usize,
}

impl LogEntryParser {
    /// 기본 설정으로 새 파서를 생성합니다.
    pub fn new() -> Self {
        Self {
            // 고정 패턴이므로 컴파일은 실패하지 않습니다
            shape: Regex::new(LINE_SHAPE).expect("line shape regex is valid"),
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_owned(),
            max_line_bytes: 64 * 1024, // 64KB
        }
    }

    /// 타임스탬프 형식을 설정합니다.
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// 최대 입력 크기를 설정합니다.
    pub fn with_max_line_bytes(mut self, max: usize) -> Self {
        self.max_line_bytes = max;
        self
    }

    /// 한 줄을 파싱하여 로그 엔트리를 생성합니다.
    ///
    /// 구조 불일치, 타임스탬프 파싱 실패, 크기 초과는 모두
    /// [`AnalysisError::ParseSkip`]입니다 — 치명적 에러가 아니며
    /// 호출자는 카운트 후 다음 줄을 계속 처리합니다.
    ///
    /// 같은 줄은 항상 구조적으로 동일한 엔트리로 파싱됩니다.
    pub fn parse(&self, line: &str) -> Result<LogEntry, AnalysisError> {
        if line.len() > self.max_line_bytes {
            return Err(AnalysisError::ParseSkip {
                reason: format!(
                    "line too large: {} bytes (max: {})",
                    line.len(),
                    self.max_line_bytes
                ),
            });
        }

        let line = line.trim_end_matches(['\r', '\n']);

        let captures = self.shape.captures(line).ok_or_else(|| {
            AnalysisError::ParseSkip {
                reason: "line does not match expected shape '[timestamp] LEVEL - source: message'"
                    .to_owned(),
            }
        })?;

        let timestamp = self.parse_timestamp(&captures[1])?;

        Ok(LogEntry {
            timestamp,
            level: captures[2].to_owned(),
            source: captures[3].to_owned(),
            message: captures[4].to_owned(),
        })
    }

    /// 고정 형식 타임스탬프를 파싱합니다.
    ///
    /// 줄 형식에 시간대 정보가 없으므로 UTC로 간주합니다.
    fn parse_timestamp(&self, raw: &str) -> Result<SystemTime, AnalysisError> {
        let dt = NaiveDateTime::parse_from_str(raw, &self.timestamp_format).map_err(|e| {
            AnalysisError::ParseSkip {
                reason: format!("invalid timestamp '{raw}': {e}"),
            }
        })?;
        let dt_utc = DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc);
        Ok(SystemTime::from(dt_utc))
    }
}

impl Default for LogEntryParser {
    fn default() -> Self {
        Self::new()
    }
}
