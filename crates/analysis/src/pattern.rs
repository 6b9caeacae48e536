//! 패턴 스토어 -- 위협 패턴 집합의 로딩과 정규화
//!
//! 패턴 파일은 의심 문구의 JSON 문자열 배열입니다
//! (예: `["sql injection", "ddos attack"]`). 파일이 없으면 내장 기본
//! 패턴 집합으로 폴백합니다 — 경고를 남기는 사용성 기본값이며
//! 조용한 실패가 아닙니다.
//!
//! 모든 패턴은 소문자/트림 정규화 후 정확히 같은 텍스트끼리
//! 중복 제거됩니다. 집합에 순서 요구사항은 없습니다.

use std::collections::BTreeSet;
use std::path::Path;

use crate::error::AnalysisError;

/// 패턴 파일 최대 크기 (바이트)
const MAX_PATTERN_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10MB

/// 패턴 정규화 -- 트림 후 문자 단위 소문자 변환
///
/// 매처가 텍스트를 걷는 것과 같은 `char::to_lowercase` 접기를 사용합니다.
/// `str::to_lowercase`는 그리스어 final sigma처럼 문맥 의존 규칙을
/// 적용하므로 스캔 쪽 접기와 결과가 달라질 수 있습니다.
fn normalize(s: &str) -> String {
    s.trim().chars().flat_map(char::to_lowercase).collect()
}

/// 내장 기본 위협 패턴
///
/// 패턴 파일이 없을 때 사용됩니다.
pub const DEFAULT_PATTERNS: &[&str] = &[
    "sql injection",
    "unauthorized access",
    "brute force attack",
    "ddos attack",
    "malware detected",
    "data breach",
];

/// 패턴 스토어 -- 정규화/중복 제거된 위협 패턴 집합
///
/// [`ThreatMatcher`](crate::matcher::ThreatMatcher) 구성의 입력이 됩니다.
/// 구성 이후 변경되지 않으며, 패턴 갱신은 새 스토어를 만들어
/// 새 매처를 빌드하는 방식으로 수행합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternStore {
    patterns: BTreeSet<String>,
}

impl PatternStore {
    /// 문자열 반복자에서 패턴 스토어를 생성합니다.
    ///
    /// 각 패턴은 트림 후 소문자로 정규화되며, 빈 문자열은 버려집니다.
    pub fn from_iter<I, S>(iter: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = iter
            .into_iter()
            .map(|s| normalize(s.as_ref()))
            .filter(|s| !s.is_empty())
            .collect();
        Self { patterns }
    }

    /// 내장 기본 패턴 집합으로 스토어를 생성합니다.
    pub fn with_defaults() -> Self {
        Self::from_iter(DEFAULT_PATTERNS.iter().copied())
    }

    /// JSON 패턴 파일에서 스토어를 로드합니다.
    ///
    /// 파일이 없으면 경고 로그를 남기고 기본 패턴 집합을 반환합니다.
    /// 파일이 존재하지만 문자열 배열이 아니면
    /// [`AnalysisError::PatternLoad`]를 반환합니다.
    pub async fn load_file(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let path = path.as_ref();

        let metadata = match tokio::fs::metadata(path).await {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    path = %path.display(),
                    "pattern file not found, using built-in default patterns"
                );
                return Ok(Self::with_defaults());
            }
            Err(e) => {
                return Err(AnalysisError::PatternLoad {
                    path: path.display().to_string(),
                    reason: format!("failed to read file metadata: {e}"),
                });
            }
        };

        if metadata.len() > MAX_PATTERN_FILE_SIZE {
            return Err(AnalysisError::PatternLoad {
                path: path.display().to_string(),
                reason: format!(
                    "file too large: {} bytes (max: {MAX_PATTERN_FILE_SIZE})",
                    metadata.len()
                ),
            });
        }

        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| AnalysisError::PatternLoad {
                    path: path.display().to_string(),
                    reason: format!("failed to read file: {e}"),
                })?;

        let store = Self::parse_json(&content, &path.display().to_string())?;
        tracing::info!(
            path = %path.display(),
            count = store.len(),
            "loaded threat patterns"
        );
        Ok(store)
    }

    /// JSON 문자열 배열을 파싱하여 스토어를 생성합니다.
    pub fn parse_json(json_str: &str, source: &str) -> Result<Self, AnalysisError> {
        let raw: Vec<String> =
            serde_json::from_str(json_str).map_err(|e| AnalysisError::PatternLoad {
                path: source.to_owned(),
                reason: format!("expected a JSON array of strings: {e}"),
            })?;
        Ok(Self::from_iter(raw))
    }

    /// 패턴 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// 패턴이 비어 있는지 반환합니다.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// 정규화된 패턴이 집합에 있는지 반환합니다.
    pub fn contains(&self, pattern: &str) -> bool {
        self.patterns.contains(&normalize(pattern))
    }

    /// 패턴 반복자를 반환합니다.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }
}
