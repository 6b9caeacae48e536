//! 도메인 타입 — 시스템 전역에서 사용되는 공통 타입
//!
//! 파서, 매칭 엔진, CLI가 공유하는 데이터 구조를 정의합니다.

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// 로그 엔트리
///
/// 파싱에 성공한 한 줄의 로그를 나타냅니다.
/// 생성 이후 변경되지 않으며, 파이프라인은 읽기만 합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// 타임스탬프
    pub timestamp: SystemTime,
    /// 로그 레벨 (INFO, WARN, ERROR 등 — 원문 그대로 보존)
    pub level: String,
    /// 로그를 생성한 컴포넌트 (auth, kernel 등)
    pub source: String,
    /// 로그 메시지
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.level, self.source, self.message)
    }
}

/// 분류기 판정 결과
///
/// 외부 이상 탐지 분류기의 두 값 출력입니다.
/// 원시 모델 레이블 해석은 각 분류기 구현의 책임입니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// 정상
    #[default]
    Normal,
    /// 이상 징후
    Anomalous,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Anomalous => write!(f, "anomalous"),
        }
    }
}

/// 엔트리 단위 분석 결과
///
/// 위협 매칭과 이상 탐지는 서로 독립이며 둘 다 기록됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// 분석 대상 엔트리
    pub entry: LogEntry,
    /// 알려진 위협 패턴 매칭 여부
    pub threat_detected: bool,
    /// 분류기 이상 판정 여부
    pub anomaly_detected: bool,
}

impl AnalysisResult {
    /// 위협 또는 이상 중 하나라도 탐지되었는지 반환합니다.
    pub fn is_flagged(&self) -> bool {
        self.threat_detected || self.anomaly_detected
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 위협이 이상 징후보다 표시 우선순위가 높습니다
        let status = if self.threat_detected {
            "threat"
        } else if self.anomaly_detected {
            "anomaly"
        } else {
            "clean"
        };
        write!(f, "{} --> {}", self.entry, status)
    }
}

/// 배치 분석 결과
///
/// 파싱에 성공한 줄의 결과를 입력 순서대로 담고,
/// 구조가 맞지 않아 제외된 줄 수를 함께 보고합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    /// 엔트리별 결과 (입력 순서 보존)
    pub results: Vec<AnalysisResult>,
    /// 파싱 실패로 제외된 줄 수
    pub skipped_lines: u64,
}

impl BatchReport {
    /// 결과 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// 결과가 비어 있는지 반환합니다.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// 위협으로 플래그된 엔트리 수를 반환합니다.
    pub fn threat_count(&self) -> usize {
        self.results.iter().filter(|r| r.threat_detected).count()
    }

    /// 이상으로 플래그된 엔트리 수를 반환합니다.
    pub fn anomaly_count(&self) -> usize {
        self.results.iter().filter(|r| r.anomaly_detected).count()
    }

    /// 위협 또는 이상으로 플래그된 엔트리가 있는지 반환합니다.
    pub fn any_flagged(&self) -> bool {
        self.results.iter().any(|r| r.is_flagged())
    }
}
