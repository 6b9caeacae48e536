//! 분석 엔진 에러 타입
//!
//! [`AnalysisError`]는 분석 엔진 내부에서 발생하는 모든 에러를 표현합니다.
//! `From<AnalysisError> for LogwardenError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.
//!
//! 파싱 실패([`AnalysisError::ParseSkip`])는 배치를 중단시키지 않습니다 —
//! 호출자는 해당 줄을 건너뛰고 카운트만 올립니다.

use logwarden_core::error::LogwardenError;

/// 분석 엔진 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// 로그 줄 파싱 실패 — 해당 줄만 제외되며 배치는 계속됩니다
    #[error("line skipped: {reason}")]
    ParseSkip {
        /// 제외 사유
        reason: String,
    },

    /// 패턴 파일 로딩 실패 (존재하지만 형식이 잘못된 경우)
    #[error("pattern load error: {path}: {reason}")]
    PatternLoad {
        /// 패턴 파일 경로
        path: String,
        /// 로딩 실패 사유
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<AnalysisError> for LogwardenError {
    fn from(err: AnalysisError) -> Self {
        LogwardenError::Analysis(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skip_display() {
        let err = AnalysisError::ParseSkip {
            reason: "line does not match expected shape".to_owned(),
        };
        assert!(err.to_string().contains("skipped"));
        assert!(err.to_string().contains("expected shape"));
    }

    #[test]
    fn pattern_load_display() {
        let err = AnalysisError::PatternLoad {
            path: "threat_patterns.json".to_owned(),
            reason: "expected a JSON array of strings".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("threat_patterns.json"));
        assert!(msg.contains("JSON array"));
    }

    #[test]
    fn converts_to_logwarden_error() {
        let err = AnalysisError::Config {
            field: "pattern_file".to_owned(),
            reason: "empty".to_owned(),
        };
        let top: LogwardenError = err.into();
        assert!(matches!(top, LogwardenError::Analysis(_)));
    }
}
