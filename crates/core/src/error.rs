//! 에러 타입 — 도메인별 에러 정의

/// Logwarden 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum LogwardenError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 분류기 경계 에러
    #[error("classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    /// 분석 엔진 에러
    #[error("analysis error: {0}")]
    Analysis(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 분류기 경계 에러
///
/// 외부 이상 탐지 분류기는 준비되지 않았거나 실패할 수 있습니다.
/// 파이프라인은 이 에러를 전파하지 않고 "이상 없음"으로 강등합니다.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    /// 모델이 아직 로드되지 않음
    #[error("classifier not ready: no trained model loaded")]
    NotReady,

    /// 분류 수행 실패
    #[error("classification failed: {reason}")]
    Failed { reason: String },
}
