//! 분류기 trait — 외부 이상 탐지 모델의 경계
//!
//! 통계적 이상 탐지 모델(특징 추출 + 학습된 모델)은 별도의 오프라인
//! 프로세스가 학습/보관하며, 이 크레이트는 호출 경계만 정의합니다.
//! 모델 파일 존재 여부 같은 전역 상태 검사 대신, 명시적으로 전달되는
//! capability 객체의 생명주기(`is_ready`)로 준비 상태를 표현합니다.

use crate::error::ClassifierError;
use crate::types::Verdict;

/// 이상 탐지 분류기 trait
///
/// 새로운 분류기(예: 외부 모델 서비스 연동)를 추가하려면 이 trait을
/// 구현합니다. 파이프라인은 분류 실패를 전파하지 않고
/// "이상 없음"으로 강등하므로, 구현체는 준비되지 않은 상태를
/// [`ClassifierError::NotReady`]로 알리면 됩니다.
pub trait Classifier: Send + Sync {
    /// 분류기 이름
    fn name(&self) -> &str;

    /// 모델이 로드되어 분류 가능한 상태인지 반환
    fn is_ready(&self) -> bool;

    /// 메시지를 분류하여 판정을 반환
    fn classify(&self, message: &str) -> Result<Verdict, ClassifierError>;
}

/// 미준비 분류기 — 학습된 모델이 연결되지 않았을 때의 기본 구현
///
/// 항상 [`ClassifierError::NotReady`]를 반환합니다. 파이프라인의
/// 강등 규칙에 따라 모든 엔트리는 "이상 없음"으로 처리됩니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnreadyClassifier;

impl Classifier for UnreadyClassifier {
    fn name(&self) -> &str {
        "unready"
    }

    fn is_ready(&self) -> bool {
        false
    }

    fn classify(&self, _message: &str) -> Result<Verdict, ClassifierError> {
        Err(ClassifierError::NotReady)
    }
}
