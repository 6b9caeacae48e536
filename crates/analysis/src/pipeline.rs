//! 분석 파이프라인 -- 파싱/위협 매칭/이상 탐지의 전체 흐름을 관리합니다.
//!
//! # 내부 아키텍처
//! ```text
//! raw lines -> LogEntryParser -> LogEntry -> ThreatMatcher + Classifier -> AnalysisResult
//!                   |                            |
//!              skip + count               분류 실패는 "이상 없음"으로 강등
//! ```
//!
//! 파이프라인은 빌드 후 공유 가변 상태 없이 동작합니다. 매처와
//! 분류기는 불변이며, 여러 스레드가 [`analyze_entry`] 를 조율 없이
//! 동시에 호출할 수 있습니다. 패턴 리로드는 새 매처를 완전히 빌드한
//! 뒤 참조를 원자적으로 교체하므로, 동시 읽기 스레드는 교체 전까지
//! 이전 매처를 계속 사용하며 구성 중인 매처를 관찰할 수 없습니다.
//!
//! [`analyze_entry`]: AnalysisPipeline::analyze_entry

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use logwarden_core::classifier::{Classifier, UnreadyClassifier};
use logwarden_core::config::AnalysisSection;
use logwarden_core::types::{AnalysisResult, BatchReport, LogEntry, Verdict};

use crate::matcher::ThreatMatcher;
use crate::parser::LogEntryParser;
use crate::pattern::PatternStore;

/// 분석 파이프라인
///
/// # 사용 예시
/// ```
/// use logwarden_analysis::pattern::PatternStore;
/// use logwarden_analysis::pipeline::AnalysisPipelineBuilder;
///
/// let pipeline = AnalysisPipelineBuilder::new()
///     .patterns(PatternStore::with_defaults())
///     .build();
///
/// let report = pipeline.analyze_batch([
///     "[2024-01-01 10:00:00] INFO - auth: User logged in successfully",
///     "garbage line with no structure",
/// ]);
/// assert_eq!(report.len(), 1);
/// assert_eq!(report.skipped_lines, 1);
/// ```
pub struct AnalysisPipeline {
    /// 로그 줄 파서
    parser: LogEntryParser,
    /// 현재 매처 (리로드 시 새 인스턴스로 교체)
    matcher: RwLock<Arc<ThreatMatcher>>,
    /// 외부 이상 탐지 분류기
    classifier: Arc<dyn Classifier>,
    /// 분석된 엔트리 누적 수
    processed_count: AtomicU64,
    /// 파싱 실패로 제외된 줄 누적 수
    skipped_count: AtomicU64,
    /// 분류기 실패 누적 수 (강등 처리됨)
    classifier_error_count: AtomicU64,
}

impl AnalysisPipeline {
    /// 엔트리 하나를 분석합니다.
    ///
    /// 위협 매칭과 분류기 호출은 서로 독립이며 순서는 결과에 영향을
    /// 주지 않습니다. 분류기 에러는 전파되지 않고
    /// `anomaly_detected = false`로 강등됩니다.
    pub fn analyze_entry(&self, entry: LogEntry) -> AnalysisResult {
        let matcher = self.matcher_snapshot();
        let threat_detected = matcher.contains_match(&entry.message);

        let anomaly_detected = match self.classifier.classify(&entry.message) {
            Ok(verdict) => verdict == Verdict::Anomalous,
            Err(e) => {
                self.classifier_error_count.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(
                    classifier = self.classifier.name(),
                    error = %e,
                    "classifier unavailable, treating entry as not anomalous"
                );
                false
            }
        };

        self.processed_count.fetch_add(1, Ordering::Relaxed);

        AnalysisResult {
            entry,
            threat_detected,
            anomaly_detected,
        }
    }

    /// 여러 줄을 배치로 분석합니다.
    ///
    /// 파싱에 실패한 줄은 카운트 후 건너뛰며, 결과는 파싱에 성공한
    /// 줄의 입력 순서를 그대로 따릅니다.
    pub fn analyze_batch<I, S>(&self, lines: I) -> BatchReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = BatchReport::default();

        for line in lines {
            match self.parser.parse(line.as_ref()) {
                Ok(entry) => report.results.push(self.analyze_entry(entry)),
                Err(e) => {
                    report.skipped_lines += 1;
                    self.skipped_count.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!(error = %e, "excluding unparseable line from batch");
                }
            }
        }

        report
    }

    /// 지연 평가 분석 반복자를 반환합니다.
    ///
    /// 입력을 한 번만 소비하는 유한 시퀀스이며, 파싱에 성공한 줄마다
    /// 하나의 결과를 입력 순서대로 산출합니다. 제외된 줄은
    /// [`skipped_count`](Self::skipped_count) 누적치에 반영됩니다.
    pub fn analyze_iter<'a, I, S>(
        &'a self,
        lines: I,
    ) -> impl Iterator<Item = AnalysisResult> + 'a
    where
        I: IntoIterator<Item = S>,
        I::IntoIter: 'a,
        S: AsRef<str> + 'a,
    {
        lines.into_iter().filter_map(move |line| {
            match self.parser.parse(line.as_ref()) {
                Ok(entry) => Some(self.analyze_entry(entry)),
                Err(e) => {
                    self.skipped_count.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!(error = %e, "excluding unparseable line");
                    None
                }
            }
        })
    }

    /// 패턴 집합을 리로드합니다 (hot-reload).
    ///
    /// 새 매처를 완전히 빌드한 뒤 참조를 교체합니다. 동시에 분석 중인
    /// 스레드는 이미 가져간 이전 매처 스냅샷으로 계속 진행합니다.
    pub fn reload_patterns(&self, store: &PatternStore) {
        let new_matcher = Arc::new(ThreatMatcher::build(store));
        let pattern_count = new_matcher.pattern_count();

        let mut slot = self
            .matcher
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = new_matcher;

        tracing::info!(patterns = pattern_count, "threat matcher reloaded");
    }

    /// 현재 매처의 스냅샷을 반환합니다.
    pub fn matcher_snapshot(&self) -> Arc<ThreatMatcher> {
        self.matcher
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 분석된 엔트리 누적 수를 반환합니다.
    pub fn processed_count(&self) -> u64 {
        self.processed_count.load(Ordering::Relaxed)
    }

    /// 제외된 줄 누적 수를 반환합니다.
    pub fn skipped_count(&self) -> u64 {
        self.skipped_count.load(Ordering::Relaxed)
    }

    /// 분류기 실패 누적 수를 반환합니다.
    pub fn classifier_error_count(&self) -> u64 {
        self.classifier_error_count.load(Ordering::Relaxed)
    }
}

/// 분석 파이프라인 빌더
pub struct AnalysisPipelineBuilder {
    section: AnalysisSection,
    patterns: PatternStore,
    classifier: Arc<dyn Classifier>,
}

impl AnalysisPipelineBuilder {
    /// 새 빌더를 생성합니다.
    ///
    /// 기본값: 내장 기본 패턴, 미준비 분류기(모든 엔트리 이상 없음).
    pub fn new() -> Self {
        Self {
            section: AnalysisSection::default(),
            patterns: PatternStore::with_defaults(),
            classifier: Arc::new(UnreadyClassifier),
        }
    }

    /// 분석 설정을 지정합니다.
    pub fn config(mut self, section: AnalysisSection) -> Self {
        self.section = section;
        self
    }

    /// 패턴 스토어를 지정합니다.
    pub fn patterns(mut self, store: PatternStore) -> Self {
        self.patterns = store;
        self
    }

    /// 분류기를 지정합니다.
    pub fn classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// 파이프라인을 빌드합니다.
    pub fn build(self) -> AnalysisPipeline {
        let parser = LogEntryParser::new()
            .with_timestamp_format(self.section.timestamp_format)
            .with_max_line_bytes(self.section.max_line_bytes);

        let matcher = ThreatMatcher::build(&self.patterns);

        AnalysisPipeline {
            parser,
            matcher: RwLock::new(Arc::new(matcher)),
            classifier: self.classifier,
            processed_count: AtomicU64::new(0),
            skipped_count: AtomicU64::new(0),
            classifier_error_count: AtomicU64::new(0),
        }
    }
}

impl Default for AnalysisPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
