//! 위협 매처 -- Aho–Corasick 오토마톤 기반 다중 패턴 매칭
//!
//! 패턴 집합으로 trie를 구성하고 BFS로 실패 링크를 연결하여,
//! 텍스트 길이에 선형인 단일 패스로 모든 패턴 발생을 탐지합니다.
//! 실패 링크는 문자 불일치 시 소비한 접두사의 최장 진접미사로
//! 이동하므로, 앞선 부분 매칭 실패와 겹쳐 시작하는 패턴을
//! 놓치지 않습니다 (루트로 무조건 리셋하는 단순 trie의 결함 보완).
//!
//! 노드는 정수 id로 인덱싱되는 arena(`Vec<Node>`)에 저장되어
//! 포인터 순환 없이 구성됩니다.
//!
//! # 사용 예시
//! ```
//! use logwarden_analysis::pattern::PatternStore;
//! use logwarden_analysis::matcher::ThreatMatcher;
//!
//! let store = PatternStore::from_iter(["sql injection", "ddos"]);
//! let matcher = ThreatMatcher::build(&store);
//! assert!(matcher.contains_match("User attempted SQL Injection"));
//! ```

use std::collections::{HashMap, VecDeque};

use crate::pattern::PatternStore;

/// 루트 노드 id
const ROOT: u32 = 0;

/// 오토마톤 노드
///
/// arena 내 다른 노드는 id로만 참조합니다.
#[derive(Debug, Clone)]
struct Node {
    /// 문자 -> 자식 노드 id
    children: HashMap<char, u32>,
    /// 실패 링크 -- 불일치 시 이동할 노드 id
    fail: u32,
    /// 이 노드에서 끝나는 패턴 id 목록 (실패 링크 경유 포함)
    outputs: Vec<u32>,
}

impl Node {
    fn new() -> Self {
        Self {
            children: HashMap::new(),
            fail: ROOT,
            outputs: Vec::new(),
        }
    }
}

/// 위협 매처 -- 빌드 후 불변인 다중 패턴 매칭 오토마톤
///
/// 한 번 빌드되면 변경되지 않으므로 여러 스레드가 조율 없이
/// [`contains_match`](Self::contains_match)를 동시에 호출할 수 있습니다.
/// 패턴 집합 갱신은 새 매처를 빌드하여 교체하는 방식으로 수행합니다.
pub struct ThreatMatcher {
    /// 노드 arena (인덱스 0이 루트)
    nodes: Vec<Node>,
    /// 패턴 원문 (정규화된 소문자, id = 인덱스)
    patterns: Vec<String>,
}

impl ThreatMatcher {
    /// 패턴 스토어에서 오토마톤을 빌드합니다.
    ///
    /// 유효한 문자열 입력에 대해 실패하지 않습니다.
    /// 빈 패턴 집합은 아무것도 매칭하지 않는 매처가 됩니다.
    pub fn build(store: &PatternStore) -> Self {
        let mut nodes = vec![Node::new()];
        let mut patterns = Vec::with_capacity(store.len());

        // 1단계: trie 구성
        for pattern in store.iter() {
            let pattern_id = patterns.len() as u32;
            let mut current = ROOT;
            for ch in pattern.chars() {
                current = match nodes[current as usize].children.get(&ch) {
                    Some(&child) => child,
                    None => {
                        let id = nodes.len() as u32;
                        nodes.push(Node::new());
                        nodes[current as usize].children.insert(ch, id);
                        id
                    }
                };
            }
            nodes[current as usize].outputs.push(pattern_id);
            patterns.push(pattern.to_owned());
        }

        // 2단계: BFS로 실패 링크 구성
        let mut queue = VecDeque::new();
        let root_children: Vec<u32> = nodes[ROOT as usize].children.values().copied().collect();
        for child in root_children {
            nodes[child as usize].fail = ROOT;
            queue.push_back(child);
        }

        while let Some(current) = queue.pop_front() {
            let transitions: Vec<(char, u32)> = nodes[current as usize]
                .children
                .iter()
                .map(|(&ch, &id)| (ch, id))
                .collect();

            for (ch, child) in transitions {
                // 부모의 실패 링크를 따라가며 같은 문자 전이를 찾습니다
                let mut fail = nodes[current as usize].fail;
                loop {
                    if let Some(&next) = nodes[fail as usize].children.get(&ch) {
                        if next != child {
                            nodes[child as usize].fail = next;
                        }
                        break;
                    }
                    if fail == ROOT {
                        nodes[child as usize].fail = ROOT;
                        break;
                    }
                    fail = nodes[fail as usize].fail;
                }

                // 실패 링크 대상의 출력을 승계하여, 현재 위치에서 끝나는
                // 더 짧은 패턴도 함께 보고되도록 합니다
                let inherited = nodes[nodes[child as usize].fail as usize].outputs.clone();
                nodes[child as usize].outputs.extend(inherited);

                queue.push_back(child);
            }
        }

        Self { nodes, patterns }
    }

    /// 텍스트에 패턴이 하나라도 포함되어 있는지 단일 패스로 판정합니다.
    ///
    /// 텍스트는 문자 단위로 소문자 변환되며, 대소문자를 구분하지
    /// 않는 연속 부분 문자열 매칭을 수행합니다. 빈 텍스트 또는
    /// 빈 패턴 집합이면 false를 반환합니다.
    pub fn contains_match(&self, text: &str) -> bool {
        if self.patterns.is_empty() || text.is_empty() {
            return false;
        }

        let mut state = ROOT;
        for ch in text.chars().flat_map(char::to_lowercase) {
            state = self.advance(state, ch);
            if !self.nodes[state as usize].outputs.is_empty() {
                return true;
            }
        }
        false
    }

    /// 텍스트에서 발생하는 모든 패턴을 반환합니다 (중복 제거, 결정적 순서).
    ///
    /// 겹치거나 어긋나게 시작하는 발생도 모두 보고됩니다 —
    /// 한 패턴의 매칭이 다른 패턴을 가리지 않습니다.
    pub fn matching_patterns(&self, text: &str) -> Vec<&str> {
        if self.patterns.is_empty() || text.is_empty() {
            return Vec::new();
        }

        let mut seen = vec![false; self.patterns.len()];
        let mut state = ROOT;
        for ch in text.chars().flat_map(char::to_lowercase) {
            state = self.advance(state, ch);
            for &pattern_id in &self.nodes[state as usize].outputs {
                seen[pattern_id as usize] = true;
            }
        }

        self.patterns
            .iter()
            .enumerate()
            .filter(|(id, _)| seen[*id])
            .map(|(_, p)| p.as_str())
            .collect()
    }

    /// 한 문자를 소비하여 다음 상태로 전이합니다.
    ///
    /// 현재 상태에 해당 문자 전이가 없으면 실패 링크를 따라
    /// 올라가며, 루트에서도 없으면 루트에 머뭅니다.
    fn advance(&self, mut state: u32, ch: char) -> u32 {
        loop {
            if let Some(&next) = self.nodes[state as usize].children.get(&ch) {
                return next;
            }
            if state == ROOT {
                return ROOT;
            }
            state = self.nodes[state as usize].fail;
        }
    }

    /// 로드된 패턴 수를 반환합니다.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// 오토마톤 노드 수를 반환합니다 (루트 포함).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher_of(patterns: &[&str]) -> ThreatMatcher {
        ThreatMatcher::build(&PatternStore::from_iter(patterns.iter().copied()))
    }

    #[test]
    fn matches_case_insensitive_substring() {
        let matcher = matcher_of(&["sql injection", "ddos"]);
        assert!(matcher.contains_match("User attempted SQL Injection"));
    }

    #[test]
    fn matches_pattern_at_end_of_text() {
        let matcher = matcher_of(&["brute force attack"]);
        assert!(matcher.contains_match(
            "Multiple failed logins detected, possible brute force attack"
        ));
    }

    #[test]
    fn no_match_on_clean_text() {
        let matcher = matcher_of(&["sql injection", "ddos"]);
        assert!(!matcher.contains_match("User logged in successfully"));
    }

    #[test]
    fn empty_pattern_set_never_matches() {
        let matcher = matcher_of(&[]);
        assert!(!matcher.contains_match("sql injection everywhere"));
        assert_eq!(matcher.pattern_count(), 0);
        assert_eq!(matcher.node_count(), 1); // 루트만 존재
    }

    #[test]
    fn empty_text_never_matches() {
        let matcher = matcher_of(&["ddos"]);
        assert!(!matcher.contains_match(""));
    }

    #[test]
    fn pattern_equal_to_entire_text_matches() {
        let matcher = matcher_of(&["data breach"]);
        assert!(matcher.contains_match("data breach"));
        assert!(matcher.contains_match("DATA BREACH"));
    }

    #[test]
    fn overlapping_patterns_both_register() {
        let matcher = matcher_of(&["attack", "ddos attack"]);
        let matched = matcher.matching_patterns("ddos attack detected");
        assert!(matched.contains(&"attack"));
        assert!(matched.contains(&"ddos attack"));
    }

    #[test]
    fn failed_partial_match_does_not_blind_later_start() {
        // "aab"를 읽다가 두 번째 a에서 "ab" 시작이 겹칩니다.
        // 루트 리셋 trie는 이 경우를 놓칩니다.
        let matcher = matcher_of(&["ab"]);
        assert!(matcher.contains_match("aab"));
    }

    #[test]
    fn staggered_occurrence_via_failure_links() {
        let matcher = matcher_of(&["ababc"]);
        assert!(matcher.contains_match("abababc"));
    }

    #[test]
    fn shared_prefix_patterns_do_not_mask_each_other() {
        let matcher = matcher_of(&["abcd", "bc"]);
        // "abc..."를 걷는 중 "bc"는 내부에서 끝납니다
        assert!(matcher.contains_match("xabcx"));
        let matched = matcher.matching_patterns("abcd");
        assert!(matched.contains(&"abcd"));
        assert!(matched.contains(&"bc"));
    }

    #[test]
    fn adjacent_occurrences_all_found() {
        let matcher = matcher_of(&["aa"]);
        assert!(matcher.contains_match("aaaa"));
    }

    #[test]
    fn build_is_insertion_order_independent() {
        let forward = ThreatMatcher::build(&PatternStore::from_iter([
            "sql injection",
            "ddos attack",
            "malware",
        ]));
        let reversed = ThreatMatcher::build(&PatternStore::from_iter([
            "malware",
            "ddos attack",
            "sql injection",
        ]));

        let texts = [
            "possible SQL injection detected",
            "DDOS ATTACK in progress",
            "malware quarantined",
            "nothing suspicious here",
        ];
        for text in texts {
            assert_eq!(
                forward.contains_match(text),
                reversed.contains_match(text),
                "order-dependent result for: {text}"
            );
        }
    }

    #[test]
    fn deterministic_across_calls() {
        let matcher = matcher_of(&["unauthorized access"]);
        let text = "Unauthorized access detected in server logs";
        assert!(matcher.contains_match(text));
        assert!(matcher.contains_match(text));
        assert!(matcher.contains_match(text));
    }

    #[test]
    fn unicode_patterns_match() {
        let matcher = matcher_of(&["권한 없는 접근"]);
        assert!(matcher.contains_match("경고: 권한 없는 접근 시도"));
    }

    #[test]
    fn final_sigma_pattern_matches_its_own_text() {
        // 어말 대문자 시그마: 스토어 정규화와 텍스트 걷기가
        // 같은 문자 단위 접기를 써야 자기 자신과 매칭됩니다.
        let matcher = matcher_of(&["ΑΣ"]);
        assert!(matcher.contains_match("ΑΣ"));
        assert!(matcher.contains_match("ασ"));
        assert!(matcher.contains_match("log: ΛΑΣ flagged"));
    }

    #[test]
    fn matching_patterns_on_clean_text_is_empty() {
        let matcher = matcher_of(&["sql injection"]);
        assert!(matcher.matching_patterns("all good").is_empty());
    }

    #[test]
    fn matcher_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ThreatMatcher>();
    }

    // Property-based tests using proptest
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        /// 단순 스캔 기준 구현 -- 오토마톤과의 동치 비교에 사용
        fn naive_contains(store: &PatternStore, text: &str) -> bool {
            let lowered: String = text.chars().flat_map(char::to_lowercase).collect();
            store.iter().any(|p| lowered.contains(p))
        }

        proptest! {
            #[test]
            fn equivalent_to_naive_scan(
                patterns in prop::collection::vec("[abc]{1,4}", 0..6),
                text in "[abcABC ]{0,40}",
            ) {
                let store = PatternStore::from_iter(patterns.iter().map(String::as_str));
                let matcher = ThreatMatcher::build(&store);
                prop_assert_eq!(
                    matcher.contains_match(&text),
                    naive_contains(&store, &text)
                );
            }

            #[test]
            fn arbitrary_text_does_not_panic(text in "\\PC{0,200}") {
                let matcher = ThreatMatcher::build(&PatternStore::with_defaults());
                let _ = matcher.contains_match(&text);
            }

            #[test]
            fn every_pattern_matches_itself(pattern in "[a-z ]{1,20}") {
                let store = PatternStore::from_iter([pattern.as_str()]);
                let matcher = ThreatMatcher::build(&store);
                if !store.is_empty() {
                    prop_assert!(matcher.contains_match(&pattern));
                }
            }

            #[test]
            fn pattern_found_regardless_of_surrounding(
                prefix in "[x-z ]{0,10}",
                suffix in "[x-z ]{0,10}",
            ) {
                let matcher = ThreatMatcher::build(
                    &PatternStore::from_iter(["ddos attack"]),
                );
                let text = format!("{prefix}ddos attack{suffix}");
                prop_assert!(matcher.contains_match(&text));
            }
        }
    }
}
