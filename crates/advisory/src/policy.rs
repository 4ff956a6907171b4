//! 심각도 정책 -- 점수와 공격 벡터 기준의 알림 허용 판정
//!
//! [`SeverityPolicy`]는 추출된 권고의 순수 함수입니다. 설정(`min_score`,
//! `vector_required`)은 생성 시점에 명시적으로 주입되며 전역 상태를 읽지
//! 않습니다.

use cvepost_core::config::PolicyConfig;
use cvepost_core::types::Advisory;

/// 심각도 정책
///
/// 두 조건을 모두 만족해야 허용합니다:
/// 1. `vector_required`의 모든 문자열이 권고의 벡터 구성 요소 중 적어도
///    하나에 부분 문자열로 포함 (요구 목록이 비어 있으면 공진리로 통과)
/// 2. 점수가 `min_score` 이상
#[derive(Debug, Clone)]
pub struct SeverityPolicy {
    /// 알림 최소 CVSS 점수
    min_score: f64,
    /// 벡터에 반드시 포함되어야 하는 부분 문자열 목록
    vector_required: Vec<String>,
}

impl SeverityPolicy {
    /// 새 정책을 생성합니다.
    pub fn new(min_score: f64, vector_required: Vec<String>) -> Self {
        Self {
            min_score,
            vector_required,
        }
    }

    /// 설정 섹션에서 정책을 생성합니다.
    pub fn from_config(config: &PolicyConfig) -> Self {
        Self::new(config.min_score, config.vector_required.clone())
    }

    /// 최소 점수를 반환합니다.
    pub fn min_score(&self) -> f64 {
        self.min_score
    }

    /// 요구 벡터 부분 문자열 목록을 반환합니다.
    pub fn vector_required(&self) -> &[String] {
        &self.vector_required
    }

    /// 권고가 알림 기준을 만족하는지 판정합니다.
    pub fn is_severe(&self, advisory: &Advisory) -> bool {
        let vector_ok = self
            .vector_required
            .iter()
            .all(|req| advisory.vector.iter().any(|component| component.contains(req)));

        vector_ok && advisory.score >= self.min_score
    }
}
