//! 관련성 파이프라인 -- 피드 전체를 알림 대상 권고 목록으로 좁히는 단계
//!
//! 단계 순서 (각 단계는 전체 순회, 조기 종료 없음):
//!
//! 1. 프리필터: 설정된 제품 검색어 중 하나라도 설정 트리에 매칭되는
//!    레코드만 통과 (본격 추출 전의 저렴한 필터)
//! 2. 추출: 통과한 레코드를 [`Advisory`]로 정규화. 실패한 레코드는
//!    건너뛰고 집계 (치명적이지 않음)
//! 3. 심각도 필터: [`SeverityPolicy`] 통과분만 유지
//! 4. 중복 억제: 이미 통지된 식별자(`seen`)와 같은 실행 내에서 이미
//!    방출된 식별자를 제거
//!
//! 출력 순서는 피드의 레코드 순서를 유지합니다.

use std::collections::HashSet;

use metrics::counter;
use serde::Serialize;
use tracing::{debug, info, warn};

use cvepost_core::config::CvepostConfig;
use cvepost_core::metrics as metric_names;
use cvepost_core::types::Advisory;

use crate::extract::extract;
use crate::feed::CveFeed;
use crate::matcher::ProductMatcher;
use crate::policy::SeverityPolicy;

/// 한 번의 배치 실행 결과
///
/// 알림 대상 권고 목록과 단계별 집계를 담습니다.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// 실행 고유 ID
    pub run_id: String,
    /// 알림 대상 권고 (피드 순서 유지)
    pub advisories: Vec<Advisory>,
    /// 피드의 전체 레코드 수
    pub total_records: usize,
    /// 제품 검색어에 매칭된 레코드 수
    pub matched_records: usize,
    /// 추출 실패로 건너뛴 레코드 수
    pub extraction_failures: usize,
    /// 심각도 정책에 미달한 권고 수
    pub below_policy: usize,
    /// 이전 실행에서 이미 통지되어 억제된 권고 수
    pub already_notified: usize,
    /// 같은 실행 내 중복 식별자로 억제된 권고 수
    pub duplicate_ids: usize,
}

impl RunReport {
    /// 알림 대상 권고 수를 반환합니다.
    pub fn notify_count(&self) -> usize {
        self.advisories.len()
    }

    /// 알림 대상 권고의 식별자 목록을 반환합니다.
    pub fn notify_ids(&self) -> Vec<String> {
        self.advisories.iter().map(|a| a.id.clone()).collect()
    }
}

/// 관련성 파이프라인
///
/// 제품 매처와 심각도 정책을 보유하고 피드 단위 실행을 제공합니다.
/// 설정은 생성 시점에 명시적으로 주입됩니다.
#[derive(Debug, Clone)]
pub struct RelevancePipeline {
    /// 제품 매처
    matcher: ProductMatcher,
    /// 심각도 정책
    policy: SeverityPolicy,
}

impl RelevancePipeline {
    /// 새 파이프라인을 생성합니다.
    pub fn new(matcher: ProductMatcher, policy: SeverityPolicy) -> Self {
        Self { matcher, policy }
    }

    /// 통합 설정에서 파이프라인을 생성합니다.
    pub fn from_config(config: &CvepostConfig) -> Self {
        Self::new(
            ProductMatcher::new(config.policy.products.clone()),
            SeverityPolicy::from_config(&config.policy),
        )
    }

    /// 제품 매처를 반환합니다.
    pub fn matcher(&self) -> &ProductMatcher {
        &self.matcher
    }

    /// 피드 전체를 실행하여 알림 대상 권고를 결정합니다.
    ///
    /// `seen`은 이전 실행에서 이미 통지된 식별자 집합입니다.
    /// 순수 평가만 수행하며 캐시 갱신은 호출자의 몫입니다.
    pub fn run(&self, feed: &CveFeed, seen: &HashSet<String>) -> RunReport {
        let run_id = uuid::Uuid::new_v4().to_string();
        let total_records = feed.record_count();

        counter!(metric_names::FEED_RECORDS_TOTAL).increment(total_records as u64);

        let mut advisories = Vec::new();
        let mut emitted: HashSet<String> = HashSet::new();
        let mut matched_records = 0usize;
        let mut extraction_failures = 0usize;
        let mut below_policy = 0usize;
        let mut already_notified = 0usize;
        let mut duplicate_ids = 0usize;

        for item in &feed.items {
            if !self.matcher.matches_any(item) {
                continue;
            }
            matched_records += 1;
            counter!(metric_names::RELEVANCE_MATCHED_TOTAL).increment(1);

            let advisory = match extract(item, self.matcher.terms()) {
                Ok(advisory) => advisory,
                Err(e) => {
                    warn!(error = %e, "failed to extract record, skipping");
                    extraction_failures += 1;
                    counter!(metric_names::RELEVANCE_EXTRACTION_FAILURES_TOTAL).increment(1);
                    continue;
                }
            };

            if !self.policy.is_severe(&advisory) {
                debug!(id = %advisory.id, score = advisory.score, "below severity policy");
                below_policy += 1;
                continue;
            }
            counter!(
                metric_names::RELEVANCE_SEVERE_TOTAL,
                metric_names::LABEL_SEVERITY => advisory.severity.as_label().to_lowercase(),
            )
            .increment(1);

            if seen.contains(&advisory.id) {
                debug!(id = %advisory.id, "already notified in a prior run");
                already_notified += 1;
                counter!(metric_names::RELEVANCE_SUPPRESSED_TOTAL).increment(1);
                continue;
            }

            // 피드에 중복 식별자가 있어도 한 실행에서 두 번 통지하지 않습니다.
            if !emitted.insert(advisory.id.clone()) {
                warn!(id = %advisory.id, "duplicate identifier within one feed, keeping first");
                duplicate_ids += 1;
                continue;
            }

            advisories.push(advisory);
        }

        info!(
            run_id = %run_id,
            total = total_records,
            matched = matched_records,
            skipped = extraction_failures,
            notify = advisories.len(),
            "relevance pipeline finished"
        );

        RunReport {
            run_id,
            advisories,
            total_records,
            matched_records,
            extraction_failures,
            below_policy,
            already_notified,
            duplicate_ids,
        }
    }
}
