//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`, `metrics::gauge!()`
//! 매크로를 호출합니다. 배치 작업이므로 HTTP 익스포터는 설치하지 않으며,
//! 레코더는 호스트 환경이 제공할 때만 동작합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `cvepost_`
//! - 모듈명: `feed_`, `relevance_`, `cache_`, `notify_`
//! - 접미어: `_total` (counter), 없음 (gauge)

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 심각도 레이블 키 (none, low, medium, high, critical)
pub const LABEL_SEVERITY: &str = "severity";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

// ─── Feed 메트릭 ───────────────────────────────────────────────────

/// Feed: 읽어들인 전체 레코드 수 (counter)
pub const FEED_RECORDS_TOTAL: &str = "cvepost_feed_records_total";

// ─── Relevance 파이프라인 메트릭 ───────────────────────────────────

/// Relevance: 제품 검색어에 매칭된 레코드 수 (counter)
pub const RELEVANCE_MATCHED_TOTAL: &str = "cvepost_relevance_matched_total";

/// Relevance: 추출 실패로 건너뛴 레코드 수 (counter)
pub const RELEVANCE_EXTRACTION_FAILURES_TOTAL: &str =
    "cvepost_relevance_extraction_failures_total";

/// Relevance: 심각도 정책을 통과한 권고 수 (counter, label: severity)
pub const RELEVANCE_SEVERE_TOTAL: &str = "cvepost_relevance_severe_total";

/// Relevance: 이미 통지되어 억제된 권고 수 (counter)
pub const RELEVANCE_SUPPRESSED_TOTAL: &str = "cvepost_relevance_suppressed_total";

// ─── Cache 메트릭 ──────────────────────────────────────────────────

/// Cache: 연도 경계 프루닝으로 제거된 식별자 수 (counter)
pub const CACHE_PRUNED_TOTAL: &str = "cvepost_cache_pruned_total";

/// Cache: 저장 시점의 캐시 엔트리 수 (gauge)
pub const CACHE_ENTRIES: &str = "cvepost_cache_entries";

// ─── Notify 메트릭 ─────────────────────────────────────────────────

/// Notify: 발송 시도 수 (counter, label: result)
pub const NOTIFY_DISPATCH_TOTAL: &str = "cvepost_notify_dispatch_total";

/// Notify: 다이제스트에 포함된 권고 수 (counter)
pub const NOTIFY_ADVISORIES_TOTAL: &str = "cvepost_notify_advisories_total";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
/// 레코더가 없으면 no-op입니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge};

    describe_counter!(FEED_RECORDS_TOTAL, "Total advisory records read from the feed");
    describe_counter!(
        RELEVANCE_MATCHED_TOTAL,
        "Records matching at least one configured product term"
    );
    describe_counter!(
        RELEVANCE_EXTRACTION_FAILURES_TOTAL,
        "Records skipped due to missing or malformed fields"
    );
    describe_counter!(
        RELEVANCE_SEVERE_TOTAL,
        "Advisories admitted by the severity policy"
    );
    describe_counter!(
        RELEVANCE_SUPPRESSED_TOTAL,
        "Advisories suppressed by the cross-run dedup cache"
    );
    describe_counter!(
        CACHE_PRUNED_TOTAL,
        "Identifiers discarded by year-bounded cache pruning"
    );
    describe_gauge!(CACHE_ENTRIES, "Cache entry count at persist time");
    describe_counter!(NOTIFY_DISPATCH_TOTAL, "Digest dispatch attempts by result");
    describe_counter!(
        NOTIFY_ADVISORIES_TOTAL,
        "Advisories included in dispatched digests"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_names_use_cvepost_prefix() {
        for name in [
            FEED_RECORDS_TOTAL,
            RELEVANCE_MATCHED_TOTAL,
            RELEVANCE_EXTRACTION_FAILURES_TOTAL,
            RELEVANCE_SEVERE_TOTAL,
            RELEVANCE_SUPPRESSED_TOTAL,
            CACHE_PRUNED_TOTAL,
            CACHE_ENTRIES,
            NOTIFY_DISPATCH_TOTAL,
            NOTIFY_ADVISORIES_TOTAL,
        ] {
            assert!(name.starts_with("cvepost_"), "{name} missing prefix");
        }
    }

    #[test]
    fn describe_all_without_recorder_is_noop() {
        // 전역 레코더가 없어도 패닉하지 않아야 합니다.
        describe_all();
    }
}
