//! End-to-end relevance engine tests over a realistic feed document

use std::collections::HashSet;

use cvepost_advisory::{CveFeed, ProductMatcher, RelevancePipeline, SeverityPolicy};

/// 원격 코드 실행 권고 하나를 담은 단일 레코드 피드
const E2E_FEED: &str = r#"{
    "CVE_Items": [
        {
            "cve": {
                "CVE_data_meta": { "ID": "CVE-2024-31337" },
                "description": {
                    "description_data": [
                        { "lang": "en", "value": "Widget allows remote attackers to execute arbitrary code." }
                    ]
                },
                "references": {
                    "reference_data": [
                        { "url": "https://example.org/advisories/31337" }
                    ]
                }
            },
            "impact": {
                "baseMetricV3": {
                    "cvssV3": {
                        "baseScore": 9.8,
                        "baseSeverity": "CRITICAL",
                        "vectorString": "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H"
                    }
                }
            },
            "configurations": {
                "nodes": [
                    {
                        "operator": "OR",
                        "cpe_match": [
                            { "vulnerable": true, "cpe23Uri": "cpe:2.3:a:acme:widget:1.0" }
                        ]
                    }
                ]
            },
            "publishedDate": "2024-06-02T14:00Z"
        }
    ]
}"#;

fn standard_pipeline() -> RelevancePipeline {
    RelevancePipeline::new(
        ProductMatcher::new(vec!["acme:widget".to_owned()]),
        SeverityPolicy::new(7.0, vec!["AV:N".to_owned()]),
    )
}

#[test]
fn first_run_notifies_matching_severe_record() {
    let feed = CveFeed::from_json(E2E_FEED).unwrap();
    let report = standard_pipeline().run(&feed, &HashSet::new());

    assert_eq!(report.notify_count(), 1);
    let advisory = &report.advisories[0];
    assert_eq!(advisory.id, "CVE-2024-31337");
    assert_eq!(advisory.score, 9.8);
    assert_eq!(advisory.matches, vec!["acme:widget"]);
    assert_eq!(advisory.vector[0], "AV:N");
}

#[test]
fn second_run_with_persisted_cache_notifies_nothing() {
    let feed = CveFeed::from_json(E2E_FEED).unwrap();
    let pipeline = standard_pipeline();

    let first = pipeline.run(&feed, &HashSet::new());
    assert_eq!(first.notify_count(), 1);

    // 첫 실행의 통지 집합이 캐시에 반영된 상태를 재현
    let seen: HashSet<String> = first.notify_ids().into_iter().collect();
    let second = pipeline.run(&feed, &seen);

    assert_eq!(second.notify_count(), 0);
    assert_eq!(second.already_notified, 1);
}

#[test]
fn two_runs_without_cache_mutation_agree() {
    let feed = CveFeed::from_json(E2E_FEED).unwrap();
    let pipeline = standard_pipeline();
    let seen = HashSet::new();

    let first = pipeline.run(&feed, &seen);
    let second = pipeline.run(&feed, &seen);
    assert_eq!(first.notify_ids(), second.notify_ids());
}

#[test]
fn unrelated_product_inventory_notifies_nothing() {
    let feed = CveFeed::from_json(E2E_FEED).unwrap();
    let pipeline = RelevancePipeline::new(
        ProductMatcher::new(vec!["initech:tps".to_owned()]),
        SeverityPolicy::new(7.0, vec![]),
    );
    let report = pipeline.run(&feed, &HashSet::new());
    assert_eq!(report.matched_records, 0);
    assert_eq!(report.notify_count(), 0);
}

#[test]
fn vector_requirement_gates_admission() {
    let feed = CveFeed::from_json(E2E_FEED).unwrap();
    // AV:P (물리 접근)는 이 레코드의 벡터에 없으므로 거부되어야 합니다.
    let pipeline = RelevancePipeline::new(
        ProductMatcher::new(vec!["acme:widget".to_owned()]),
        SeverityPolicy::new(7.0, vec!["AV:P".to_owned()]),
    );
    let report = pipeline.run(&feed, &HashSet::new());
    assert_eq!(report.notify_count(), 0);
    assert_eq!(report.below_policy, 1);
}
