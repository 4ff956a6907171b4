//! 권고 추출 -- 원본 레코드를 [`Advisory`]로 정규화
//!
//! 필수 중첩 필드가 빠진 레코드는 [`AdvisoryError::MissingField`] /
//! [`AdvisoryError::InvalidField`]로 실패합니다. 한 레코드의 추출 실패는
//! 배치 전체를 중단시키지 않습니다. 파이프라인이 해당 레코드를 건너뛰고
//! 집계합니다.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use cvepost_core::types::{Advisory, Severity};

use crate::error::AdvisoryError;
use crate::feed::{CveItem, CvssV3};
use crate::matcher::record_matches;

/// 식별자가 없는 레코드의 로깅/에러용 표기
const UNKNOWN_ID: &str = "<unknown>";

/// 원본 레코드에서 정규화된 권고를 추출합니다.
///
/// `matches` 필드는 설정된 모든 제품 검색어를 레코드의 설정 트리 전체에
/// 대해 독립적으로 재평가한 부분집합입니다.
pub fn extract(item: &CveItem, products: &[String]) -> Result<Advisory, AdvisoryError> {
    let cve = item.cve.as_ref().ok_or(AdvisoryError::MissingField {
        id: UNKNOWN_ID.to_owned(),
        field: "cve",
    })?;

    let id = cve
        .data_meta
        .as_ref()
        .and_then(|m| m.id.as_deref())
        .ok_or(AdvisoryError::MissingField {
            id: UNKNOWN_ID.to_owned(),
            field: "cve.CVE_data_meta.ID",
        })?
        .to_owned();

    let cvss = cvss_v3(item, &id)?;

    let score = cvss.base_score.ok_or(AdvisoryError::MissingField {
        id: id.clone(),
        field: "impact.baseMetricV3.cvssV3.baseScore",
    })?;

    let severity_raw =
        cvss.base_severity
            .as_deref()
            .ok_or(AdvisoryError::MissingField {
                id: id.clone(),
                field: "impact.baseMetricV3.cvssV3.baseSeverity",
            })?;
    let severity =
        Severity::from_str_loose(severity_raw).ok_or_else(|| AdvisoryError::InvalidField {
            id: id.clone(),
            field: "impact.baseMetricV3.cvssV3.baseSeverity",
            value: severity_raw.to_owned(),
        })?;

    let vector_string =
        cvss.vector_string
            .as_deref()
            .ok_or(AdvisoryError::MissingField {
                id: id.clone(),
                field: "impact.baseMetricV3.cvssV3.vectorString",
            })?;
    // 첫 요소는 버전 접두어(CVSS:3.x)이므로 버립니다.
    let vector: Vec<String> = vector_string
        .split('/')
        .skip(1)
        .map(str::to_owned)
        .collect();

    let descriptions: Vec<String> = cve
        .description
        .as_ref()
        .ok_or(AdvisoryError::MissingField {
            id: id.clone(),
            field: "cve.description",
        })?
        .description_data
        .iter()
        .map(|d| format!("{} ({})", d.value, d.lang))
        .collect();

    let urls: Vec<String> = cve
        .references
        .as_ref()
        .ok_or(AdvisoryError::MissingField {
            id: id.clone(),
            field: "cve.references",
        })?
        .reference_data
        .iter()
        .map(|r| r.url.clone())
        .collect();

    let published_raw =
        item.published_date
            .as_deref()
            .ok_or(AdvisoryError::MissingField {
                id: id.clone(),
                field: "publishedDate",
            })?;
    let published =
        parse_published(published_raw).ok_or_else(|| AdvisoryError::InvalidField {
            id: id.clone(),
            field: "publishedDate",
            value: published_raw.to_owned(),
        })?;

    let matches: Vec<String> = products
        .iter()
        .filter(|term| record_matches(item, term))
        .cloned()
        .collect();

    Ok(Advisory {
        id,
        score,
        severity,
        vector,
        descriptions,
        urls,
        published,
        matches,
    })
}

fn cvss_v3<'a>(item: &'a CveItem, id: &str) -> Result<&'a CvssV3, AdvisoryError> {
    item.impact
        .as_ref()
        .and_then(|i| i.base_metric_v3.as_ref())
        .and_then(|m| m.cvss_v3.as_ref())
        .ok_or(AdvisoryError::MissingField {
            id: id.to_owned(),
            field: "impact.baseMetricV3.cvssV3",
        })
}

/// 공개 시각 문자열을 파싱합니다.
///
/// RFC 3339와 NVD 피드의 분 단위 표기(`2024-01-15T10:30Z`)를 받습니다.
fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%MZ") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn sample_item() -> CveItem {
        let json = r#"{
            "cve": {
                "CVE_data_meta": { "ID": "CVE-2024-1234" },
                "description": {
                    "description_data": [
                        { "lang": "en", "value": "Remote code execution." },
                        { "lang": "es", "value": "Ejecución remota de código." }
                    ]
                },
                "references": {
                    "reference_data": [
                        { "url": "https://example.org/advisory/1234" },
                        { "url": "https://example.org/patch/1234" }
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
                "nodes": [{
                    "operator": "OR",
                    "cpe_match": [
                        { "vulnerable": true, "cpe23Uri": "cpe:2.3:a:acme:widget:1.0" }
                    ]
                }]
            },
            "publishedDate": "2024-01-15T10:30Z"
        }"#;
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn extracts_all_fields() {
        let products = vec!["acme:widget".to_owned(), "initech:tps".to_owned()];
        let advisory = extract(&sample_item(), &products).unwrap();

        assert_eq!(advisory.id, "CVE-2024-1234");
        assert_eq!(advisory.score, 9.8);
        assert_eq!(advisory.severity, cvepost_core::types::Severity::Critical);
        assert_eq!(advisory.published.year(), 2024);
        assert_eq!(advisory.published.month(), 1);
        assert_eq!(advisory.published.day(), 15);
        assert_eq!(advisory.urls.len(), 2);
        assert_eq!(advisory.matches, vec!["acme:widget"]);
    }

    #[test]
    fn vector_drops_version_prefix() {
        let advisory = extract(&sample_item(), &[]).unwrap();
        assert_eq!(advisory.vector[0], "AV:N");
        assert!(!advisory.vector.iter().any(|c| c.starts_with("CVSS")));
        assert_eq!(advisory.vector.len(), 8);
    }

    #[test]
    fn descriptions_carry_language_tag() {
        let advisory = extract(&sample_item(), &[]).unwrap();
        assert_eq!(advisory.descriptions[0], "Remote code execution. (en)");
        assert_eq!(
            advisory.descriptions[1],
            "Ejecución remota de código. (es)"
        );
    }

    #[test]
    fn missing_cve_block_fails_with_unknown_marker() {
        let item = CveItem::default();
        let err = extract(&item, &[]).unwrap_err();
        match err {
            AdvisoryError::MissingField { id, field } => {
                assert_eq!(id, "<unknown>");
                assert_eq!(field, "cve");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn missing_id_fails_with_unknown_marker() {
        let mut item = sample_item();
        item.cve.as_mut().unwrap().data_meta = None;
        let err = extract(&item, &[]).unwrap_err();
        match err {
            AdvisoryError::MissingField { id, field } => {
                assert_eq!(id, "<unknown>");
                assert_eq!(field, "cve.CVE_data_meta.ID");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn missing_cvss_block_fails() {
        let mut item = sample_item();
        item.impact = None;
        let err = extract(&item, &[]).unwrap_err();
        match err {
            AdvisoryError::MissingField { id, field } => {
                assert_eq!(id, "CVE-2024-1234");
                assert_eq!(field, "impact.baseMetricV3.cvssV3");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn missing_score_fails() {
        let mut item = sample_item();
        item.impact
            .as_mut()
            .unwrap()
            .base_metric_v3
            .as_mut()
            .unwrap()
            .cvss_v3
            .as_mut()
            .unwrap()
            .base_score = None;
        let err = extract(&item, &[]).unwrap_err();
        assert!(err.to_string().contains("baseScore"));
    }

    #[test]
    fn invalid_severity_label_fails() {
        let mut item = sample_item();
        item.impact
            .as_mut()
            .unwrap()
            .base_metric_v3
            .as_mut()
            .unwrap()
            .cvss_v3
            .as_mut()
            .unwrap()
            .base_severity = Some("CATASTROPHIC".to_owned());
        let err = extract(&item, &[]).unwrap_err();
        assert!(matches!(err, AdvisoryError::InvalidField { .. }));
        assert!(err.to_string().contains("CATASTROPHIC"));
    }

    #[test]
    fn missing_description_block_fails() {
        let mut item = sample_item();
        item.cve.as_mut().unwrap().description = None;
        let err = extract(&item, &[]).unwrap_err();
        assert!(err.to_string().contains("cve.description"));
    }

    #[test]
    fn missing_references_block_fails() {
        let mut item = sample_item();
        item.cve.as_mut().unwrap().references = None;
        let err = extract(&item, &[]).unwrap_err();
        assert!(err.to_string().contains("cve.references"));
    }

    #[test]
    fn unparseable_date_fails() {
        let mut item = sample_item();
        item.published_date = Some("yesterday".to_owned());
        let err = extract(&item, &[]).unwrap_err();
        assert!(matches!(
            err,
            AdvisoryError::InvalidField {
                field: "publishedDate",
                ..
            }
        ));
    }

    #[test]
    fn rfc3339_date_is_accepted() {
        let mut item = sample_item();
        item.published_date = Some("2024-01-15T10:30:00+00:00".to_owned());
        let advisory = extract(&item, &[]).unwrap();
        assert_eq!(advisory.published.year(), 2024);
    }

    #[test]
    fn no_matching_products_yields_empty_matches() {
        let products = vec!["globex:rocket".to_owned()];
        let advisory = extract(&sample_item(), &products).unwrap();
        assert!(advisory.matches.is_empty());
    }

    #[test]
    fn matches_computed_from_full_tree_per_term() {
        // 두 검색어 모두 같은 트리에 매칭: 둘 다 결과에 나타나야 합니다.
        let products = vec!["acme".to_owned(), "acme:widget".to_owned()];
        let advisory = extract(&sample_item(), &products).unwrap();
        assert_eq!(advisory.matches, vec!["acme", "acme:widget"]);
    }
}
