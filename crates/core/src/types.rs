//! 도메인 타입 — 시스템 전역에서 사용되는 공통 타입
//!
//! 피드에서 추출된 권고(advisory)와 심각도 레벨을 정의합니다.
//! 추출 로직은 `cvepost-advisory`, 다이제스트 생성은 `cvepost-notify`에 있습니다.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 심각도 레벨
///
/// CVSS v3 `baseSeverity` 라벨에 대응합니다.
/// `Ord` 구현으로 심각도 비교가 가능합니다 (`None < Low < Medium < High < Critical`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Severity {
    /// 심각도 없음 (CVSS NONE)
    #[default]
    None,
    /// 낮은 심각도
    Low,
    /// 중간 심각도
    Medium,
    /// 높은 심각도
    High,
    /// 치명적 — 즉시 대응 필요
    Critical,
}

impl Severity {
    /// 문자열에서 심각도를 파싱합니다.
    ///
    /// 대소문자를 구분하지 않습니다. 피드의 `baseSeverity` 필드가
    /// 대문자(`"HIGH"`)로 오기 때문입니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(Self::None),
            "low" => Some(Self::Low),
            "medium" | "med" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" | "crit" => Some(Self::Critical),
            _ => None,
        }
    }

    /// 다이제스트 출력용 대문자 라벨을 반환합니다 (CVSS 표기).
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// 추출된 권고
///
/// 피드의 원본 레코드에서 다이제스트 생성에 필요한 필드만 뽑아낸
/// 정규화 뷰입니다. 생성 후 변경되지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advisory {
    /// 권고 식별자 (예: CVE-2024-1234)
    pub id: String,
    /// CVSS v3 기본 점수
    pub score: f64,
    /// 심각도 라벨
    pub severity: Severity,
    /// 공격 벡터 구성 요소 (벡터 문자열을 `/`로 분리, 버전 접두어 제외)
    pub vector: Vec<String>,
    /// 설명 목록 (`"{본문} ({언어})"` 형식)
    pub descriptions: Vec<String>,
    /// 참조 URL 목록
    pub urls: Vec<String>,
    /// 공개 시각
    pub published: DateTime<Utc>,
    /// 매칭된 제품 검색어 목록
    ///
    /// 설정된 모든 검색어를 설정 트리 전체에 대해 독립적으로 재평가한
    /// 부분집합입니다. 포함 여부를 결정한 검색어 하나만 담지 않습니다.
    pub matches: Vec<String>,
}

impl Advisory {
    /// 벡터 구성 요소를 `/`로 이어 붙인 문자열을 반환합니다.
    pub fn vector_string(&self) -> String {
        self.vector.join("/")
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] score={} products={}",
            self.id,
            self.severity,
            self.score,
            self.matches.join(", "),
        )
    }
}
