//! 피드 데이터 모델 -- NVD JSON 1.1 피드 파싱
//!
//! 피드 문서는 처리 시작 전에 전체가 메모리로 읽힙니다 (스트리밍 없음).
//! 레코드의 중첩 필드는 모두 `Option`/기본값으로 선언되어 있어, 일부
//! 필드가 빠진 레코드가 있어도 피드 파싱 자체는 실패하지 않습니다.
//! 필드 누락은 추출 단계([`crate::extract`])에서 레코드 단위 에러가 됩니다.
//!
//! # JSON 형식
//!
//! ```json
//! {
//!   "CVE_Items": [
//!     {
//!       "cve": {
//!         "CVE_data_meta": { "ID": "CVE-2024-1234" },
//!         "description": { "description_data": [{ "lang": "en", "value": "..." }] },
//!         "references": { "reference_data": [{ "url": "https://..." }] }
//!       },
//!       "impact": {
//!         "baseMetricV3": {
//!           "cvssV3": { "baseScore": 9.8, "baseSeverity": "CRITICAL",
//!                       "vectorString": "CVSS:3.1/AV:N/AC:L/..." }
//!         }
//!       },
//!       "configurations": { "nodes": [ ... ] },
//!       "publishedDate": "2024-01-15T10:30Z"
//!     }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AdvisoryError;

/// 권고 피드 문서
///
/// 피드의 최상위 구조입니다. 레코드 순서는 입력 순서 그대로 유지됩니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CveFeed {
    /// 원본 권고 레코드 목록
    #[serde(rename = "CVE_Items", default)]
    pub items: Vec<CveItem>,
}

impl CveFeed {
    /// JSON 문자열에서 피드를 파싱합니다.
    pub fn from_json(json: &str) -> Result<Self, AdvisoryError> {
        serde_json::from_str(json).map_err(|e| AdvisoryError::FeedParse(e.to_string()))
    }

    /// 파일에서 피드를 로드합니다.
    ///
    /// 읽기 전에 파일 크기가 `max_bytes`를 넘지 않는지 확인합니다.
    ///
    /// # Note
    ///
    /// 이 함수는 동기 I/O를 수행합니다. async 컨텍스트에서 호출할 때는
    /// `tokio::task::spawn_blocking`으로 감싸세요.
    pub fn load_from_path(path: &Path, max_bytes: usize) -> Result<Self, AdvisoryError> {
        let metadata = std::fs::metadata(path).map_err(|e| AdvisoryError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if size > max_bytes {
            return Err(AdvisoryError::FeedTooLarge {
                size,
                max: max_bytes,
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| AdvisoryError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_json(&content)
    }

    /// 피드 내 레코드 수를 반환합니다.
    pub fn record_count(&self) -> usize {
        self.items.len()
    }
}

/// 원본 권고 레코드
///
/// 피드의 입력 단위입니다. 외부에서 공급되며 변경되지 않습니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CveItem {
    /// CVE 메타데이터 (식별자, 설명, 참조)
    pub cve: Option<CveMeta>,
    /// CVSS 영향 지표
    pub impact: Option<Impact>,
    /// 영향 플랫폼 설정 트리
    pub configurations: Option<Configurations>,
    /// 공개 시각 (ISO 8601)
    #[serde(rename = "publishedDate")]
    pub published_date: Option<String>,
}

impl CveItem {
    /// 레코드 식별자를 반환합니다 (로깅용).
    pub fn id(&self) -> Option<&str> {
        self.cve
            .as_ref()?
            .data_meta
            .as_ref()?
            .id
            .as_deref()
    }

    /// 설정 트리의 루트 노드 목록을 반환합니다 (없으면 빈 슬라이스).
    pub fn root_nodes(&self) -> &[ConfigNode] {
        self.configurations
            .as_ref()
            .map(|c| c.nodes.as_slice())
            .unwrap_or(&[])
    }
}

/// CVE 메타데이터 블록
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CveMeta {
    /// 식별자 컨테이너
    #[serde(rename = "CVE_data_meta")]
    pub data_meta: Option<DataMeta>,
    /// 설명 컨테이너
    pub description: Option<Description>,
    /// 참조 컨테이너
    pub references: Option<References>,
}

/// 식별자 컨테이너
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataMeta {
    /// 권고 식별자 (예: CVE-2024-1234)
    #[serde(rename = "ID")]
    pub id: Option<String>,
}

/// 설명 컨테이너
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Description {
    /// 언어별 설명 엔트리
    #[serde(default)]
    pub description_data: Vec<DescriptionData>,
}

/// 언어별 설명 엔트리
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DescriptionData {
    /// 언어 태그 (예: en)
    #[serde(default)]
    pub lang: String,
    /// 설명 본문
    #[serde(default)]
    pub value: String,
}

/// 참조 컨테이너
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct References {
    /// 참조 엔트리
    #[serde(default)]
    pub reference_data: Vec<ReferenceData>,
}

/// 참조 엔트리
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceData {
    /// 참조 URL
    #[serde(default)]
    pub url: String,
}

/// CVSS 영향 지표 블록
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Impact {
    /// CVSS v3 지표
    #[serde(rename = "baseMetricV3")]
    pub base_metric_v3: Option<BaseMetricV3>,
}

/// CVSS v3 지표 컨테이너
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaseMetricV3 {
    /// CVSS v3 본문
    #[serde(rename = "cvssV3")]
    pub cvss_v3: Option<CvssV3>,
}

/// CVSS v3 본문
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CvssV3 {
    /// 기본 점수 (0.0 ~ 10.0)
    #[serde(rename = "baseScore")]
    pub base_score: Option<f64>,
    /// 심각도 라벨 (NONE, LOW, MEDIUM, HIGH, CRITICAL)
    #[serde(rename = "baseSeverity")]
    pub base_severity: Option<String>,
    /// 벡터 문자열 (예: CVSS:3.1/AV:N/AC:L/...)
    #[serde(rename = "vectorString")]
    pub vector_string: Option<String>,
}

/// 영향 플랫폼 설정 컨테이너
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Configurations {
    /// 루트 설정 노드 목록
    #[serde(default)]
    pub nodes: Vec<ConfigNode>,
}

/// 설정 트리 노드
///
/// 영향 플랫폼에 대한 논리식을 표현합니다. 하나의 노드가 자식 노드와
/// CPE 매치 리프를 동시에 가질 수 있습니다. 레코드 평가마다 새로
/// 구성되고 버려지는 일시적 구조입니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigNode {
    /// 결합 연산자 ("AND"/"OR"; 부재 또는 그 외 값은 AND로 해석)
    pub operator: Option<String>,
    /// 결합 결과의 부정 여부
    #[serde(default)]
    pub negate: bool,
    /// 자식 노드 목록
    #[serde(default)]
    pub children: Vec<ConfigNode>,
    /// CPE 매치 리프 목록
    #[serde(default)]
    pub cpe_match: Vec<CpeMatch>,
}

/// CPE 매치 리프
///
/// 하나의 구체적인 플랫폼 단정입니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CpeMatch {
    /// 해당 플랫폼이 취약한지 여부
    #[serde(default)]
    pub vulnerable: bool,
    /// 플랫폼 식별자 (CPE 2.3 URI)
    #[serde(rename = "cpe23Uri", default)]
    pub cpe23_uri: String,
}
