//! 다이제스트 생성 -- 알림 대상 권고의 78컬럼 텍스트 요약
//!
//! 레이아웃 (권고당 하나의 블록):
//!
//! ```text
//! ------------------------------------------------------------------------------
//! CVE-2024-1234 | 2024-06-02 | CRITICAL | 9.8 | AV:N/AC:L/PR:N/...
//! ACME WIDGET, INITECH TPS
//! ------------------------------------------------------------------------------
//! 78컬럼으로 줄바꿈된 설명 (en)
//!
//! https://example.org/advisory/1234
//! ```
//!
//! 본문 머리에는 적용된 정책(최소 점수, 요구 벡터)이, 꼬리에는 설정된
//! 제품 검색어 목록이 붙습니다.

use chrono::NaiveDate;

use cvepost_core::config::CvepostConfig;
use cvepost_core::types::Advisory;

/// 구분선/줄바꿈 기준 컬럼 폭
const COLUMNS: usize = 78;

/// 생성된 다이제스트
///
/// 제목과 본문만 담습니다. 수신자 결정과 전송은 [`crate::mail`]의 몫입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    /// 메일 제목
    pub subject: String,
    /// 본문 전체
    pub body: String,
}

/// 다이제스트 포매터
///
/// 적용된 정책과 제품 목록을 보유하여 머리/꼬리 문단을 생성합니다.
#[derive(Debug, Clone)]
pub struct DigestFormatter {
    /// 알림 최소 점수 (머리 문단 표기용)
    min_score: f64,
    /// 요구 벡터 부분 문자열 (머리 문단 표기용)
    vector_required: Vec<String>,
    /// 설정된 제품 검색어 (꼬리 문단 표기용)
    products: Vec<String>,
    /// 제목 접두어
    subject_prefix: String,
}

impl DigestFormatter {
    /// 새 포매터를 생성합니다.
    pub fn new(
        min_score: f64,
        vector_required: Vec<String>,
        products: Vec<String>,
        subject_prefix: String,
    ) -> Self {
        Self {
            min_score,
            vector_required,
            products,
            subject_prefix,
        }
    }

    /// 통합 설정에서 포매터를 생성합니다.
    pub fn from_config(config: &CvepostConfig) -> Self {
        Self::new(
            config.policy.min_score,
            config.policy.vector_required.clone(),
            config.policy.products.clone(),
            config.notify.subject_prefix.clone(),
        )
    }

    /// 권고 목록을 다이제스트로 렌더링합니다.
    ///
    /// `today`는 제목의 날짜 표기에 쓰입니다. 테스트 가능성을 위해
    /// 호출자가 주입합니다.
    pub fn render(&self, advisories: &[Advisory], today: NaiveDate) -> Digest {
        let subject = format!(
            "{} Relevant security advisories {}",
            self.subject_prefix,
            today.format("%Y-%m-%d"),
        );

        let header = format!(
            "This is a summary of all new CVE advisories relevant to the \
             infrastructure, with a base score of at least {} and an attack \
             vector containing {}",
            self.min_score,
            self.vector_required.join("/"),
        );

        let blocks: Vec<String> = advisories.iter().map(|a| self.format_advisory(a)).collect();

        let footer = format!(
            "Infrastructure matches used:\n\n{}",
            self.products
                .iter()
                .map(|p| format!("- {p}"))
                .collect::<Vec<_>>()
                .join("\n"),
        );

        let body = format!("{header}\n\n\n{}\n\n\n{footer}\n", blocks.join("\n\n"));

        Digest { subject, body }
    }

    fn format_advisory(&self, advisory: &Advisory) -> String {
        let rule = "-".repeat(COLUMNS);

        let mut lines = Vec::new();
        lines.push(rule.clone());
        lines.push(
            [
                advisory.id.clone(),
                advisory.published.format("%Y-%m-%d").to_string(),
                advisory.severity.as_label().to_owned(),
                advisory.score.to_string(),
                advisory.vector_string(),
            ]
            .join(" | "),
        );
        lines.push(
            advisory
                .matches
                .iter()
                .map(|p| format_product(p))
                .collect::<Vec<_>>()
                .join(", "),
        );
        lines.push(rule);

        for description in &advisory.descriptions {
            lines.push(wrap(description, COLUMNS));
        }

        lines.push(String::new());
        lines.extend(advisory.urls.iter().cloned());

        lines.join("\n")
    }
}

/// 제품 검색어를 표시용으로 변환합니다.
///
/// CPE 구분자(`:`, `_`)를 공백으로 바꾸고 다듬은 뒤 대문자화합니다.
/// 예: `acme:widget_pro` → `ACME WIDGET PRO`
fn format_product(term: &str) -> String {
    term.replace([':', '_'], " ").trim().to_uppercase()
}

/// 단어 단위 greedy 줄바꿈.
///
/// `width`보다 긴 단어는 자르지 않고 한 줄을 통째로 차지합니다.
fn wrap(text: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_owned();
        } else if current.len() + 1 + word.len() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_owned();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines.join("\n")
}
