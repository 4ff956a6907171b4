//! 설정 트리 평가기 -- 제품 검색어와 영향 플랫폼 논리식의 매칭
//!
//! [`node_matches`]는 (노드, 검색어)의 순수 함수입니다. 외부 상태를 읽지
//! 않고 에러를 내지 않으므로 독립적으로 테스트할 수 있습니다.
//!
//! # 평가 규칙
//!
//! 1. 자식 노드를 재귀 평가한 결과와, 이 노드에 직접 달린 CPE 매치
//!    리프의 결과(`vulnerable`이고 식별자가 검색어를 포함하면 true)를
//!    하나의 목록으로 모읍니다.
//! 2. `operator`가 `"OR"`이면 하나라도 true일 때, 그 외에는 전부 true일
//!    때 결합 결과가 true입니다.
//! 3. 목록이 비어 있으면(자식도 리프도 없는 노드) 결합 결과는 false입니다.
//!    단정 없는 노드는 스스로 매칭을 성립시킬 수 없습니다.
//! 4. `negate`가 true이면 결합 결과를 반전합니다.

use crate::feed::{ConfigNode, CveItem};

/// 노드 결합 연산자
///
/// `"OR"`만 OR로 해석하고, 부재를 포함한 그 외의 모든 값은 AND로
/// 해석합니다 (잘못된 연산자 값은 조용히 AND로 동작).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Operator {
    /// 모든 결과가 true여야 매칭
    #[default]
    And,
    /// 하나라도 true이면 매칭
    Or,
}

impl Operator {
    /// 노드의 원본 연산자 값에서 연산자를 결정합니다.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("OR") => Self::Or,
            _ => Self::And,
        }
    }
}

/// 설정 트리 노드를 검색어에 대해 평가합니다.
///
/// 부수 효과와 에러가 없는 순수 함수입니다.
pub fn node_matches(node: &ConfigNode, term: &str) -> bool {
    let mut results: Vec<bool> = Vec::with_capacity(node.children.len() + node.cpe_match.len());

    for child in &node.children {
        results.push(node_matches(child, term));
    }
    for leaf in &node.cpe_match {
        results.push(leaf.vulnerable && leaf.cpe23_uri.contains(term));
    }

    // 빈 목록은 false: 단정 없는 노드는 매칭을 성립시키지 않습니다.
    let combined = if results.is_empty() {
        false
    } else {
        match Operator::from_raw(node.operator.as_deref()) {
            Operator::Or => results.iter().any(|r| *r),
            Operator::And => results.iter().all(|r| *r),
        }
    };

    if node.negate { !combined } else { combined }
}

/// 레코드의 설정 트리가 검색어에 매칭되는지 평가합니다.
///
/// 루트 노드가 여러 개이면 하나라도 매칭될 때 true입니다 (루트 수준 OR).
/// 설정 트리가 없거나 루트가 없는 레코드는 어떤 검색어에도 매칭되지
/// 않습니다.
pub fn record_matches(item: &CveItem, term: &str) -> bool {
    item.root_nodes().iter().any(|node| node_matches(node, term))
}

/// 제품 매처
///
/// 설정된 제품 검색어 목록을 보유하고 레코드 단위 매칭 질의를 제공합니다.
/// 검색어는 프로세스 수명 동안 변경되지 않습니다.
#[derive(Debug, Clone)]
pub struct ProductMatcher {
    /// 제품 검색어 목록 (설정 순서 유지)
    terms: Vec<String>,
}

impl ProductMatcher {
    /// 새 매처를 생성합니다.
    pub fn new(terms: Vec<String>) -> Self {
        Self { terms }
    }

    /// 검색어 목록을 반환합니다.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// 검색어가 하나도 설정되지 않았는지 여부를 반환합니다.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// 설정된 검색어 중 하나라도 레코드에 매칭되는지 평가합니다.
    ///
    /// 전체 추출에 앞서 수행하는 저렴한 프리필터입니다.
    pub fn matches_any(&self, item: &CveItem) -> bool {
        self.terms.iter().any(|term| record_matches(item, term))
    }

    /// 레코드에 매칭되는 검색어의 부분집합을 반환합니다.
    ///
    /// 모든 검색어를 트리 전체에 대해 독립적으로 재평가합니다.
    /// 포함을 결정한 검색어 하나만 반환하지 않습니다.
    pub fn matching_products(&self, item: &CveItem) -> Vec<String> {
        self.terms
            .iter()
            .filter(|term| record_matches(item, term))
            .cloned()
            .collect()
    }
}
