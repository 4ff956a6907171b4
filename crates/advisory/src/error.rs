//! 권고 엔진 에러 타입
//!
//! [`AdvisoryError`]는 피드 파싱과 레코드 추출에서 발생할 수 있는 모든
//! 에러를 나타냅니다. `From<AdvisoryError> for CvepostError` 구현을 통해
//! `?` 연산자로 상위 에러 타입으로 자연스럽게 전파됩니다.
//!
//! 피드 단위 에러(`FeedParse`, `FeedTooLarge`, `Io`)는 배치 전체를
//! 중단시키지만, 레코드 단위 에러(`MissingField`, `InvalidField`)는
//! 해당 레코드만 건너뛰고 집계됩니다.

use cvepost_core::error::{CvepostError, FeedError};

/// 권고 엔진 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum AdvisoryError {
    /// 피드 문서 파싱 실패 — 피드 전체 사용 불가
    #[error("feed parse error: {0}")]
    FeedParse(String),

    /// 피드 크기 초과
    #[error("feed too large: {size} bytes (max: {max})")]
    FeedTooLarge {
        /// 실제 피드 크기 (바이트)
        size: usize,
        /// 최대 허용 크기 (바이트)
        max: usize,
    },

    /// 피드 파일 I/O 에러
    #[error("io error: {path}: {source}")]
    Io {
        /// 관련 파일 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },

    /// 필수 중첩 필드 누락 — 해당 레코드만 건너뜁니다
    #[error("record {id}: missing field: {field}")]
    MissingField {
        /// 레코드 식별자 (식별자 자체가 없으면 `<unknown>`)
        id: String,
        /// 누락된 필드의 점 표기 경로
        field: &'static str,
    },

    /// 필드 값이 해석 불가능 — 해당 레코드만 건너뜁니다
    #[error("record {id}: invalid value for {field}: '{value}'")]
    InvalidField {
        /// 레코드 식별자
        id: String,
        /// 필드의 점 표기 경로
        field: &'static str,
        /// 해석에 실패한 원본 값
        value: String,
    },
}

impl AdvisoryError {
    /// 레코드 단위의 복구 가능한 에러인지 여부를 반환합니다.
    ///
    /// 복구 가능한 에러는 해당 레코드만 건너뛰고 배치를 계속합니다.
    pub fn is_per_record(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. } | Self::InvalidField { .. }
        )
    }
}

impl From<AdvisoryError> for CvepostError {
    fn from(err: AdvisoryError) -> Self {
        match err {
            AdvisoryError::FeedParse(msg) => CvepostError::Feed(FeedError::ParseFailed(msg)),
            AdvisoryError::FeedTooLarge { size, max } => {
                CvepostError::Feed(FeedError::TooLarge { size, max })
            }
            AdvisoryError::Io { path, source } => CvepostError::Feed(FeedError::ReadFailed {
                path,
                reason: source.to_string(),
            }),
            err @ (AdvisoryError::MissingField { .. } | AdvisoryError::InvalidField { .. }) => {
                CvepostError::Feed(FeedError::ParseFailed(err.to_string()))
            }
        }
    }
}
