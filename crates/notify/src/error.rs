//! 알림 경계 에러 타입
//!
//! [`NotifyError`]는 캐시 저장소와 발송 경로에서 발생할 수 있는 모든
//! 에러를 나타냅니다. `From<NotifyError> for CvepostError` 구현을 통해
//! `?` 연산자로 상위 에러 타입으로 자연스럽게 전파됩니다.

use cvepost_core::error::{CacheError, CvepostError, DispatchError};

/// 알림 경계 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// 캐시 저장소 최초 생성 실패 — 시작 시점의 치명적 에러
    #[error("cache store init failed: {path}: {reason}")]
    CacheInit {
        /// 저장소 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 캐시 저장소 읽기/파싱 실패
    #[error("cache store load failed: {path}: {reason}")]
    CacheLoad {
        /// 저장소 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 캐시 저장소 쓰기 실패
    #[error("cache store persist failed: {path}: {reason}")]
    CachePersist {
        /// 저장소 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 다이제스트 발송 실패 — 캐시는 갱신되지 않은 상태로 남습니다
    #[error("dispatch failed: {0}")]
    Dispatch(String),
}

impl From<NotifyError> for CvepostError {
    fn from(err: NotifyError) -> Self {
        match err {
            NotifyError::CacheInit { path, reason } => {
                CvepostError::Cache(CacheError::InitFailed { path, reason })
            }
            NotifyError::CacheLoad { path, reason } => {
                CvepostError::Cache(CacheError::LoadFailed { path, reason })
            }
            NotifyError::CachePersist { path, reason } => {
                CvepostError::Cache(CacheError::PersistFailed { path, reason })
            }
            NotifyError::Dispatch(msg) => {
                CvepostError::Dispatch(DispatchError::TransportFailed(msg))
            }
        }
    }
}
