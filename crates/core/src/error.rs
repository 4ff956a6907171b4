//! 에러 타입 — 도메인별 에러 정의
//!
//! 각 멤버 크레이트는 자기 도메인 에러(`AdvisoryError`, `NotifyError`)를
//! 정의하고 `From` 구현으로 이 최상위 타입에 전파합니다.

/// Cvepost 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum CvepostError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 피드 읽기/파싱 에러
    #[error("feed error: {0}")]
    Feed(#[from] FeedError),

    /// 중복 제거 캐시 저장소 에러
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// 다이제스트 발송 에러
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음 — 시작 시점의 치명적 에러
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 피드 읽기/파싱 에러
///
/// 피드 전체가 사용 불가한 경우에만 해당합니다. 개별 레코드의 필드 누락은
/// `cvepost-advisory`의 추출 에러로 처리되어 배치를 중단하지 않습니다.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// 피드 문서 파싱 실패
    #[error("failed to parse feed: {0}")]
    ParseFailed(String),

    /// 피드 읽기 실패
    #[error("failed to read feed: {path}: {reason}")]
    ReadFailed { path: String, reason: String },

    /// 입력 데이터 초과
    #[error("feed too large: {size} bytes (max: {max})")]
    TooLarge { size: usize, max: usize },
}

/// 중복 제거 캐시 저장소 에러
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// 저장소 최초 생성 실패 — 시작 시점의 치명적 에러
    #[error("failed to initialize cache store: {path}: {reason}")]
    InitFailed { path: String, reason: String },

    /// 저장소 읽기/파싱 실패
    #[error("failed to load cache store: {path}: {reason}")]
    LoadFailed { path: String, reason: String },

    /// 저장소 쓰기 실패
    #[error("failed to persist cache store: {path}: {reason}")]
    PersistFailed { path: String, reason: String },
}

/// 다이제스트 발송 에러
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// 메일 전송 실패 — 캐시는 갱신되지 않은 상태로 남습니다
    #[error("mail transport failed: {0}")]
    TransportFailed(String),

    /// 표준 출력 쓰기 실패 (드라이런)
    #[error("stdout write failed: {0}")]
    StdoutFailed(String),
}
