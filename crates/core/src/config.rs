//! 설정 관리 — cvepost.toml 파싱 및 런타임 설정
//!
//! [`CvepostConfig`]는 배치 실행에 필요한 모든 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`CVEPOST_POLICY_MIN_SCORE=8.0` 형식)
//! 3. 설정 파일 (`cvepost.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! 설정 파일이 존재하지 않으면 [`ConfigError::FileNotFound`]로 실패합니다.
//! 배치 작업은 제품 목록 없이는 의미가 없으므로 파일 부재는 치명적입니다.
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), cvepost_core::error::CvepostError> {
//! use cvepost_core::config::CvepostConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = CvepostConfig::load("cvepost.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = CvepostConfig::parse("[policy]\nmin_score = 8.0")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, CvepostError};

/// Cvepost 통합 설정
///
/// `cvepost.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CvepostConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 관련성/심각도 정책 설정
    #[serde(default)]
    pub policy: PolicyConfig,
    /// 피드 입력 설정
    #[serde(default)]
    pub feed: FeedConfig,
    /// 중복 제거 캐시 설정
    #[serde(default)]
    pub cache: CacheConfig,
    /// 알림 발송 설정
    #[serde(default)]
    pub notify: NotifyConfig,
}

impl CvepostConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    /// 3. 검증
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CvepostError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, CvepostError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CvepostError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                CvepostError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, CvepostError> {
        toml::from_str(toml_str).map_err(|e| {
            CvepostError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `CVEPOST_{SECTION}_{FIELD}`
    /// 예: `CVEPOST_NOTIFY_MAIL_TO=security@example.org`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "CVEPOST_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "CVEPOST_GENERAL_LOG_FORMAT");

        // Policy
        override_csv(&mut self.policy.products, "CVEPOST_POLICY_PRODUCTS");
        override_f64(&mut self.policy.min_score, "CVEPOST_POLICY_MIN_SCORE");
        override_csv(
            &mut self.policy.vector_required,
            "CVEPOST_POLICY_VECTOR_REQUIRED",
        );

        // Feed
        override_usize(&mut self.feed.max_feed_bytes, "CVEPOST_FEED_MAX_FEED_BYTES");

        // Cache
        override_string(&mut self.cache.path, "CVEPOST_CACHE_PATH");

        // Notify
        override_string(&mut self.notify.mail_to, "CVEPOST_NOTIFY_MAIL_TO");
        override_string(&mut self.notify.from_addr, "CVEPOST_NOTIFY_FROM_ADDR");
        override_string(
            &mut self.notify.subject_prefix,
            "CVEPOST_NOTIFY_SUBJECT_PREFIX",
        );
        override_string(
            &mut self.notify.sendmail_path,
            "CVEPOST_NOTIFY_SENDMAIL_PATH",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), CvepostError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        // min_score 검증 (CVSS v3 점수 범위)
        if !(0.0..=10.0).contains(&self.policy.min_score) {
            return Err(ConfigError::InvalidValue {
                field: "policy.min_score".to_owned(),
                reason: "must be within the CVSS range 0.0..=10.0".to_owned(),
            }
            .into());
        }

        // 빈 검색어는 모든 플랫폼 식별자에 부분 일치하므로 거부
        if self.policy.products.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "policy.products".to_owned(),
                reason: "product search terms must not be empty".to_owned(),
            }
            .into());
        }

        if self.feed.max_feed_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "feed.max_feed_bytes".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        if self.cache.path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "cache.path".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        if self.notify.from_addr.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "notify.from_addr".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        if self.notify.sendmail_path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "notify.sendmail_path".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 관련성/심각도 정책 설정
///
/// 제품 검색어는 플랫폼 식별자(`cpe23Uri`)에 대한 부분 문자열로 매칭됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// 인벤토리 제품 검색어 목록 (예: `"acme:widget"`)
    pub products: Vec<String>,
    /// 알림 최소 CVSS 점수
    pub min_score: f64,
    /// 공격 벡터에 반드시 포함되어야 하는 부분 문자열 목록 (AND 결합)
    pub vector_required: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            min_score: 7.0,
            vector_required: Vec::new(),
        }
    }
}

/// 피드 입력 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// 피드 문서 최대 허용 크기 (바이트)
    pub max_feed_bytes: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            max_feed_bytes: 256 * 1024 * 1024, // 256 MB
        }
    }
}

/// 중복 제거 캐시 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// 이미 통지한 권고 식별자 저장소 경로
    pub path: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: "/var/lib/cvepost/seen.json".to_owned(),
        }
    }
}

/// 알림 발송 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// 수신자 주소. 비어 있으면 다이제스트를 표준 출력에 씁니다 (드라이런).
    pub mail_to: String,
    /// 발신자 주소
    pub from_addr: String,
    /// 메일 제목 접두어
    pub subject_prefix: String,
    /// sendmail 바이너리 경로
    pub sendmail_path: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            mail_to: String::new(),
            from_addr: "cvepost@localhost".to_owned(),
            subject_prefix: "[CVE]".to_owned(),
            sendmail_path: "/usr/sbin/sendmail".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_f64(target: &mut f64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<f64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse f64 from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val.split(',').map(|s| s.trim().to_owned()).collect();
    }
}
