//! 중복 제거 캐시 -- 이미 통지한 권고 식별자의 영속 집합
//!
//! [`DedupCache`]는 프로세스 호출 간에 살아남는 유일한 가변 상태입니다.
//! 실행당 갱신 프로토콜:
//!
//! 1. 실행 시작 시 `load` (저장소가 없으면 빈 저장소를 생성)
//! 2. 파이프라인이 `seen_set`으로 이미 통지된 식별자를 제외
//! 3. 발송이 성공한 뒤에만 `insert_all` → `prune` → `save`
//!
//! 발송 전에 저장하면 발송 실패 시 권고가 통지된 것으로 잘못 기록되므로,
//! 저장은 실행당 정확히 한 번, 발송 후에만 수행해야 합니다.
//!
//! # 저장 형식
//!
//! 식별자 문자열의 JSON 배열입니다. 파일을 안정적으로 비교할 수 있도록
//! 정렬된 순서로 직렬화합니다.
//!
//! ```json
//! ["CVE-2024-1111", "CVE-2024-2222"]
//! ```
//!
//! # 동시성
//!
//! 한 번에 하나의 호출만 실행된다고 가정합니다. 겹치는 호출은
//! load-...-save 구간에서 갱신을 잃을 수 있습니다 (lost update).

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use metrics::{counter, gauge};
use tracing::{debug, info};

use cvepost_core::metrics as metric_names;

use crate::error::NotifyError;

/// 중복 제거 캐시
///
/// 메모리 내 식별자 집합과 저장소 경로를 보유합니다.
#[derive(Debug, Clone)]
pub struct DedupCache {
    /// 저장소 파일 경로
    path: PathBuf,
    /// 식별자 집합 (정렬 유지)
    ids: BTreeSet<String>,
}

impl DedupCache {
    /// 저장소에서 캐시를 로드합니다.
    ///
    /// 저장소가 없으면 빈 저장소를 생성한 뒤 빈 캐시를 반환합니다.
    /// 이후의 로드는 이 분기를 타지 않습니다. 최초 생성 실패는
    /// [`NotifyError::CacheInit`]로 구분됩니다.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, NotifyError> {
        let path = path.into();

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            // NotADirectory: 상위 경로가 아직 없거나 파일로 막혀 있는 경우
            Err(e)
                if e.kind() == std::io::ErrorKind::NotFound
                    || e.kind() == std::io::ErrorKind::NotADirectory =>
            {
                info!(path = %path.display(), "cache store missing, creating empty store");
                create_empty_store(&path)?;
                return Ok(Self {
                    path,
                    ids: BTreeSet::new(),
                });
            }
            Err(e) => {
                return Err(NotifyError::CacheLoad {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };

        let ids: Vec<String> =
            serde_json::from_str(&content).map_err(|e| NotifyError::CacheLoad {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        debug!(path = %path.display(), entries = ids.len(), "cache store loaded");

        Ok(Self {
            path,
            ids: ids.into_iter().collect(),
        })
    }

    /// 저장소 경로를 반환합니다.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 캐시 내 엔트리 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// 캐시가 비어 있는지 여부를 반환합니다.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// 식별자가 이미 통지되었는지 확인합니다.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// 정렬된 식별자 목록을 반환합니다.
    pub fn ids(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    /// 파이프라인 입력용 식별자 집합을 반환합니다.
    pub fn seen_set(&self) -> HashSet<String> {
        self.ids.iter().cloned().collect()
    }

    /// 새로 통지한 식별자들을 병합합니다.
    pub fn insert_all(&mut self, ids: impl IntoIterator<Item = String>) {
        self.ids.extend(ids);
    }

    /// 연도 경계 프루닝을 수행하고 제거된 엔트리 수를 반환합니다.
    ///
    /// 식별자에 `-YYYY-` 연도 토큰이 포함된 엔트리만 유지하고 나머지는
    /// 무조건 버립니다. 과거 연도의 엔트리를 다시 검사하지 않고
    /// 버리는 대신 저장소 크기를 유계로 유지합니다.
    pub fn prune(&mut self, year: i32) -> usize {
        let token = year_token(year);
        let before = self.ids.len();
        self.ids.retain(|id| id.contains(&token));
        let removed = before - self.ids.len();

        if removed > 0 {
            counter!(metric_names::CACHE_PRUNED_TOTAL).increment(removed as u64);
            info!(removed, year, "pruned cache entries outside current year");
        }
        removed
    }

    /// 캐시를 비웁니다 (외부 초기화용).
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// 저장소를 현재 집합으로 다시 씁니다.
    ///
    /// 발송 성공(또는 의도된 드라이런 출력) 후에만 호출해야 합니다.
    pub fn save(&self) -> Result<(), NotifyError> {
        let json =
            serde_json::to_string(&self.ids()).map_err(|e| NotifyError::CachePersist {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?;

        std::fs::write(&self.path, json).map_err(|e| NotifyError::CachePersist {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;

        gauge!(metric_names::CACHE_ENTRIES).set(self.ids.len() as f64);
        debug!(path = %self.path.display(), entries = self.ids.len(), "cache store persisted");
        Ok(())
    }
}

/// 연도 토큰을 반환합니다 (예: 2024 → `-2024-`).
fn year_token(year: i32) -> String {
    format!("-{year}-")
}

fn create_empty_store(path: &Path) -> Result<(), NotifyError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| NotifyError::CacheInit {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    }

    std::fs::write(path, "[]").map_err(|e| NotifyError::CacheInit {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_store_creates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen.json");

        let cache = DedupCache::load(&path).unwrap();
        assert!(cache.is_empty());
        // 빈 저장소가 생성되어 있어야 합니다
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn load_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/state/seen.json");

        let cache = DedupCache::load(&path).unwrap();
        assert!(cache.is_empty());
        assert!(path.exists());
    }

    #[test]
    fn load_existing_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen.json");
        std::fs::write(&path, r#"["CVE-2024-1111","CVE-2024-2222"]"#).unwrap();

        let cache = DedupCache::load(&path).unwrap();
        assert_eq!(cache.len(), 2);
        assert!(cache.contains("CVE-2024-1111"));
        assert!(!cache.contains("CVE-2024-3333"));
    }

    #[test]
    fn load_corrupt_store_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen.json");
        std::fs::write(&path, "not json").unwrap();

        let result = DedupCache::load(&path);
        assert!(matches!(result, Err(NotifyError::CacheLoad { .. })));
    }

    #[test]
    fn init_failure_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();

        let result = DedupCache::load(blocker.join("seen.json"));
        assert!(matches!(result, Err(NotifyError::CacheInit { .. })));
    }

    #[test]
    fn save_and_reload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen.json");

        let mut cache = DedupCache::load(&path).unwrap();
        cache.insert_all(vec![
            "CVE-2024-2222".to_owned(),
            "CVE-2024-1111".to_owned(),
        ]);
        cache.save().unwrap();

        let reloaded = DedupCache::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains("CVE-2024-1111"));
        // 직렬화는 정렬된 순서
        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw, r#"["CVE-2024-1111","CVE-2024-2222"]"#);
    }

    #[test]
    fn prune_keeps_only_current_year() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = DedupCache::load(dir.path().join("seen.json")).unwrap();
        cache.insert_all(vec![
            "CVE-2023-1111".to_owned(),
            "CVE-2024-2222".to_owned(),
        ]);

        let removed = cache.prune(2024);
        assert_eq!(removed, 1);
        assert_eq!(cache.ids(), vec!["CVE-2024-2222"]);
    }

    #[test]
    fn prune_discards_prior_years_unconditionally() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = DedupCache::load(dir.path().join("seen.json")).unwrap();
        cache.insert_all(vec![
            "CVE-2021-0001".to_owned(),
            "CVE-2022-0002".to_owned(),
            "CVE-2023-0003".to_owned(),
        ]);

        let removed = cache.prune(2024);
        assert_eq!(removed, 3);
        assert!(cache.is_empty());
    }

    #[test]
    fn prune_ignores_ids_without_year_token() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = DedupCache::load(dir.path().join("seen.json")).unwrap();
        cache.insert_all(vec![
            "GHSA-abcd-efgh".to_owned(),
            "CVE-2024-0001".to_owned(),
        ]);

        cache.prune(2024);
        assert_eq!(cache.ids(), vec!["CVE-2024-0001"]);
    }

    #[test]
    fn insert_all_deduplicates() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = DedupCache::load(dir.path().join("seen.json")).unwrap();
        cache.insert_all(vec![
            "CVE-2024-0001".to_owned(),
            "CVE-2024-0001".to_owned(),
        ]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_empties_cache() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = DedupCache::load(dir.path().join("seen.json")).unwrap();
        cache.insert_all(vec!["CVE-2024-0001".to_owned()]);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn seen_set_matches_ids() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = DedupCache::load(dir.path().join("seen.json")).unwrap();
        cache.insert_all(vec!["CVE-2024-0001".to_owned()]);

        let seen = cache.seen_set();
        assert!(seen.contains("CVE-2024-0001"));
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn year_token_format() {
        assert_eq!(year_token(2024), "-2024-");
        assert_eq!(year_token(999), "-999-");
    }
}
