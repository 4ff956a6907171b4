//! Dedup cache integration tests over a real temp store

use cvepost_notify::DedupCache;

#[test]
fn full_run_protocol_merge_prune_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seen.json");

    // 이전 연도 엔트리가 남아 있는 기존 저장소
    std::fs::write(&path, r#"["CVE-2023-1111","CVE-2024-2222"]"#).unwrap();

    let mut cache = DedupCache::load(&path).unwrap();
    assert_eq!(cache.len(), 2);

    // 이번 실행에서 새로 통지한 식별자를 병합하고 연도 프루닝 후 저장
    cache.insert_all(vec!["CVE-2024-3333".to_owned()]);
    let removed = cache.prune(2024);
    assert_eq!(removed, 1);
    cache.save().unwrap();

    // 저장소를 다시 열면 현재 연도 엔트리만 남아 있어야 합니다
    let reloaded = DedupCache::load(&path).unwrap();
    assert_eq!(
        reloaded.ids(),
        vec!["CVE-2024-2222".to_owned(), "CVE-2024-3333".to_owned()]
    );
}

#[test]
fn skipping_save_leaves_store_untouched() {
    // 발송 실패 시나리오: 병합/프루닝은 메모리에서만 일어나고
    // save가 호출되지 않으면 저장소는 이전 상태를 유지해야 합니다.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seen.json");
    std::fs::write(&path, r#"["CVE-2024-0001"]"#).unwrap();

    {
        let mut cache = DedupCache::load(&path).unwrap();
        cache.insert_all(vec!["CVE-2024-0002".to_owned()]);
        cache.prune(2024);
        // save 없이 drop
    }

    let reloaded = DedupCache::load(&path).unwrap();
    assert_eq!(reloaded.ids(), vec!["CVE-2024-0001".to_owned()]);
}

#[test]
fn auto_created_store_supports_normal_load_afterwards() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("seen.json");

    // 최초 로드가 빈 저장소를 만들고
    let first = DedupCache::load(&path).unwrap();
    assert!(first.is_empty());

    // 두 번째 로드는 생성 분기 없이 일반 경로를 탑니다
    let second = DedupCache::load(&path).unwrap();
    assert!(second.is_empty());
}

#[test]
fn reset_run_clears_persisted_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seen.json");
    std::fs::write(&path, r#"["CVE-2024-0001","CVE-2024-0002"]"#).unwrap();

    let mut cache = DedupCache::load(&path).unwrap();
    cache.clear();
    cache.save().unwrap();

    let reloaded = DedupCache::load(&path).unwrap();
    assert!(reloaded.is_empty());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
}

#[test]
fn notified_id_never_reappears_within_year() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seen.json");

    // 1차 실행: 통지 후 저장
    let mut cache = DedupCache::load(&path).unwrap();
    cache.insert_all(vec!["CVE-2024-7777".to_owned()]);
    cache.prune(2024);
    cache.save().unwrap();

    // 2차 실행: 같은 식별자는 seen 집합에 있어야 합니다
    let cache = DedupCache::load(&path).unwrap();
    assert!(cache.seen_set().contains("CVE-2024-7777"));

    // 3차 실행(다음 해): 연도 프루닝이 과거 엔트리를 제거합니다
    let mut cache = DedupCache::load(&path).unwrap();
    cache.prune(2025);
    cache.save().unwrap();
    let reloaded = DedupCache::load(&path).unwrap();
    assert!(reloaded.is_empty());
}
