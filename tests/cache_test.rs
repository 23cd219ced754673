use chrono::TimeDelta;
use readshift::management::{CacheError, CacheRead, CachedValue, ExpiringFileCache};
use serde_json::json;

async fn open_cache(root: &std::path::Path) -> ExpiringFileCache {
    ExpiringFileCache::open(root, "Widgets").await.unwrap()
}

#[tokio::test]
async fn test_open_creates_namespace_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nested/documents");

    let cache = ExpiringFileCache::open(&root, "Widgets").await.unwrap();
    assert!(root.join("Widgets").is_dir());
    assert_eq!(cache.namespace(), "Widgets");

    cache.write("kept", &json!(1)).await.unwrap();
    let again = ExpiringFileCache::open(&root, "Widgets").await.unwrap();
    assert!(matches!(again.read("kept", None).await, CacheRead::Fresh(_)));
}

#[tokio::test]
async fn test_json_and_text_values() {
    let dir = tempfile::tempdir().unwrap();
    let cache = open_cache(dir.path()).await;

    cache
        .write("weather", &json!({"temp": 21, "city": "Kraków"}))
        .await
        .unwrap();
    cache.write_text("note", "buy milk").await.unwrap();
    cache.write_text("number", "42").await.unwrap();

    assert_eq!(
        cache.read("weather", None).await.into_value(),
        Some(CachedValue::Json(json!({"temp": 21, "city": "Kraków"})))
    );
    assert_eq!(
        cache.read("note", None).await.into_value(),
        Some(CachedValue::Text("buy milk".to_string()))
    );
    // raw text that happens to be JSON comes back parsed
    assert_eq!(
        cache.read("number", None).await.into_value(),
        Some(CachedValue::Json(json!(42)))
    );
}

#[tokio::test]
async fn test_missing_key() {
    let dir = tempfile::tempdir().unwrap();
    let cache = open_cache(dir.path()).await;

    assert!(matches!(cache.read("nothing", Some(5)).await, CacheRead::Missing));
    assert!(cache.read("nothing", None).await.into_value().is_none());
}

#[tokio::test]
async fn test_overwrite_replaces_value() {
    let dir = tempfile::tempdir().unwrap();
    let cache = open_cache(dir.path()).await;

    cache.write("k", &json!({"v": 1})).await.unwrap();
    cache.write("k", &json!({"v": 2})).await.unwrap();

    assert_eq!(
        cache.read("k", None).await.into_value(),
        Some(CachedValue::Json(json!({"v": 2})))
    );
    assert_eq!(cache.keys().await.unwrap(), vec!["k".to_string()]);
}

#[tokio::test]
async fn test_expiry_boundary() {
    let dir = tempfile::tempdir().unwrap();
    let cache = open_cache(dir.path()).await;
    cache.write("weather", &json!({"temp": 21})).await.unwrap();

    let created = cache.created_at("weather").await.unwrap();
    let ttl = TimeDelta::minutes(30);

    let before = created + ttl - TimeDelta::seconds(1);
    assert!(matches!(
        cache.read_at("weather", Some(30), before).await,
        CacheRead::Fresh(_)
    ));

    // exactly the TTL old is still fresh
    assert!(matches!(
        cache.read_at("weather", Some(30), created + ttl).await,
        CacheRead::Fresh(_)
    ));

    let after = created + ttl + TimeDelta::seconds(1);
    assert!(matches!(
        cache.read_at("weather", Some(30), after).await,
        CacheRead::Expired
    ));
    assert!(!cache.dir().join("weather").exists());
    assert!(matches!(cache.read("weather", Some(30)).await, CacheRead::Missing));
}

#[tokio::test]
async fn test_no_ttl_never_expires() {
    let dir = tempfile::tempdir().unwrap();
    let cache = open_cache(dir.path()).await;
    cache.write("progress", &json!([1, 2, 3])).await.unwrap();

    let created = cache.created_at("progress").await.unwrap();
    let much_later = created + TimeDelta::days(3650);

    assert!(matches!(
        cache.read_at("progress", None, much_later).await,
        CacheRead::Fresh(_)
    ));
    assert!(matches!(
        cache.read_at("progress", Some(u64::MAX), much_later).await,
        CacheRead::Fresh(_)
    ));
}

#[tokio::test]
async fn test_zero_ttl_expires_anything_older_than_now() {
    let dir = tempfile::tempdir().unwrap();
    let cache = open_cache(dir.path()).await;
    cache.write("weather", &json!({"temp": 21})).await.unwrap();
    let created = cache.created_at("weather").await.unwrap();

    assert!(matches!(
        cache.read_at("weather", Some(0), created).await,
        CacheRead::Fresh(_)
    ));
    assert!(matches!(
        cache
            .read_at("weather", Some(0), created + TimeDelta::seconds(1))
            .await,
        CacheRead::Expired
    ));
}

#[tokio::test]
async fn test_write_failure_is_returned_and_cleaned_up() {
    let dir = tempfile::tempdir().unwrap();
    let cache = open_cache(dir.path()).await;

    // the namespace vanished under the cache
    std::fs::remove_dir_all(cache.dir()).unwrap();
    assert!(matches!(
        cache.write("weather", &json!(1)).await,
        Err(CacheError::Io { .. })
    ));

    // the temp file is written but cannot replace a directory
    std::fs::create_dir_all(cache.dir().join("weather")).unwrap();
    std::fs::write(cache.dir().join("weather").join("inner"), "x").unwrap();
    assert!(matches!(
        cache.write_text("weather", "sunny").await,
        Err(CacheError::Io { .. })
    ));
    assert!(!cache.dir().join(".weather.readshift-tmp").exists());
}

#[tokio::test]
async fn test_keys_with_separators_are_sanitized() {
    let dir = tempfile::tempdir().unwrap();
    let cache = open_cache(dir.path()).await;

    cache.write("2024/06", &json!("june")).await.unwrap();

    assert!(cache.dir().join("2024-06").is_file());
    assert_eq!(
        cache.read("2024-06", None).await.into_value(),
        Some(CachedValue::Json(json!("june")))
    );
    assert_eq!(
        cache.read("2024/06", None).await.into_value(),
        Some(CachedValue::Json(json!("june")))
    );
}

#[tokio::test]
async fn test_invalid_keys_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let cache = open_cache(dir.path()).await;

    assert!(matches!(
        cache.write("..", &json!(1)).await,
        Err(CacheError::InvalidKey(_))
    ));
    assert!(matches!(
        cache.read("", None).await,
        CacheRead::Failed(CacheError::InvalidKey(_))
    ));
}

#[tokio::test]
async fn test_unreadable_entry_is_failed_not_missing() {
    let dir = tempfile::tempdir().unwrap();
    let cache = open_cache(dir.path()).await;
    std::fs::create_dir(cache.dir().join("folder")).unwrap();

    assert!(matches!(
        cache.read("folder", None).await,
        CacheRead::Failed(CacheError::Io { .. })
    ));
}

#[tokio::test]
async fn test_keys_lists_files_only() {
    let dir = tempfile::tempdir().unwrap();
    let cache = open_cache(dir.path()).await;

    cache.write_text("b", "2").await.unwrap();
    cache.write_text("a", "1").await.unwrap();
    std::fs::create_dir(cache.dir().join("sub")).unwrap();

    assert_eq!(
        cache.keys().await.unwrap(),
        vec!["a".to_string(), "b".to_string()]
    );
}

#[tokio::test]
async fn test_preserve_and_remove() {
    let dir = tempfile::tempdir().unwrap();
    let cache = open_cache(dir.path()).await;
    cache.write_text("db.json", "{broken").await.unwrap();

    let copy = cache.preserve("db.json", "bak").await.unwrap();
    assert_eq!(copy, cache.dir().join("db.json.bak"));
    assert_eq!(std::fs::read_to_string(&copy).unwrap(), "{broken");
    assert!(cache.dir().join("db.json").is_file());

    cache.remove("db.json").await.unwrap();
    cache.remove("db.json").await.unwrap();
    assert!(matches!(cache.read("db.json", None).await, CacheRead::Missing));
}
