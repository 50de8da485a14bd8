use super::*;

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let store = BlobStore::new("sqlite::memory:").await.expect("db");
    store.health_check().await.expect("health check");
}

#[tokio::test]
async fn missing_key_reads_as_none() {
    let store = BlobStore::new("sqlite::memory:").await.expect("db");
    let blob = store.read("churras_checklist_v4").await.expect("read");
    assert!(blob.is_none());
}

#[tokio::test]
async fn writes_and_reads_back_a_blob() {
    let store = BlobStore::new("sqlite::memory:").await.expect("db");
    store
        .write("churras_checklist_v4", r#"{"foods":[],"log":[]}"#)
        .await
        .expect("write");

    let blob = store.read("churras_checklist_v4").await.expect("read");
    assert_eq!(blob.as_deref(), Some(r#"{"foods":[],"log":[]}"#));
}

#[tokio::test]
async fn rewriting_a_key_replaces_the_blob_wholesale() {
    let store = BlobStore::new("sqlite::memory:").await.expect("db");
    store.write("k", "first").await.expect("write");
    store.write("k", "second").await.expect("rewrite");

    let blob = store.read("k").await.expect("read");
    assert_eq!(blob.as_deref(), Some("second"));
}

#[tokio::test]
async fn keys_are_independent() {
    let store = BlobStore::new("sqlite::memory:").await.expect("db");
    store.write("a", "payload-a").await.expect("write a");
    store.write("b", "payload-b").await.expect("write b");

    assert_eq!(store.read("a").await.expect("read").as_deref(), Some("payload-a"));
    assert_eq!(store.read("b").await.expect("read").as_deref(), Some("payload-b"));
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = std::env::temp_dir().join(format!("churras_storage_test_{suffix}"));
    let db_path = temp_root.join("nested").join("checklist.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let store = BlobStore::new(&database_url).await.expect("db");
    drop(store);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    std::fs::remove_dir_all(temp_root).expect("cleanup");
}
