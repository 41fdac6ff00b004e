//! Behaviour shared by every LocalStore backend

use std::sync::Arc;

use folio_core::{ListMerge, SiteContent};
use folio_storage::{
    CONTENT_KEY, InMemoryLocalStore, LocalStore, RedbLocalStore, RedbLocalStoreConfig,
};
use tempfile::TempDir;

async fn exercise(store: Arc<dyn LocalStore>) {
    assert!(store.load_content().await.unwrap().is_none());

    let mut content = SiteContent::default();
    content.credentials.username = "x".into();
    content.credentials.password = "y".into();
    store.save_content(&content).await.unwrap();

    let patch = store.load_content().await.unwrap().unwrap();
    assert_eq!(
        SiteContent::default().merged(patch, ListMerge::Replace),
        content
    );

    // a stale blob from an older release without posts or announcement
    let mut legacy = serde_json::to_value(SiteContent::default()).unwrap();
    legacy.as_object_mut().unwrap().remove("posts");
    legacy["home"].as_object_mut().unwrap().remove("announcement");
    store
        .write(CONTENT_KEY, serde_json::to_vec(&legacy).unwrap())
        .await
        .unwrap();
    let patch = store.load_content().await.unwrap().unwrap();
    assert!(patch.posts.is_none());
    let merged = SiteContent::default().merged(patch, ListMerge::Replace);
    assert_eq!(merged, SiteContent::default());

    store.clear_content().await.unwrap();
    assert!(store.load_content().await.unwrap().is_none());
}

#[tokio::test]
async fn test_in_memory_backend() {
    exercise(Arc::new(InMemoryLocalStore::new())).await;
}

#[tokio::test]
async fn test_redb_backend() {
    let temp_dir = TempDir::new().unwrap();
    let store =
        RedbLocalStore::open(RedbLocalStoreConfig::new(temp_dir.path().join("folio.redb")))
            .unwrap();
    exercise(Arc::new(store)).await;
}
