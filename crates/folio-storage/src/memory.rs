//! In-memory local store
//!
//! Suitable for tests and for previewing content without touching disk.
//! Raw accessors let tests inspect what was written and inject corrupt
//! blobs or write failures.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use folio_core::SiteContent;
use tracing::trace;

use crate::error::{StorageError, StorageResult};
use crate::quota::ByteQuota;
use crate::{CONTENT_KEY, LocalStore};

/// In-memory implementation of LocalStore
#[derive(Debug, Default)]
pub struct InMemoryLocalStore {
    /// Raw values by key
    values: DashMap<String, Vec<u8>>,
    /// Size limit per value
    quota: ByteQuota,
    /// Successful writes so far
    writes: AtomicUsize,
    /// Fail every write with an I/O error
    fail_writes: AtomicBool,
}

impl InMemoryLocalStore {
    /// Create an empty store with no quota
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a byte quota
    pub fn with_quota(quota: ByteQuota) -> Self {
        Self {
            quota,
            ..Self::default()
        }
    }

    /// Raw text stored under `key`
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .map(|value| String::from_utf8_lossy(value.value()).into_owned())
    }

    /// Store raw text under `key`, bypassing encoding and quota
    pub fn insert_raw(&self, key: impl Into<String>, text: impl Into<String>) {
        self.values.insert(key.into(), text.into().into_bytes());
    }

    /// The stored document decoded as a complete document
    pub fn saved_content(&self) -> Option<SiteContent> {
        let value = self.values.get(CONTENT_KEY)?;
        serde_json::from_slice(value.value()).ok()
    }

    /// Number of successful writes
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make subsequent writes fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Whether `key` holds a value
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

#[async_trait]
impl LocalStore for InMemoryLocalStore {
    async fn read(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.values.get(key).map(|value| value.value().clone()))
    }

    async fn write(&self, key: &str, value: Vec<u8>) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::io("simulated write failure"));
        }
        self.quota.check(key, value.len())?;
        trace!(key, bytes = value.len(), "Writing value");
        self.values.insert(key.to_string(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<bool> {
        Ok(self.values.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::REMOTE_CONFIG_KEY;
    use folio_core::RemoteConfig;

    #[tokio::test]
    async fn test_content_roundtrip() {
        let store = InMemoryLocalStore::new();
        assert!(store.load_content().await.unwrap().is_none());

        let content = SiteContent::default();
        store.save_content(&content).await.unwrap();
        assert_eq!(store.writes(), 1);

        let patch = store.load_content().await.unwrap().unwrap();
        let restored = SiteContent::default().merged(patch, Default::default());
        assert_eq!(restored, content);
        assert_eq!(store.saved_content(), Some(content));
    }

    #[tokio::test]
    async fn test_corrupt_blob_loads_as_absent() {
        let store = InMemoryLocalStore::new();
        store.insert_raw(CONTENT_KEY, "{not json");
        assert!(store.load_content().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_quota_rejects_large_document() {
        let store = InMemoryLocalStore::with_quota(ByteQuota::new(64));
        let err = store.save_content(&SiteContent::default()).await.unwrap_err();
        assert!(err.is_capacity());
        assert!(!store.contains(CONTENT_KEY));
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_simulated_write_failure() {
        let store = InMemoryLocalStore::new();
        store.set_fail_writes(true);
        assert!(store.save_content(&SiteContent::default()).await.is_err());
        store.set_fail_writes(false);
        assert!(store.save_content(&SiteContent::default()).await.is_ok());
    }

    #[tokio::test]
    async fn test_clear_content() {
        let store = InMemoryLocalStore::new();
        store.save_content(&SiteContent::default()).await.unwrap();
        store.clear_content().await.unwrap();
        assert!(!store.contains(CONTENT_KEY));
        // clearing twice is fine
        store.clear_content().await.unwrap();
    }

    #[tokio::test]
    async fn test_remote_config_roundtrip() {
        let store = InMemoryLocalStore::new();
        let config = RemoteConfig::new("https://db.example.app").with_node("site");
        store.save_remote_config(&config).await.unwrap();
        assert_eq!(store.load_remote_config().await.unwrap(), Some(config));

        store.insert_raw(REMOTE_CONFIG_KEY, "{ databaseURL: 'x' }");
        assert_eq!(store.load_remote_config().await.unwrap(), None);

        store.clear_remote_config().await.unwrap();
        assert!(!store.contains(REMOTE_CONFIG_KEY));
    }
}
