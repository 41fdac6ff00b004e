//! # Folio Storage
//!
//! Local persistence for the Folio site CMS.
//!
//! A [`LocalStore`] keeps two blobs under fixed keys: the serialized
//! content document and, when an operator supplied them by hand, the
//! remote connection parameters. Backends only provide raw keyed bytes;
//! encoding, decoding and corruption handling live in the trait's
//! provided methods so every backend behaves the same.
//!
//! ## Features
//!
//! - **LocalStore trait**: keyed blobs plus typed document/config helpers
//! - **InMemoryLocalStore**: `DashMap`-backed store for tests and previews
//! - **RedbLocalStore**: single-file durable store
//! - **ByteQuota**: optional per-value size limit
//!
//! ## Example
//!
//! ```rust,ignore
//! use folio_core::SiteContent;
//! use folio_storage::{InMemoryLocalStore, LocalStore};
//!
//! let store = InMemoryLocalStore::new();
//! store.save_content(&SiteContent::default()).await?;
//! let patch = store.load_content().await?.expect("saved above");
//! ```

pub mod error;
pub mod memory;
pub mod persistent;
pub mod quota;

pub use error::{StorageError, StorageResult};
pub use memory::InMemoryLocalStore;
pub use persistent::{RedbLocalStore, RedbLocalStoreConfig};
pub use quota::ByteQuota;

use async_trait::async_trait;
use folio_core::{ContentPatch, RemoteConfig, SiteContent};
use tracing::warn;

/// Key holding the serialized content document
pub const CONTENT_KEY: &str = "site_content_v1";

/// Key holding operator-supplied remote connection parameters
pub const REMOTE_CONFIG_KEY: &str = "remote_config";

/// Keyed local persistence.
///
/// Implementors provide raw byte access; the typed methods are built on
/// top. Corrupt blobs load as absent rather than failing.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Read the raw value under `key`
    async fn read(&self, key: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Replace the raw value under `key`
    async fn write(&self, key: &str, value: Vec<u8>) -> StorageResult<()>;

    /// Remove `key`, returning whether it existed
    async fn remove(&self, key: &str) -> StorageResult<bool>;

    /// Load the persisted document as a partial document.
    ///
    /// Returns `Ok(None)` when nothing is stored or the blob is corrupt.
    async fn load_content(&self) -> StorageResult<Option<ContentPatch>> {
        let Some(bytes) = self.read(CONTENT_KEY).await? else {
            return Ok(None);
        };
        Ok(decode_content(&bytes))
    }

    /// Persist the whole document
    async fn save_content(&self, content: &SiteContent) -> StorageResult<()> {
        let bytes = serde_json::to_vec(content)?;
        self.write(CONTENT_KEY, bytes).await
    }

    /// Forget the persisted document
    async fn clear_content(&self) -> StorageResult<()> {
        self.remove(CONTENT_KEY).await.map(|_| ())
    }

    /// Load persisted remote parameters, if any are stored and valid
    async fn load_remote_config(&self) -> StorageResult<Option<RemoteConfig>> {
        let Some(bytes) = self.read(REMOTE_CONFIG_KEY).await? else {
            return Ok(None);
        };
        let parsed = std::str::from_utf8(&bytes)
            .map_err(|e| e.to_string())
            .and_then(|text| RemoteConfig::parse(text).map_err(|e| e.to_string()));
        match parsed {
            Ok(config) => Ok(Some(config)),
            Err(reason) => {
                warn!(key = REMOTE_CONFIG_KEY, %reason, "Ignoring invalid stored remote config");
                Ok(None)
            }
        }
    }

    /// Persist remote parameters
    async fn save_remote_config(&self, config: &RemoteConfig) -> StorageResult<()> {
        let bytes = serde_json::to_vec(config)?;
        self.write(REMOTE_CONFIG_KEY, bytes).await
    }

    /// Forget persisted remote parameters
    async fn clear_remote_config(&self) -> StorageResult<()> {
        self.remove(REMOTE_CONFIG_KEY).await.map(|_| ())
    }
}

/// Decode a stored document blob, logging and discarding corruption.
pub fn decode_content(bytes: &[u8]) -> Option<ContentPatch> {
    let value: serde_json::Value = match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(e) => {
            warn!(key = CONTENT_KEY, error = %e, "Stored content is not valid JSON, ignoring it");
            return None;
        }
    };
    match ContentPatch::decode(value) {
        Ok(decoded) => {
            for rejected in &decoded.rejected {
                warn!(
                    section = %rejected.section,
                    reason = %rejected.reason,
                    "Dropping malformed stored section"
                );
            }
            Some(decoded.patch)
        }
        Err(e) => {
            warn!(key = CONTENT_KEY, error = %e, "Stored content is malformed, ignoring it");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_content_rejects_garbage() {
        assert!(decode_content(b"not json").is_none());
        assert!(decode_content(b"[1,2]").is_none());
    }

    #[test]
    fn test_decode_content_keeps_good_sections() {
        let patch = decode_content(br#"{"general": {"phone": "1"}, "home": 7}"#).unwrap();
        assert!(patch.general.is_some());
        assert!(patch.home.is_none());
    }
}
