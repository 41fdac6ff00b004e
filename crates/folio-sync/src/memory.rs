//! In-process remote
//!
//! A [`MemoryRemoteHub`] holds shared nodes keyed by endpoint. Every
//! connection to the same endpoint sees the same node, so two stores on one
//! hub behave like two browsers on one hosted database. The hub side can
//! publish values as another writer would, count pushes, refuse
//! connections and fail pushes.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dashmap::DashMap;
use folio_core::{RemoteConfig, SiteContent};
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, trace};

use crate::error::{SyncError, SyncResult};
use crate::stream::watch_to_stream;
use crate::{RemoteConnector, RemoteSync, SnapshotStream};

/// One shared node
#[derive(Debug)]
struct MemoryNode {
    tx: watch::Sender<Option<Value>>,
    pushes: AtomicUsize,
}

impl MemoryNode {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            tx,
            pushes: AtomicUsize::new(0),
        }
    }
}

#[derive(Debug, Default)]
struct HubInner {
    nodes: DashMap<String, Arc<MemoryNode>>,
    refused: Mutex<HashSet<String>>,
    fail_pushes: AtomicBool,
    connects: AtomicUsize,
}

/// Shared in-process remote nodes
#[derive(Debug, Clone, Default)]
pub struct MemoryRemoteHub {
    inner: Arc<HubInner>,
}

impl MemoryRemoteHub {
    /// Create an empty hub
    pub fn new() -> Self {
        Self::default()
    }

    /// A connector opening connections on this hub
    pub fn connector(&self) -> MemoryConnector {
        MemoryConnector { hub: self.clone() }
    }

    fn node(&self, endpoint: &str) -> Arc<MemoryNode> {
        self.inner
            .nodes
            .entry(endpoint.to_string())
            .or_insert_with(|| Arc::new(MemoryNode::new()))
            .clone()
    }

    /// Refuse connections to a database URL
    pub fn refuse(&self, database_url: impl Into<String>) {
        if let Ok(mut refused) = self.inner.refused.lock() {
            refused.insert(database_url.into());
        }
    }

    /// Accept connections to a previously refused database URL
    pub fn accept(&self, database_url: &str) {
        if let Ok(mut refused) = self.inner.refused.lock() {
            refused.remove(database_url);
        }
    }

    fn is_refused(&self, database_url: &str) -> bool {
        self.inner
            .refused
            .lock()
            .map(|refused| refused.contains(database_url))
            .unwrap_or(false)
    }

    /// Make every push fail (or succeed again)
    pub fn set_fail_pushes(&self, fail: bool) {
        self.inner.fail_pushes.store(fail, Ordering::SeqCst);
    }

    /// Write a node value as another client would.
    ///
    /// Does not count as a push.
    pub fn publish(&self, endpoint: &str, value: Value) {
        debug!(endpoint, "Publishing value to memory node");
        self.node(endpoint).tx.send_replace(Some(value));
    }

    /// Current node value
    pub fn value(&self, endpoint: &str) -> Option<Value> {
        self.inner
            .nodes
            .get(endpoint)
            .and_then(|node| node.tx.borrow().clone())
    }

    /// Pushes made through connections to `endpoint`
    pub fn push_count(&self, endpoint: &str) -> usize {
        self.inner
            .nodes
            .get(endpoint)
            .map(|node| node.pushes.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Successful connections on this hub
    pub fn connect_count(&self) -> usize {
        self.inner.connects.load(Ordering::SeqCst)
    }
}

/// Connector for a [`MemoryRemoteHub`]
#[derive(Debug, Clone)]
pub struct MemoryConnector {
    hub: MemoryRemoteHub,
}

#[async_trait]
impl RemoteConnector for MemoryConnector {
    async fn connect(&self, config: &RemoteConfig) -> SyncResult<Arc<dyn RemoteSync>> {
        config.check()?;
        let endpoint = config.endpoint();
        if self.hub.is_refused(&config.database_url) {
            return Err(SyncError::unreachable(endpoint, "connection refused"));
        }

        self.hub.inner.connects.fetch_add(1, Ordering::SeqCst);
        debug!(%endpoint, "Connected to memory node");
        Ok(Arc::new(MemoryRemote {
            node: self.hub.node(&endpoint),
            hub: self.hub.clone(),
            endpoint,
        }))
    }
}

/// A connection to one memory node
#[derive(Debug)]
pub struct MemoryRemote {
    node: Arc<MemoryNode>,
    hub: MemoryRemoteHub,
    endpoint: String,
}

#[async_trait]
impl RemoteSync for MemoryRemote {
    async fn push(&self, content: &SiteContent) -> SyncResult<()> {
        if self.hub.inner.fail_pushes.load(Ordering::SeqCst) {
            return Err(SyncError::transport("simulated push failure"));
        }
        let value = serde_json::to_value(content)?;
        self.node.pushes.fetch_add(1, Ordering::SeqCst);
        self.node.tx.send_replace(Some(value));
        trace!(endpoint = %self.endpoint, "Pushed to memory node");
        Ok(())
    }

    fn snapshots(&self) -> SnapshotStream {
        watch_to_stream(self.node.tx.subscribe())
    }

    fn endpoint(&self) -> String {
        self.endpoint.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use serde_json::json;

    const URL: &str = "https://memory.test";

    #[tokio::test]
    async fn test_push_reaches_other_connection() {
        let hub = MemoryRemoteHub::new();
        let config = RemoteConfig::new(URL);
        let a = hub.connector().connect(&config).await.unwrap();
        let b = hub.connector().connect(&config).await.unwrap();

        let mut snapshots = b.snapshots();
        a.push(&SiteContent::default()).await.unwrap();

        let snapshot = snapshots.next().await.unwrap();
        assert_eq!(snapshot["general"]["accentColor"], json!("#C5A059"));
        assert_eq!(hub.push_count(&config.endpoint()), 1);
        assert_eq!(hub.connect_count(), 2);
    }

    #[tokio::test]
    async fn test_publish_is_not_a_push() {
        let hub = MemoryRemoteHub::new();
        let config = RemoteConfig::new(URL);
        let remote = hub.connector().connect(&config).await.unwrap();
        let mut snapshots = remote.snapshots();

        hub.publish(&config.endpoint(), json!({"general": {"phone": "1"}}));
        assert_eq!(
            snapshots.next().await,
            Some(json!({"general": {"phone": "1"}}))
        );
        assert_eq!(hub.push_count(&config.endpoint()), 0);
    }

    #[tokio::test]
    async fn test_refused_url() {
        let hub = MemoryRemoteHub::new();
        hub.refuse(URL);
        let err = hub
            .connector()
            .connect(&RemoteConfig::new(URL))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, SyncError::Unreachable { .. }));

        hub.accept(URL);
        assert!(hub.connector().connect(&RemoteConfig::new(URL)).await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_config_rejected_before_connecting() {
        let hub = MemoryRemoteHub::new();
        let err = hub
            .connector()
            .connect(&RemoteConfig::new("not a url"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, SyncError::InvalidConfig(_)));
        assert_eq!(hub.connect_count(), 0);
    }

    #[tokio::test]
    async fn test_failing_pushes() {
        let hub = MemoryRemoteHub::new();
        let config = RemoteConfig::new(URL);
        let remote = hub.connector().connect(&config).await.unwrap();
        hub.set_fail_pushes(true);
        assert!(remote.push(&SiteContent::default()).await.is_err());
        assert_eq!(hub.value(&config.endpoint()), None);
    }

    #[tokio::test]
    async fn test_nodes_are_separate() {
        let hub = MemoryRemoteHub::new();
        let main = RemoteConfig::new(URL);
        let staging = RemoteConfig::new(URL).with_node("staging");
        let remote = hub.connector().connect(&main).await.unwrap();
        remote.push(&SiteContent::default()).await.unwrap();

        assert!(hub.value(&main.endpoint()).is_some());
        assert!(hub.value(&staging.endpoint()).is_none());
    }
}
