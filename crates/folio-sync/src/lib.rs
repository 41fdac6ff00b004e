//! # Folio Sync
//!
//! Remote sync adapters for the Folio site CMS.
//!
//! A remote holds one node with the whole content document. Writes replace
//! the node; subscribers receive the whole node after every change.
//!
//! ## Features
//!
//! - **RemoteConnector / RemoteSync**: connect, push, subscribe
//! - **MemoryRemoteHub**: in-process nodes for tests and local previews
//! - **RealtimeDbConnector**: hosted realtime database over REST and
//!   server-sent events
//!
//! ## Example
//!
//! ```rust,ignore
//! use folio_core::{RemoteConfig, SiteContent};
//! use folio_sync::{MemoryRemoteHub, RemoteConnector};
//! use futures::StreamExt;
//!
//! let hub = MemoryRemoteHub::new();
//! let remote = hub.connector().connect(&RemoteConfig::new("https://db.test")).await?;
//! let mut snapshots = remote.snapshots();
//! remote.push(&SiteContent::default()).await?;
//! let node = snapshots.next().await;
//! ```

pub mod error;
pub mod memory;
pub mod realtime;
pub mod sse;
pub mod stream;

pub use error::{SyncError, SyncResult};
pub use memory::{MemoryConnector, MemoryRemote, MemoryRemoteHub};
pub use realtime::{RealtimeDbConnector, RealtimeDbOptions, RealtimeDbRemote};
pub use stream::watch_to_stream;

use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use folio_core::{RemoteConfig, SiteContent};
use futures::Stream;

/// The remote node as delivered: the whole document, any shape.
///
/// It may be partial, `null`, or not an object at all; consumers decode it
/// leniently.
pub type RemoteSnapshot = serde_json::Value;

/// Stream of remote snapshots
pub type SnapshotStream = Pin<Box<dyn Stream<Item = RemoteSnapshot> + Send>>;

/// An established connection to one remote node.
#[async_trait]
pub trait RemoteSync: Send + Sync {
    /// Replace the remote node with `content`
    async fn push(&self, content: &SiteContent) -> SyncResult<()>;

    /// Subscribe to the node.
    ///
    /// Yields the current value first when one is known, then the whole node
    /// after every change, including changes made by this connection.
    fn snapshots(&self) -> SnapshotStream;

    /// Human-readable node location
    fn endpoint(&self) -> String;
}

/// Opens connections from connection parameters.
#[async_trait]
pub trait RemoteConnector: Send + Sync {
    /// Connect to the node described by `config`
    async fn connect(&self, config: &RemoteConfig) -> SyncResult<Arc<dyn RemoteSync>>;
}
