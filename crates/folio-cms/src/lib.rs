//! # Folio CMS
//!
//! The content store and admin auth gate for the Folio site CMS.
//!
//! [`ContentStore`] keeps one always-complete [`SiteContent`] document,
//! built from compiled-in defaults, the locally persisted copy and an
//! optional remote. Every write is saved locally and pushed to the remote;
//! remote snapshots are merged in and saved, but never pushed back.
//!
//! [`AuthGate`] guards the admin surface with the credential pair stored in
//! the document.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use folio_cms::{ContentStore, StoreConfig};
//! use folio_core::{ContentPatch, GeneralPatch};
//! use folio_storage::InMemoryLocalStore;
//!
//! # tokio_test::block_on(async {
//! let local = Arc::new(InMemoryLocalStore::new());
//! let store = ContentStore::open(StoreConfig::default(), local, None).await;
//!
//! let outcome = store
//!     .update(ContentPatch {
//!         general: Some(GeneralPatch {
//!             phone: Some("555-0100".into()),
//!             ..Default::default()
//!         }),
//!         ..Default::default()
//!     })
//!     .await;
//!
//! assert!(outcome.is_clean());
//! assert_eq!(store.snapshot().await.general.phone, "555-0100");
//! # });
//! ```
//!
//! [`SiteContent`]: folio_core::SiteContent

pub mod auth;
pub mod change;
pub mod config;
pub mod credentials;
pub mod error;
pub mod relay;
pub mod store;
pub mod stream;

pub use auth::{AuthGate, RecoveryTicket, Session};
pub use change::{ChangeOrigin, ConnectionStatus, ContentChange, SyncWarning, UpdateOutcome};
pub use config::{AuthConfig, StoreConfig};
pub use error::{CmsError, CmsResult};
pub use relay::{ChannelRelay, LogRelay, RECOVERY_LOG_TARGET, RecoveryRelay};
pub use store::ContentStore;
pub use stream::{ChangeFeed, broadcast_to_stream};
