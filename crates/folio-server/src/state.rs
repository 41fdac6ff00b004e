//! Shared handler state

use std::sync::Arc;

use anyhow::Context;
use folio_cms::{AuthGate, ContentStore, LogRelay, RecoveryRelay};
use folio_storage::{LocalStore, RedbLocalStore};
use folio_sync::{RealtimeDbConnector, RemoteConnector};

use crate::config::ServerConfig;

/// State shared by all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: ContentStore,
    pub auth: AuthGate,
}

impl AppState {
    pub fn new(store: ContentStore, auth: AuthGate) -> Self {
        Self { store, auth }
    }

    /// Open the content database and the store behind the API.
    ///
    /// Recovery codes go to the process log; see [`LogRelay`].
    pub async fn open(config: &ServerConfig) -> anyhow::Result<Self> {
        let store = open_store(config, true).await?;
        let relay: Arc<dyn RecoveryRelay> = Arc::new(LogRelay);
        let auth = AuthGate::new(store.clone(), config.auth.clone(), relay);
        Ok(Self::new(store, auth))
    }
}

/// Open the store on the configured database.
///
/// Without `remote` the store stays local-only.
pub async fn open_store(config: &ServerConfig, remote: bool) -> anyhow::Result<ContentStore> {
    let local_config = config.local_store_config();
    let path = local_config.db_path.clone();
    let local: Arc<dyn LocalStore> = Arc::new(
        RedbLocalStore::open(local_config)
            .with_context(|| format!("failed to open content database {}", path.display()))?,
    );

    let connector: Option<Arc<dyn RemoteConnector>> = if remote {
        Some(Arc::new(
            RealtimeDbConnector::new().context("failed to build remote client")?,
        ))
    } else {
        None
    };

    Ok(ContentStore::open(config.store_config(), local, connector).await)
}
