//! The content store.
//!
//! One [`ContentStore`] owns the site's document for the life of the
//! process. It folds three sources into one always-complete document:
//! compiled-in defaults, the locally persisted copy and, when connected,
//! the remote node.
//!
//! Writes replace the shared `Arc<SiteContent>` rather than mutating it,
//! so readers holding a snapshot never observe a half-merged document.
//! Local saves and remote pushes are side effects of a write; their
//! failures come back as [`SyncWarning`]s and never undo the write.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use folio_core::{ConnectionSource, ContentPatch, ListMerge, RemoteConfig, SiteContent};
use folio_storage::LocalStore;
use folio_sync::{RemoteConnector, RemoteSnapshot, RemoteSync};
use futures::StreamExt;
use tokio::sync::{Mutex, RwLock, broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, trace, warn};

use crate::change::{ChangeOrigin, ConnectionStatus, ContentChange, SyncWarning, UpdateOutcome};
use crate::config::StoreConfig;
use crate::error::{CmsError, CmsResult};
use crate::stream::{ChangeFeed, broadcast_to_stream};

/// The live remote connection and its listener
struct ActiveRemote {
    remote: Arc<dyn RemoteSync>,
    source: ConnectionSource,
    generation: u64,
    listener: CancellationToken,
}

impl Drop for ActiveRemote {
    fn drop(&mut self) {
        self.listener.cancel();
    }
}

struct StoreInner {
    config: StoreConfig,
    /// Current document
    state: RwLock<Arc<SiteContent>>,
    /// Serializes merge, local save and remote push
    commit: Mutex<()>,
    local: Arc<dyn LocalStore>,
    connector: Option<Arc<dyn RemoteConnector>>,
    remote: RwLock<Option<ActiveRemote>>,
    generation: AtomicU64,
    change_tx: broadcast::Sender<ContentChange>,
    /// Flips to true once the startup connection attempt has finished
    ready: watch::Sender<bool>,
}

/// Shared handle to the site's content document.
///
/// Cloning is cheap; every clone sees the same document.
#[derive(Clone)]
pub struct ContentStore {
    inner: Arc<StoreInner>,
}

impl std::fmt::Debug for ContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStore")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ContentStore {
    /// Open the store.
    ///
    /// Builds the initial document from defaults and the persisted copy,
    /// then starts connecting in the background: the built-in remote if one
    /// is configured, otherwise parameters an operator persisted earlier.
    /// Opening never fails; unreadable local data is logged and ignored.
    pub async fn open(
        config: StoreConfig,
        local: Arc<dyn LocalStore>,
        connector: Option<Arc<dyn RemoteConnector>>,
    ) -> Self {
        let mut content = SiteContent::default();
        match local.load_content().await {
            Ok(Some(patch)) => {
                content.apply(patch, ListMerge::Replace);
                debug!("Loaded persisted content");
            }
            Ok(None) => debug!("No persisted content, starting from defaults"),
            Err(e) => warn!(error = %e, "Failed to read persisted content, starting from defaults"),
        }
        log_schema_issues(&content);

        let (change_tx, _) = broadcast::channel(config.change_capacity.max(1));
        let (ready, _) = watch::channel(false);

        let store = Self {
            inner: Arc::new(StoreInner {
                config,
                state: RwLock::new(Arc::new(content)),
                commit: Mutex::new(()),
                local,
                connector,
                remote: RwLock::new(None),
                generation: AtomicU64::new(0),
                change_tx,
                ready,
            }),
        };

        if store.inner.connector.is_some() {
            let background = store.clone();
            tokio::spawn(async move {
                background.auto_connect().await;
                background.inner.ready.send_replace(true);
            });
        } else {
            store.inner.ready.send_replace(true);
        }

        store
    }

    async fn auto_connect(&self) {
        if let Some(config) = self.inner.config.built_in_remote.clone() {
            if let Err(e) = self.connect(config, ConnectionSource::BuiltIn).await {
                warn!(error = %e, "Built-in remote unavailable, running local-only");
            }
            return;
        }

        match self.inner.local.load_remote_config().await {
            Ok(Some(config)) => {
                if let Err(e) = self.connect(config, ConnectionSource::Persisted).await {
                    warn!(error = %e, "Saved remote unavailable, running local-only");
                }
            }
            Ok(None) => debug!("No remote configured, running local-only"),
            Err(e) => warn!(error = %e, "Failed to read saved remote config"),
        }
    }

    /// Wait until the startup connection attempt has finished.
    pub async fn ready(&self) {
        let mut rx = self.inner.ready.subscribe();
        // the sender lives in `inner`, so this only fails if the store is gone
        let _ = rx.wait_for(|ready| *ready).await;
    }

    /// The current document
    pub async fn snapshot(&self) -> Arc<SiteContent> {
        Arc::clone(&*self.inner.state.read().await)
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<ContentChange> {
        self.inner.change_tx.subscribe()
    }

    /// Change notifications as a stream
    pub fn changes(&self) -> ChangeFeed<ContentChange> {
        broadcast_to_stream(self.subscribe())
    }

    /// Merge a partial document into the current one.
    ///
    /// Each present section overlays the current section field by field;
    /// lists present in the patch replace the current lists. The merged
    /// document is then saved locally and, if connected, pushed.
    #[instrument(skip_all)]
    pub async fn update(&self, patch: ContentPatch) -> UpdateOutcome {
        let _commit = self.inner.commit.lock().await;
        self.apply_local(patch).await
    }

    /// Build a patch from the current document and apply it as one write.
    ///
    /// `build` runs while writes are held off, so a patch derived from the
    /// current lists (appending an entry, say) cannot overwrite a write
    /// that landed in between. If `build` fails nothing is written.
    #[instrument(skip_all)]
    pub async fn update_with<E>(
        &self,
        build: impl FnOnce(&SiteContent) -> Result<ContentPatch, E>,
    ) -> Result<UpdateOutcome, E> {
        let _commit = self.inner.commit.lock().await;
        let current = Arc::clone(&*self.inner.state.read().await);
        let patch = build(&current)?;
        Ok(self.apply_local(patch).await)
    }

    /// Merge, save and push a local patch. Callers hold `commit`.
    async fn apply_local(&self, patch: ContentPatch) -> UpdateOutcome {
        let content = {
            let mut state = self.inner.state.write().await;
            let next = Arc::new(state.merged(patch, ListMerge::Replace));
            *state = Arc::clone(&next);
            next
        };
        log_schema_issues(&content);

        let mut warnings = Vec::new();
        if let Err(e) = self.inner.local.save_content(&content).await {
            warn!(error = %e, "Failed to save content locally");
            warnings.push(SyncWarning::LocalPersist(e.to_string()));
        }
        if let Some(warning) = self.push(&content).await {
            warnings.push(warning);
        }

        self.notify(&content, ChangeOrigin::Local, &warnings);
        UpdateOutcome { content, warnings }
    }

    /// Decode a JSON patch strictly and apply it.
    pub async fn update_json(&self, patch: serde_json::Value) -> CmsResult<UpdateOutcome> {
        let patch = ContentPatch::decode_strict(patch)?;
        Ok(self.update(patch).await)
    }

    /// Replace the document with the defaults.
    ///
    /// Clears the local copy and, if connected, overwrites the remote node.
    #[instrument(skip_all)]
    pub async fn reset(&self) -> UpdateOutcome {
        let _commit = self.inner.commit.lock().await;

        let content = Arc::new(SiteContent::default());
        *self.inner.state.write().await = Arc::clone(&content);

        let mut warnings = Vec::new();
        if let Err(e) = self.inner.local.clear_content().await {
            warn!(error = %e, "Failed to clear local content");
            warnings.push(SyncWarning::LocalPersist(e.to_string()));
        }
        if let Some(warning) = self.push(&content).await {
            warnings.push(warning);
        }

        info!("Content reset to defaults");
        self.notify(&content, ChangeOrigin::Reset, &warnings);
        UpdateOutcome { content, warnings }
    }

    /// Merge a remote snapshot into the current document.
    ///
    /// Called for every snapshot the remote delivers. The snapshot is
    /// decoded leniently and merged over the current document (not over
    /// the defaults), saved locally, and never pushed back. Returns whether
    /// the document changed.
    #[instrument(skip_all)]
    pub async fn reconcile(&self, snapshot: RemoteSnapshot) -> bool {
        if snapshot.is_null() {
            debug!("Remote node is empty, keeping local content");
            return false;
        }
        let decoded = match ContentPatch::decode(snapshot) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(error = %e, "Skipping malformed remote snapshot");
                return false;
            }
        };
        for rejected in &decoded.rejected {
            warn!(
                section = %rejected.section,
                reason = %rejected.reason,
                "Dropping malformed remote section"
            );
        }

        let _commit = self.inner.commit.lock().await;
        let content = {
            let mut state = self.inner.state.write().await;
            let next = state.merged(decoded.patch, self.inner.config.remote_list_merge);
            if next == **state {
                trace!("Remote snapshot matches local content");
                return false;
            }
            let next = Arc::new(next);
            *state = Arc::clone(&next);
            next
        };

        let mut warnings = Vec::new();
        if let Err(e) = self.inner.local.save_content(&content).await {
            warn!(error = %e, "Failed to save remote content locally");
            warnings.push(SyncWarning::LocalPersist(e.to_string()));
        }

        debug!("Applied remote snapshot");
        self.notify(&content, ChangeOrigin::Remote, &warnings);
        true
    }

    /// Connect to a remote and start reconciling its snapshots.
    ///
    /// Replaces any existing connection. Parameters from
    /// [`ConnectionSource::Operator`] are persisted so later sessions
    /// reconnect on their own. On failure the store keeps running
    /// local-only and the previous connection, if any, is left in place.
    #[instrument(skip(self, config), fields(endpoint = %config.endpoint()))]
    pub async fn connect(&self, config: RemoteConfig, source: ConnectionSource) -> CmsResult<()> {
        let connector = self.inner.connector.as_ref().ok_or(CmsError::NoConnector)?;
        let remote = connector.connect(&config).await.map_err(|e| {
            warn!(error = %e, "Remote connection failed");
            CmsError::from(e)
        })?;

        if source.persists() {
            if let Err(e) = self.inner.local.save_remote_config(&config).await {
                warn!(error = %e, "Failed to remember remote config");
            }
        }

        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let listener = CancellationToken::new();
        self.spawn_listener(Arc::clone(&remote), generation, listener.clone());

        let previous = self.inner.remote.write().await.replace(ActiveRemote {
            remote,
            source,
            generation,
            listener,
        });
        if previous.is_some() {
            debug!("Replaced previous remote connection");
        }

        info!(?source, "Connected to remote");
        Ok(())
    }

    /// Drop the remote connection.
    ///
    /// With `forget`, persisted operator parameters are removed too so the
    /// next session starts local-only.
    pub async fn disconnect(&self, forget: bool) -> bool {
        let previous = self.inner.remote.write().await.take();
        if forget {
            if let Err(e) = self.inner.local.clear_remote_config().await {
                warn!(error = %e, "Failed to forget remote config");
            }
        }
        if previous.is_some() {
            info!(forget, "Disconnected from remote");
        }
        previous.is_some()
    }

    /// Current connection state
    pub async fn connection_status(&self) -> ConnectionStatus {
        match &*self.inner.remote.read().await {
            Some(active) => ConnectionStatus {
                connected: true,
                source: Some(active.source),
                endpoint: Some(active.remote.endpoint()),
            },
            None => ConnectionStatus::local_only(),
        }
    }

    /// Whether a remote is connected
    pub async fn is_connected(&self) -> bool {
        self.inner.remote.read().await.is_some()
    }

    async fn push(&self, content: &SiteContent) -> Option<SyncWarning> {
        let remote = self
            .inner
            .remote
            .read()
            .await
            .as_ref()
            .map(|active| Arc::clone(&active.remote))?;
        match remote.push(content).await {
            Ok(()) => None,
            Err(e) => {
                warn!(error = %e, "Failed to push content to remote");
                Some(SyncWarning::RemotePush(e.to_string()))
            }
        }
    }

    fn notify(&self, content: &Arc<SiteContent>, origin: ChangeOrigin, warnings: &[SyncWarning]) {
        // no receivers is fine
        let _ = self.inner.change_tx.send(ContentChange {
            content: Arc::clone(content),
            origin,
            warnings: warnings.to_vec(),
        });
    }

    /// Spawn the task feeding remote snapshots into `reconcile`.
    ///
    /// Holds only a weak reference so a dropped store stops its listener.
    fn spawn_listener(&self, remote: Arc<dyn RemoteSync>, generation: u64, cancel: CancellationToken) {
        let weak: Weak<StoreInner> = Arc::downgrade(&self.inner);
        let mut snapshots = remote.snapshots();
        drop(remote);

        tokio::spawn(async move {
            loop {
                let snapshot = tokio::select! {
                    _ = cancel.cancelled() => break,
                    next = snapshots.next() => next,
                };
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                let store = ContentStore { inner };
                match snapshot {
                    Some(snapshot) => {
                        store.reconcile(snapshot).await;
                    }
                    None => {
                        warn!("Remote subscription ended");
                        store.remote_ended(generation).await;
                        break;
                    }
                }
            }
            trace!(generation, "Remote listener stopped");
        });
    }

    async fn remote_ended(&self, generation: u64) {
        let mut remote = self.inner.remote.write().await;
        if remote.as_ref().is_some_and(|active| active.generation == generation) {
            *remote = None;
        }
    }
}

fn log_schema_issues(content: &SiteContent) {
    for issue in content.validate() {
        warn!(%issue, "Content schema issue");
    }
}
