//! Hosted realtime database adapter
//!
//! Talks to the database's REST surface: `GET <node>.json` probes and
//! loads the node on connect, `PUT <node>.json` replaces it on push, and a
//! long-lived `GET` with `Accept: text/event-stream` delivers `put`/`patch`
//! events that are applied to a cached copy of the node. After each event
//! the whole cached node is published to subscribers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use folio_core::{RemoteConfig, SiteContent};
use futures::StreamExt;
use reqwest::header::{ACCEPT, HeaderValue};
use serde_json::Value;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, trace, warn};

use crate::error::{SyncError, SyncResult};
use crate::sse::{PathUpdate, SseParser, UpdateKind, apply_update};
use crate::stream::watch_to_stream;
use crate::{RemoteConnector, RemoteSync, SnapshotStream};

/// Tuning for the realtime database adapter
#[derive(Debug, Clone)]
pub struct RealtimeDbOptions {
    /// Timeout for the connect probe and for pushes
    pub request_timeout: Duration,
    /// First reconnect delay for the event stream
    pub reconnect_min: Duration,
    /// Cap on the reconnect delay
    pub reconnect_max: Duration,
}

impl Default for RealtimeDbOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            reconnect_min: Duration::from_secs(1),
            reconnect_max: Duration::from_secs(64),
        }
    }
}

impl RealtimeDbOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the reconnect delay range
    pub fn with_reconnect(mut self, min: Duration, max: Duration) -> Self {
        self.reconnect_min = min;
        self.reconnect_max = max.max(min);
        self
    }

    /// Exponential backoff: `min * 2^failures`, capped at `max`.
    pub fn backoff(&self, failures: u32) -> Duration {
        let factor = 2u32.saturating_pow(failures.min(16));
        self.reconnect_min
            .saturating_mul(factor)
            .min(self.reconnect_max)
    }
}

/// Connector for hosted realtime databases
#[derive(Debug, Clone)]
pub struct RealtimeDbConnector {
    client: reqwest::Client,
    options: RealtimeDbOptions,
}

impl RealtimeDbConnector {
    /// Create a connector with default options
    pub fn new() -> SyncResult<Self> {
        Self::with_options(RealtimeDbOptions::default())
    }

    /// Create a connector with custom options
    pub fn with_options(options: RealtimeDbOptions) -> SyncResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(SyncError::transport)?;
        Ok(Self { client, options })
    }
}

#[async_trait]
impl RemoteConnector for RealtimeDbConnector {
    #[instrument(skip(self, config), fields(endpoint = %config.endpoint()))]
    async fn connect(&self, config: &RemoteConfig) -> SyncResult<Arc<dyn RemoteSync>> {
        config.check()?;
        let endpoint = config.endpoint();
        let node = NodeUrl::new(config);

        let response = node
            .request(self.client.get(&node.url))
            .timeout(self.options.request_timeout)
            .send()
            .await
            .map_err(|e| SyncError::unreachable(&endpoint, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }
        let initial: Value = response
            .json()
            .await
            .map_err(|e| SyncError::unreachable(&endpoint, e))?;

        info!("Connected to realtime database");

        let (tx, _rx) = watch::channel(Some(initial));
        let tx = Arc::new(tx);
        let cancel = CancellationToken::new();

        tokio::spawn(listen(
            self.client.clone(),
            node.clone(),
            Arc::clone(&tx),
            self.options.clone(),
            cancel.clone(),
        ));

        Ok(Arc::new(RealtimeDbRemote {
            client: self.client.clone(),
            node,
            options: self.options.clone(),
            endpoint,
            tx,
            cancel,
        }))
    }
}

/// `<databaseURL>/<node>.json` plus the optional access token
#[derive(Debug, Clone)]
struct NodeUrl {
    url: String,
    auth_token: Option<String>,
}

impl NodeUrl {
    fn new(config: &RemoteConfig) -> Self {
        Self {
            url: format!("{}.json", config.endpoint()),
            auth_token: config.auth_token.clone(),
        }
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => builder.query(&[("auth", token)]),
            None => builder,
        }
    }
}

/// A live connection to one realtime database node.
///
/// Dropping it stops the event listener.
pub struct RealtimeDbRemote {
    client: reqwest::Client,
    node: NodeUrl,
    options: RealtimeDbOptions,
    endpoint: String,
    tx: Arc<watch::Sender<Option<Value>>>,
    cancel: CancellationToken,
}

impl std::fmt::Debug for RealtimeDbRemote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeDbRemote")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl Drop for RealtimeDbRemote {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[async_trait]
impl RemoteSync for RealtimeDbRemote {
    async fn push(&self, content: &SiteContent) -> SyncResult<()> {
        let response = self
            .node
            .request(self.client.put(&self.node.url))
            .timeout(self.options.request_timeout)
            .json(content)
            .send()
            .await
            .map_err(SyncError::transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }
        trace!(endpoint = %self.endpoint, "Pushed document");
        Ok(())
    }

    fn snapshots(&self) -> SnapshotStream {
        watch_to_stream(self.tx.subscribe())
    }

    fn endpoint(&self) -> String {
        self.endpoint.clone()
    }
}

/// Keep an event stream open until cancelled, reconnecting with backoff.
async fn listen(
    client: reqwest::Client,
    node: NodeUrl,
    tx: Arc<watch::Sender<Option<Value>>>,
    options: RealtimeDbOptions,
    cancel: CancellationToken,
) {
    let mut failures: u32 = 0;
    loop {
        let result = tokio::select! {
            _ = cancel.cancelled() => break,
            result = stream_events(&client, &node, &tx) => result,
        };
        match result {
            Ok(()) => {
                debug!(url = %node.url, "Event stream closed, reconnecting");
                failures = 0;
            }
            Err(e) => {
                failures = failures.saturating_add(1);
                warn!(url = %node.url, error = %e, failures, "Event stream failed");
            }
        }

        let delay = options.backoff(failures);
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }
    debug!(url = %node.url, "Event listener stopped");
}

/// Run one event stream to completion.
async fn stream_events(
    client: &reqwest::Client,
    node: &NodeUrl,
    tx: &watch::Sender<Option<Value>>,
) -> SyncResult<()> {
    let response = node
        .request(client.get(&node.url))
        .header(ACCEPT, HeaderValue::from_static("text/event-stream"))
        .send()
        .await
        .map_err(SyncError::transport)?;
    let status = response.status();
    if !status.is_success() {
        return Err(SyncError::Status {
            endpoint: node.url.clone(),
            status: status.as_u16(),
        });
    }

    let mut cached = tx.borrow().clone().unwrap_or(Value::Null);
    let mut parser = SseParser::new();
    let mut body = response.bytes_stream();

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(SyncError::transport)?;
        for event in parser.feed(&chunk) {
            let kind = match event.event.as_str() {
                "put" => UpdateKind::Put,
                "patch" => UpdateKind::Patch,
                "keep-alive" => continue,
                "cancel" => return Err(SyncError::Rejected(event.data)),
                "auth_revoked" => return Err(SyncError::Rejected("auth revoked".to_string())),
                other => {
                    trace!(event = other, "Ignoring event");
                    continue;
                }
            };
            match serde_json::from_str::<PathUpdate>(&event.data) {
                Ok(update) => {
                    apply_update(&mut cached, kind, update);
                    tx.send_replace(Some(cached.clone()));
                }
                Err(e) => warn!(error = %e, "Skipping malformed event payload"),
            }
        }
    }
    Ok(())
}
