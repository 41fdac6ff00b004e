//! Out-of-band delivery of recovery codes.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::info;

/// Delivers a recovery code to the site owner.
///
/// Codes never travel through the content document, so whatever implements
/// this is the only place the cleartext leaves the process.
#[async_trait]
pub trait RecoveryRelay: Send + Sync {
    /// Deliver `code`; the error message is reported to the caller
    async fn deliver(&self, code: &str) -> Result<(), String>;
}

/// Log target of [`LogRelay`] events
pub const RECOVERY_LOG_TARGET: &str = "folio::recovery";

/// Writes the code to the process log under [`RECOVERY_LOG_TARGET`].
///
/// Anyone who can read that log can take over the admin account while the
/// code is valid. Keep the target out of shipped or shared logs, e.g. with
/// a `folio::recovery=off` directive on those outputs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRelay;

#[async_trait]
impl RecoveryRelay for LogRelay {
    async fn deliver(&self, code: &str) -> Result<(), String> {
        info!(target: RECOVERY_LOG_TARGET, code, "Admin recovery code issued");
        Ok(())
    }
}

/// Sends codes into an mpsc channel
#[derive(Debug, Clone)]
pub struct ChannelRelay {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelRelay {
    /// Create a relay and the receiving end of its channel
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl RecoveryRelay for ChannelRelay {
    async fn deliver(&self, code: &str) -> Result<(), String> {
        self.tx
            .send(code.to_string())
            .map_err(|_| "recovery channel closed".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_relay_delivers() {
        let (relay, mut rx) = ChannelRelay::new();
        relay.deliver("123456").await.unwrap();
        assert_eq!(rx.recv().await.as_deref(), Some("123456"));
    }

    #[tokio::test]
    async fn test_channel_relay_closed() {
        let (relay, rx) = ChannelRelay::new();
        drop(rx);
        assert!(relay.deliver("123456").await.is_err());
    }
}
