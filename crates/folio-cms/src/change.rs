//! Change notifications and write outcomes.

use std::fmt;
use std::sync::Arc;

use folio_core::{ConnectionSource, SiteContent};
use serde::Serialize;

/// A non-fatal I/O failure during a write.
///
/// The in-memory document was still updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum SyncWarning {
    /// Saving or clearing the local copy failed
    LocalPersist(String),
    /// Pushing to the remote failed
    RemotePush(String),
}

impl fmt::Display for SyncWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncWarning::LocalPersist(reason) => write!(f, "local save failed: {reason}"),
            SyncWarning::RemotePush(reason) => write!(f, "remote push failed: {reason}"),
        }
    }
}

/// What caused a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOrigin {
    /// An `update` call
    Local,
    /// A remote snapshot
    Remote,
    /// A `reset` call
    Reset,
}

/// A change notification.
///
/// `content` is the new document; the previous one is never mutated.
#[derive(Debug, Clone)]
pub struct ContentChange {
    pub content: Arc<SiteContent>,
    pub origin: ChangeOrigin,
    pub warnings: Vec<SyncWarning>,
}

/// Result of `update` and `reset`
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    /// The document after the write
    pub content: Arc<SiteContent>,
    /// I/O failures that did not stop the write
    pub warnings: Vec<SyncWarning>,
}

impl UpdateOutcome {
    /// True when every side effect succeeded
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Remote connection state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionStatus {
    pub connected: bool,
    pub source: Option<ConnectionSource>,
    pub endpoint: Option<String>,
}

impl ConnectionStatus {
    pub(crate) fn local_only() -> Self {
        Self {
            connected: false,
            source: None,
            endpoint: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_wire_shape() {
        let value = serde_json::to_value(SyncWarning::RemotePush("timeout".into())).unwrap();
        assert_eq!(value, serde_json::json!({"kind": "remote_push", "message": "timeout"}));
    }

    #[test]
    fn test_warning_display() {
        let warning = SyncWarning::LocalPersist("quota".into());
        assert_eq!(warning.to_string(), "local save failed: quota");
    }
}
