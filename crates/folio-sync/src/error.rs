//! Error types for folio-sync

use folio_core::ContentError;
use thiserror::Error;

/// Errors from remote sync adapters
#[derive(Debug, Error)]
pub enum SyncError {
    /// Connection parameters were rejected before any I/O
    #[error(transparent)]
    InvalidConfig(#[from] ContentError),

    /// The remote could not be reached
    #[error("Remote unreachable at {endpoint}: {reason}")]
    Unreachable {
        /// Node endpoint
        endpoint: String,
        /// Transport message
        reason: String,
    },

    /// The remote answered with a non-success status
    #[error("Remote returned HTTP {status} for {endpoint}")]
    Status {
        /// Node endpoint
        endpoint: String,
        /// HTTP status code
        status: u16,
    },

    /// The remote ended the subscription
    #[error("Remote rejected the subscription: {0}")]
    Rejected(String),

    /// Error during serialization
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Transport failure after connecting
    #[error("Transport error: {0}")]
    Transport(String),
}

impl SyncError {
    /// Create an Unreachable error
    pub fn unreachable(endpoint: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Unreachable {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a Transport error
    pub fn transport(reason: impl std::fmt::Display) -> Self {
        Self::Transport(reason.to_string())
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Serialization(err.to_string())
    }
}

/// Result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_is_transparent() {
        let err: SyncError = ContentError::invalid_remote_config("no host").into();
        assert_eq!(err.to_string(), "Invalid remote configuration: no host");
    }

    #[test]
    fn test_unreachable_message() {
        let err = SyncError::unreachable("https://db.example.app/site_content", "refused");
        assert!(err.to_string().contains("db.example.app"));
        assert!(err.to_string().contains("refused"));
    }
}
