//! Error types for folio-cms

use folio_core::ContentError;
use folio_sync::SyncError;
use thiserror::Error;

/// Errors returned by the content store and auth gate.
///
/// Local and remote I/O during `update`, `reset` and reconciliation never
/// surfaces here; it is reported as [`SyncWarning`](crate::SyncWarning).
#[derive(Debug, Error)]
pub enum CmsError {
    /// A submitted patch or config was malformed
    #[error(transparent)]
    Content(#[from] ContentError),

    /// No connector is configured, so the store runs local-only
    #[error("No remote connector configured")]
    NoConnector,

    /// Connecting to the remote failed
    #[error("Failed to connect to remote: {0}")]
    Connect(#[from] SyncError),

    /// Wrong username, password, recovery code or ticket.
    ///
    /// Deliberately does not say which.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, unknown or expired session
    #[error("Unauthorized")]
    Unauthorized,

    /// Input that cannot be accepted as new credentials
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Recovery attempts are spent until the given time
    #[error("Too many recovery attempts, try again after {0}")]
    RecoveryLocked(chrono::DateTime<chrono::Utc>),

    /// The recovery relay failed to deliver a code
    #[error("Recovery relay failed: {0}")]
    Relay(String),

    /// Password hashing failed
    #[error("Credential hashing failed: {0}")]
    Hashing(String),
}

impl CmsError {
    /// Create an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

/// Result type for folio-cms operations
pub type CmsResult<T> = Result<T, CmsError>;
