//! Store and auth configuration

use std::time::Duration;

use folio_core::{ListMerge, RemoteConfig};
use serde::{Deserialize, Serialize};

/// Configuration for a [`ContentStore`](crate::ContentStore)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Remote connection compiled into the deployment; connected on open
    pub built_in_remote: Option<RemoteConfig>,
    /// How list fields of remote snapshots combine with local lists
    pub remote_list_merge: ListMerge,
    /// Capacity of the change notification channel
    pub change_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            built_in_remote: None,
            remote_list_merge: ListMerge::Replace,
            change_capacity: 256,
        }
    }
}

impl StoreConfig {
    /// Set the built-in remote
    pub fn with_built_in_remote(mut self, config: RemoteConfig) -> Self {
        self.built_in_remote = Some(config);
        self
    }

    /// Set the remote list merge policy
    pub fn with_remote_list_merge(mut self, policy: ListMerge) -> Self {
        self.remote_list_merge = policy;
        self
    }

    /// Set the change channel capacity
    pub fn with_change_capacity(mut self, capacity: usize) -> Self {
        self.change_capacity = capacity.max(1);
        self
    }
}

/// Configuration for an [`AuthGate`](crate::AuthGate)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Session lifetime in seconds
    pub session_ttl_secs: u64,
    /// Recovery code lifetime in seconds
    pub recovery_ttl_secs: u64,
    /// Wrong codes allowed before a recovery code is burned
    pub recovery_attempts: u32,
    /// Lifetime of a verified recovery ticket in seconds
    pub ticket_ttl_secs: u64,
    /// Minimum length for new passwords
    pub min_password_len: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: 8 * 60 * 60,
            recovery_ttl_secs: 15 * 60,
            recovery_attempts: 5,
            ticket_ttl_secs: 10 * 60,
            min_password_len: 6,
        }
    }
}

impl AuthConfig {
    /// Set the session lifetime
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl_secs = ttl.as_secs();
        self
    }

    /// Set the recovery code lifetime
    pub fn with_recovery_ttl(mut self, ttl: Duration) -> Self {
        self.recovery_ttl_secs = ttl.as_secs();
        self
    }

    /// Set the recovery attempt budget
    pub fn with_recovery_attempts(mut self, attempts: u32) -> Self {
        self.recovery_attempts = attempts.max(1);
        self
    }

    /// Session lifetime
    pub fn session_ttl(&self) -> chrono::Duration {
        secs(self.session_ttl_secs)
    }

    /// Recovery code lifetime
    pub fn recovery_ttl(&self) -> chrono::Duration {
        secs(self.recovery_ttl_secs)
    }

    /// Ticket lifetime
    pub fn ticket_ttl(&self) -> chrono::Duration {
        secs(self.ticket_ttl_secs)
    }
}

// Longer lifetimes are clamped so expiry arithmetic cannot overflow
const MAX_TTL_SECS: u64 = 100 * 365 * 24 * 60 * 60;

fn secs(value: u64) -> chrono::Duration {
    chrono::Duration::seconds(value.min(MAX_TTL_SECS) as i64)
}
