//! Admin authentication.
//!
//! A single credential pair lives in the content document. [`AuthGate`]
//! checks it, hands out expiring session tokens and runs the three-step
//! password recovery: request a code, verify it for a one-shot ticket,
//! then redeem the ticket for new credentials.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use folio_core::{ContentPatch, CredentialsPatch};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::change::UpdateOutcome;
use crate::config::AuthConfig;
use crate::credentials::{hash_password, is_hashed, secure_eq, verify_password};
use crate::error::{CmsError, CmsResult};
use crate::relay::RecoveryRelay;
use crate::store::ContentStore;

/// A logged-in admin session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Proof that a recovery code was verified.
///
/// Redeemable once, before it expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecoveryTicket(String);

impl RecoveryTicket {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RecoveryTicket {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A recovery window: the outstanding code's digest and the attempts left.
///
/// The window outlives a burned code, and a new request inside it keeps
/// the remaining attempts and the original expiry.
struct PendingRecovery {
    digest: Option<blake3::Hash>,
    expires_at: DateTime<Utc>,
    attempts_left: u32,
}

struct AuthInner {
    store: ContentStore,
    config: AuthConfig,
    sessions: DashMap<String, DateTime<Utc>>,
    recovery: Mutex<Option<PendingRecovery>>,
    tickets: DashMap<String, DateTime<Utc>>,
    relay: Arc<dyn RecoveryRelay>,
}

/// Credential check and session registry for the admin surface
#[derive(Clone)]
pub struct AuthGate {
    inner: Arc<AuthInner>,
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("config", &self.inner.config)
            .field("sessions", &self.inner.sessions.len())
            .finish_non_exhaustive()
    }
}

impl AuthGate {
    pub fn new(store: ContentStore, config: AuthConfig, relay: Arc<dyn RecoveryRelay>) -> Self {
        Self {
            inner: Arc::new(AuthInner {
                store,
                config,
                sessions: DashMap::new(),
                recovery: Mutex::new(None),
                tickets: DashMap::new(),
                relay,
            }),
        }
    }

    /// The store whose credentials this gate checks
    pub fn store(&self) -> &ContentStore {
        &self.inner.store
    }

    /// Check a username and password and open a session.
    ///
    /// Any mismatch is reported as [`CmsError::InvalidCredentials`] without
    /// saying which part was wrong.
    pub async fn login(&self, username: &str, password: &str) -> CmsResult<Session> {
        let content = self.inner.store.snapshot().await;
        let credentials = &content.credentials;

        // evaluate both so timing does not reveal which one failed
        let user_ok = secure_eq(username, &credentials.username);
        let pass_ok = verify_password(password, &credentials.password);
        if !(user_ok && pass_ok) {
            debug!("Rejected admin login");
            return Err(CmsError::InvalidCredentials);
        }
        if !is_hashed(&credentials.password) {
            warn!("Admin password is stored in plaintext; set new credentials to hash it");
        }

        self.prune_expired();
        let token = new_token();
        let expires_at = Utc::now() + self.inner.config.session_ttl();
        self.inner.sessions.insert(token.clone(), expires_at);
        info!(%expires_at, "Admin logged in");
        Ok(Session { token, expires_at })
    }

    /// Check a session token
    pub fn authorize(&self, token: &str) -> CmsResult<()> {
        let expires_at = self
            .inner
            .sessions
            .get(token)
            .map(|entry| *entry.value())
            .ok_or(CmsError::Unauthorized)?;
        if Utc::now() >= expires_at {
            self.inner.sessions.remove(token);
            return Err(CmsError::Unauthorized);
        }
        Ok(())
    }

    /// End a session. Returns whether it existed.
    pub fn logout(&self, token: &str) -> bool {
        self.inner.sessions.remove(token).is_some()
    }

    /// Number of live sessions
    pub fn active_sessions(&self) -> usize {
        self.prune_expired();
        self.inner.sessions.len()
    }

    /// Replace the admin credentials.
    ///
    /// The password is hashed before it reaches the document, and any
    /// leftover recovery code is cleared in the same update.
    pub async fn change_credentials(&self, username: &str, password: &str) -> CmsResult<UpdateOutcome> {
        self.check_new_credentials(username, password)?;
        let hash = hash_password(password)?;

        let patch = ContentPatch {
            credentials: Some(CredentialsPatch {
                username: Some(username.trim().to_string()),
                password: Some(hash),
                recovery_code: Some(None),
            }),
            ..ContentPatch::default()
        };
        let outcome = self.inner.store.update(patch).await;
        info!("Admin credentials changed");
        Ok(outcome)
    }

    /// Issue a recovery code and hand it to the relay.
    ///
    /// Replaces any outstanding code. Inside an open window the new code
    /// inherits the window's expiry and remaining attempts; once they are
    /// spent, requests fail with [`CmsError::RecoveryLocked`] until the
    /// window closes. Returns when the code expires.
    pub async fn request_recovery(&self) -> CmsResult<DateTime<Utc>> {
        let now = Utc::now();
        let mut pending = self.inner.recovery.lock().await;
        let window = match pending.take() {
            Some(open) if now < open.expires_at => open,
            _ => PendingRecovery {
                digest: None,
                expires_at: now + self.inner.config.recovery_ttl(),
                attempts_left: self.inner.config.recovery_attempts.max(1),
            },
        };
        if window.attempts_left == 0 {
            let until = window.expires_at;
            *pending = Some(window);
            warn!(%until, "Recovery requested while locked out");
            return Err(CmsError::RecoveryLocked(until));
        }

        let code = format!("{:06}", rand::random_range(0..1_000_000u32));
        let expires_at = window.expires_at;
        let window = pending.insert(PendingRecovery {
            digest: Some(blake3::hash(code.as_bytes())),
            ..window
        });

        if let Err(reason) = self.inner.relay.deliver(&code).await {
            window.digest = None;
            warn!(%reason, "Failed to deliver recovery code");
            return Err(CmsError::Relay(reason));
        }

        info!(%expires_at, attempts_left = window.attempts_left, "Recovery code issued");
        Ok(expires_at)
    }

    /// Exchange a recovery code for a one-shot ticket.
    ///
    /// Each wrong code spends one attempt from the window's budget; when
    /// none are left the code is discarded and no new one is issued until
    /// the window closes.
    pub async fn verify_recovery(&self, code: &str) -> CmsResult<RecoveryTicket> {
        let mut guard = self.inner.recovery.lock().await;
        let Some(pending) = guard.as_mut() else {
            return Err(CmsError::InvalidCredentials);
        };

        if Utc::now() >= pending.expires_at {
            *guard = None;
            debug!("Recovery code expired");
            return Err(CmsError::InvalidCredentials);
        }

        let Some(digest) = pending.digest else {
            return Err(CmsError::InvalidCredentials);
        };
        if blake3::hash(code.trim().as_bytes()) != digest {
            pending.attempts_left = pending.attempts_left.saturating_sub(1);
            if pending.attempts_left == 0 {
                pending.digest = None;
                warn!(until = %pending.expires_at, "Recovery code discarded after too many wrong attempts");
            }
            return Err(CmsError::InvalidCredentials);
        }

        *guard = None;
        let token = new_token();
        self.inner
            .tickets
            .insert(token.clone(), Utc::now() + self.inner.config.ticket_ttl());
        debug!("Recovery code verified");
        Ok(RecoveryTicket(token))
    }

    /// Redeem a ticket for new credentials.
    ///
    /// All existing sessions are ended.
    pub async fn complete_recovery(
        &self,
        ticket: &RecoveryTicket,
        username: &str,
        password: &str,
    ) -> CmsResult<UpdateOutcome> {
        // validate first so a typo does not burn the ticket
        self.check_new_credentials(username, password)?;

        let (_, expires_at) = self
            .inner
            .tickets
            .remove(ticket.as_str())
            .ok_or(CmsError::InvalidCredentials)?;
        if Utc::now() >= expires_at {
            return Err(CmsError::InvalidCredentials);
        }

        let outcome = self.change_credentials(username, password).await?;
        self.inner.sessions.clear();
        info!("Admin credentials recovered");
        Ok(outcome)
    }

    fn check_new_credentials(&self, username: &str, password: &str) -> CmsResult<()> {
        if username.trim().is_empty() {
            return Err(CmsError::invalid_input("username must not be empty"));
        }
        let min = self.inner.config.min_password_len;
        if password.chars().count() < min {
            return Err(CmsError::invalid_input(format!(
                "password must be at least {min} characters"
            )));
        }
        Ok(())
    }

    fn prune_expired(&self) {
        let now = Utc::now();
        self.inner.sessions.retain(|_, expires_at| *expires_at > now);
        self.inner.tickets.retain(|_, expires_at| *expires_at > now);
    }
}

fn new_token() -> String {
    hex::encode(rand::random::<[u8; 32]>())
}
