//! Session coordination — startup restoration, sign-in, and logout.
//!
//! The coordinator reconciles durable storage, the token lifecycle, and
//! the remote profile endpoint into a single authenticated or
//! unauthenticated decision. State transitions are broadcast over a
//! `tokio::sync::watch` channel so UI layers can react across tasks.

use std::sync::Arc;

use tokio::sync::{watch, RwLock};

use shopfront_core::keys;
use shopfront_core::models::UserProfile;
use shopfront_core::storage::KeyValueStorage;
use shopfront_core::validation::{self, ValidationError};

use crate::error::GatewayError;
use crate::gateway::RemoteGateway;
use crate::token::TokenManager;

/// Authentication state of the running client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Process start; nothing decided yet.
    Unknown,
    /// Restoration in progress.
    Restoring,
    Authenticated,
    Unauthenticated,
}

/// Errors from coordinator-level auth flows.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[derive(Debug)]
struct SessionInner {
    state: SessionState,
    token: Option<String>,
    profile: Option<UserProfile>,
    endpoint: Option<String>,
    /// Set when restoration detects an expired token; consumed once.
    expiry_notice: bool,
}

/// Coordinates the session lifecycle over the token manager, durable
/// storage, and the remote gateway. Constructed once at startup and
/// shared by handle.
pub struct SessionCoordinator {
    storage: Arc<dyn KeyValueStorage>,
    tokens: TokenManager,
    gateway: Arc<dyn RemoteGateway>,
    inner: RwLock<SessionInner>,
    state_tx: watch::Sender<SessionState>,
}

impl SessionCoordinator {
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        tokens: TokenManager,
        gateway: Arc<dyn RemoteGateway>,
    ) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Unknown);
        Self {
            storage,
            tokens,
            gateway,
            inner: RwLock::new(SessionInner {
                state: SessionState::Unknown,
                token: None,
                profile: None,
                endpoint: None,
                expiry_notice: false,
            }),
            state_tx,
        }
    }

    // ─── Accessors ──────────────────────────────────────────────────

    pub async fn state(&self) -> SessionState {
        self.inner.read().await.state
    }

    pub async fn profile(&self) -> Option<UserProfile> {
        self.inner.read().await.profile.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.inner.read().await.token.clone()
    }

    /// The remote endpoint loaded from storage during restoration, if
    /// one was ever configured. Pass-through for the embedding app.
    pub async fn configured_endpoint(&self) -> Option<String> {
        self.inner.read().await.endpoint.clone()
    }

    /// Subscribe to session state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Consume the one-shot session-expired notice. Returns `true` at
    /// most once per detected expiry.
    pub async fn take_expiry_notice(&self) -> bool {
        let mut inner = self.inner.write().await;
        std::mem::take(&mut inner.expiry_notice)
    }

    // ─── Lifecycle ──────────────────────────────────────────────────

    /// Reconcile stored token and cached profile into an authenticated
    /// or unauthenticated session at process start.
    ///
    /// Expiry is checked before any cached profile is trusted: a stale
    /// profile must never be surfaced for an expired session.
    pub async fn restore_session(&self) -> SessionState {
        self.transition(SessionState::Restoring).await;

        // Previously configured endpoint, if any. Collaborator concern.
        let endpoint = self.read_key(keys::API_BASE_URL).await;
        self.inner.write().await.endpoint = endpoint;

        let status = self.tokens.check_expiry().await;
        if status.is_expired {
            self.tokens.clear().await;
            {
                let mut inner = self.inner.write().await;
                inner.token = None;
                inner.profile = None;
                inner.expiry_notice = true;
            }
            tracing::debug!("stored token expired; session not restored");
            return self.transition(SessionState::Unauthenticated).await;
        }

        let Some(token) = self.tokens.read().await else {
            return self.transition(SessionState::Unauthenticated).await;
        };

        if let Some(profile) = self.read_cached_profile().await {
            let mut inner = self.inner.write().await;
            inner.token = Some(token);
            inner.profile = Some(profile);
            drop(inner);
            return self.transition(SessionState::Authenticated).await;
        }

        // Token but no cached profile: ask the server. Any failure here
        // (rejected token, network) fails closed to unauthenticated.
        match self.gateway.get_profile().await {
            Ok(profile) => {
                self.persist_profile(&profile).await;
                let mut inner = self.inner.write().await;
                inner.token = Some(token);
                inner.profile = Some(profile);
                drop(inner);
                self.transition(SessionState::Authenticated).await
            }
            Err(err) => {
                tracing::warn!("profile refetch failed during restore: {err}");
                self.tokens.clear().await;
                let mut inner = self.inner.write().await;
                inner.token = None;
                inner.profile = None;
                drop(inner);
                self.transition(SessionState::Unauthenticated).await
            }
        }
    }

    /// Validate credentials locally, sign in remotely, fetch and cache
    /// the profile, and mark the session authenticated.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile, SessionError> {
        validation::validate_email(email)?;
        validation::validate_password(password)?;

        // The gateway stores the access token on success.
        self.gateway.sign_in(email, password).await?;
        let profile = self.gateway.get_profile().await?;

        self.persist_profile(&profile).await;
        {
            let mut inner = self.inner.write().await;
            inner.token = self.tokens.read().await;
            inner.profile = Some(profile.clone());
        }
        self.transition(SessionState::Authenticated).await;
        Ok(profile)
    }

    /// Purge all auth state and any in-progress sign-up scratch data.
    /// Idempotent: a second call has no additional effect.
    pub async fn logout(&self) {
        self.tokens.clear().await;
        if let Err(err) = self.storage.remove(keys::PENDING_SIGNUP).await {
            tracing::warn!("failed to clear pending signup data: {err}");
        }
        {
            let mut inner = self.inner.write().await;
            inner.token = None;
            inner.profile = None;
        }
        self.transition(SessionState::Unauthenticated).await;
    }

    /// Set and persist the in-memory profile. Does not change the
    /// authentication state.
    pub async fn save_profile(&self, profile: UserProfile) {
        self.persist_profile(&profile).await;
        self.inner.write().await.profile = Some(profile);
    }

    // ─── Internal helpers ───────────────────────────────────────────

    async fn transition(&self, next: SessionState) -> SessionState {
        self.inner.write().await.state = next;
        let _ = self.state_tx.send(next);
        next
    }

    async fn read_key(&self, key: &str) -> Option<String> {
        match self.storage.get(key).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("failed to read {key}: {err}");
                None
            }
        }
    }

    async fn read_cached_profile(&self) -> Option<UserProfile> {
        let raw = self.read_key(keys::USER_PROFILE).await?;
        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(err) => {
                tracing::warn!("discarding unparseable cached profile: {err}");
                None
            }
        }
    }

    async fn persist_profile(&self, profile: &UserProfile) {
        match serde_json::to_string(profile) {
            Ok(json) => {
                if let Err(err) = self.storage.set(keys::USER_PROFILE, &json).await {
                    tracing::warn!("failed to cache profile: {err}");
                }
            }
            Err(err) => tracing::warn!("failed to encode profile: {err}"),
        }
    }
}
