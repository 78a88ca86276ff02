//! Token lifecycle management.
//!
//! Owns the auth token and its issuance timestamp in durable storage.
//! A token is valid for 24 hours from issuance; `read()` self-heals on
//! expiry so no caller ever observes a stale token as valid.

use std::sync::Arc;

use chrono::Utc;
use shopfront_core::keys;
use shopfront_core::storage::KeyValueStorage;

/// How long a token stays valid after issuance: 24 hours.
pub const TOKEN_TTL_MS: i64 = 86_400_000;

/// Result of a non-destructive expiry check.
///
/// Distinguishes "no token" (`is_valid` and `is_expired` both false)
/// from "expired token" so startup can show a distinct expiry notice
/// instead of a silent unauthenticated state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStatus {
    pub is_valid: bool,
    pub is_expired: bool,
    pub token: Option<String>,
}

impl TokenStatus {
    fn absent() -> Self {
        Self {
            is_valid: false,
            is_expired: false,
            token: None,
        }
    }
}

/// Manages the auth token's value, issuance time, and expiry in the
/// persistent store.
///
/// Failure semantics: storage errors are logged and treated as "no
/// token" — the client fails closed toward unauthenticated rather than
/// surfacing storage faults into auth flows.
#[derive(Debug, Clone)]
pub struct TokenManager {
    storage: Arc<dyn KeyValueStorage>,
}

impl TokenManager {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Persist a token with `issued_at = now`. Overwrites any prior
    /// token. If the issue-time write fails the token key is removed
    /// again, so storage never holds a token paired with a stale issue
    /// time.
    pub async fn store(&self, token: &str) -> bool {
        let issued_at = Utc::now().timestamp_millis();

        if let Err(err) = self.storage.set(keys::AUTH_TOKEN, token).await {
            tracing::warn!("failed to persist auth token: {err}");
            return false;
        }
        if let Err(err) = self
            .storage
            .set(keys::TOKEN_ISSUED_AT, &issued_at.to_string())
            .await
        {
            tracing::warn!("failed to persist token issue time: {err}");
            if let Err(err) = self
                .storage
                .remove_many(&[keys::AUTH_TOKEN, keys::TOKEN_ISSUED_AT])
                .await
            {
                tracing::warn!("failed to roll back partial token write: {err}");
            }
            return false;
        }
        true
    }

    /// Read the token, evaluating expiry.
    ///
    /// Returns `None` when absent. When present but older than
    /// [`TOKEN_TTL_MS`], purges all auth state (token, issuance time,
    /// cached profile) and returns `None` — callers never see an
    /// expired token as valid.
    pub async fn read(&self) -> Option<String> {
        let status = self.check_expiry().await;
        if status.is_expired {
            self.clear().await;
            return None;
        }
        status.token
    }

    /// Non-destructive expiry check used by startup reconciliation.
    ///
    /// A token with a missing or garbled issuance timestamp is reported
    /// as expired: without a trustworthy issue time the 24 h bound
    /// cannot be established.
    pub async fn check_expiry(&self) -> TokenStatus {
        let token = match self.storage.get(keys::AUTH_TOKEN).await {
            Ok(Some(token)) => token,
            Ok(None) => return TokenStatus::absent(),
            Err(err) => {
                tracing::warn!("failed to read auth token: {err}");
                return TokenStatus::absent();
            }
        };

        let issued_at = match self.storage.get(keys::TOKEN_ISSUED_AT).await {
            Ok(Some(raw)) => raw.parse::<i64>().ok(),
            Ok(None) => None,
            Err(err) => {
                tracing::warn!("failed to read token issue time: {err}");
                return TokenStatus::absent();
            }
        };

        let Some(issued_at) = issued_at else {
            return TokenStatus {
                is_valid: false,
                is_expired: true,
                token: Some(token),
            };
        };

        let age = Utc::now().timestamp_millis() - issued_at;
        if age > TOKEN_TTL_MS {
            TokenStatus {
                is_valid: false,
                is_expired: true,
                token: Some(token),
            }
        } else {
            TokenStatus {
                is_valid: true,
                is_expired: false,
                token: Some(token),
            }
        }
    }

    /// Remove token, issuance time, and cached profile as one logical
    /// unit. Storage errors are logged; the clear is best-effort.
    pub async fn clear(&self) {
        if let Err(err) = self.storage.remove_many(keys::AUTH_STATE).await {
            tracing::warn!("failed to clear auth state: {err}");
        }
    }
}
