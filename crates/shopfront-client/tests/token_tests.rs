//! Token lifecycle tests.
//!
//! Covers expiry monotonicity: a token younger than 24 hours reads back
//! unchanged; an older one reads as absent and self-heals by purging
//! all auth state.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use shopfront_client::{TokenManager, TOKEN_TTL_MS};
use shopfront_core::{keys, KeyValueStorage, MemoryStorage, StorageError};

fn setup() -> (TokenManager, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    (TokenManager::new(storage.clone()), storage)
}

/// Backdate the stored issue time so the token looks `age_ms` old.
async fn backdate(storage: &MemoryStorage, age_ms: i64) {
    let issued_at = Utc::now().timestamp_millis() - age_ms;
    storage
        .set(keys::TOKEN_ISSUED_AT, &issued_at.to_string())
        .await
        .unwrap();
}

// ── read() within TTL ───────────────────────────────────────────

#[tokio::test]
async fn fresh_token_reads_back_unchanged() {
    let (mgr, _) = setup();
    mgr.store("tok-fresh").await;
    assert_eq!(mgr.read().await, Some("tok-fresh".to_string()));
    // Reading again doesn't consume it.
    assert_eq!(mgr.read().await, Some("tok-fresh".to_string()));
}

#[tokio::test]
async fn token_just_inside_ttl_is_still_valid() {
    let (mgr, storage) = setup();
    mgr.store("tok-old-but-ok").await;
    backdate(&storage, TOKEN_TTL_MS - 60_000).await;

    assert_eq!(mgr.read().await, Some("tok-old-but-ok".to_string()));
}

// ── read() past TTL ─────────────────────────────────────────────

#[tokio::test]
async fn expired_token_reads_as_absent_and_purges_auth_state() {
    let (mgr, storage) = setup();
    mgr.store("tok-stale").await;
    storage.set(keys::USER_PROFILE, "{}").await.unwrap();
    backdate(&storage, 25 * 60 * 60 * 1000).await;

    assert_eq!(mgr.read().await, None);

    // Self-healing: token, issue time, and cached profile all gone.
    assert_eq!(storage.get(keys::AUTH_TOKEN).await.unwrap(), None);
    assert_eq!(storage.get(keys::TOKEN_ISSUED_AT).await.unwrap(), None);
    assert_eq!(storage.get(keys::USER_PROFILE).await.unwrap(), None);
}

#[tokio::test]
async fn token_just_past_ttl_is_expired() {
    let (mgr, storage) = setup();
    mgr.store("tok").await;
    backdate(&storage, TOKEN_TTL_MS + 1_000).await;

    assert_eq!(mgr.read().await, None);
}

// ── check_expiry() ──────────────────────────────────────────────

#[tokio::test]
async fn check_expiry_distinguishes_absent_from_expired() {
    let (mgr, storage) = setup();

    let status = mgr.check_expiry().await;
    assert!(!status.is_valid);
    assert!(!status.is_expired);
    assert_eq!(status.token, None);

    mgr.store("tok").await;
    backdate(&storage, 25 * 60 * 60 * 1000).await;

    let status = mgr.check_expiry().await;
    assert!(!status.is_valid);
    assert!(status.is_expired);
    assert_eq!(status.token, Some("tok".to_string()));
}

#[tokio::test]
async fn check_expiry_is_non_destructive() {
    let (mgr, storage) = setup();
    mgr.store("tok").await;
    backdate(&storage, 25 * 60 * 60 * 1000).await;

    mgr.check_expiry().await;

    // The expired token is still in storage; only read() purges.
    assert_eq!(
        storage.get(keys::AUTH_TOKEN).await.unwrap(),
        Some("tok".to_string())
    );
}

#[tokio::test]
async fn check_expiry_valid_token() {
    let (mgr, _) = setup();
    mgr.store("tok").await;

    let status = mgr.check_expiry().await;
    assert!(status.is_valid);
    assert!(!status.is_expired);
    assert_eq!(status.token, Some("tok".to_string()));
}

// ── store() / clear() ───────────────────────────────────────────

#[tokio::test]
async fn store_renews_issue_time() {
    let (mgr, storage) = setup();
    mgr.store("tok-1").await;
    backdate(&storage, 23 * 60 * 60 * 1000).await;

    // Renewal resets the clock.
    mgr.store("tok-2").await;
    let raw = storage.get(keys::TOKEN_ISSUED_AT).await.unwrap().unwrap();
    let issued_at: i64 = raw.parse().unwrap();
    assert!(Utc::now().timestamp_millis() - issued_at < 5_000);
}

#[tokio::test]
async fn clear_is_idempotent() {
    let (mgr, storage) = setup();
    mgr.store("tok").await;
    mgr.clear().await;
    mgr.clear().await;
    assert_eq!(storage.get(keys::AUTH_TOKEN).await.unwrap(), None);
}

/// Storage that refuses writes to one specific key.
#[derive(Debug)]
struct RejectKeyStorage {
    inner: MemoryStorage,
    reject: &'static str,
}

#[async_trait]
impl KeyValueStorage for RejectKeyStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if key == self.reject {
            return Err(StorageError::OperationFailed("write refused".into()));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }
}

#[tokio::test]
async fn store_rolls_back_token_when_issue_time_write_fails() {
    let storage = Arc::new(RejectKeyStorage {
        inner: MemoryStorage::new(),
        reject: keys::TOKEN_ISSUED_AT,
    });
    let mgr = TokenManager::new(storage.clone());

    assert!(!mgr.store("tok-half").await);

    // Storage never holds a token paired with a stale issue time.
    assert_eq!(storage.get(keys::AUTH_TOKEN).await.unwrap(), None);
    assert_eq!(storage.get(keys::TOKEN_ISSUED_AT).await.unwrap(), None);
    assert_eq!(mgr.read().await, None);
}
