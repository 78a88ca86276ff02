//! Notification center.
//!
//! Notification content is a fixed seed list shipped with the client;
//! only the per-user read/favorite flags are persisted, as two id-sets
//! under one key. The merged view is recomputed on every read — the
//! flags are never stored inside the notification objects, so the two
//! can't drift.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tokio::sync::RwLock;

use shopfront_core::keys;
use shopfront_core::models::{Notification, NotificationFlags, NotificationKind};
use shopfront_core::storage::KeyValueStorage;

/// The canonical notification content. Stable ids; flags ride separately.
fn seed() -> Vec<Notification> {
    let entry = |id: i64, title: &str, description: &str, image: &str, kind, y, mo, d, h| {
        Notification {
            id,
            title: title.to_string(),
            description: description.to_string(),
            image: image.to_string(),
            created_at: Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap(),
            kind,
            is_read: false,
            is_favorite: false,
        }
    };
    vec![
        entry(
            1,
            "Welcome to Shopfront",
            "Browse the catalog and save your favorite products.",
            "notif/welcome.png",
            NotificationKind::System,
            2024, 1, 15, 9,
        ),
        entry(
            2,
            "Spring sale",
            "Up to 40% off selected home and garden items this week.",
            "notif/spring-sale.png",
            NotificationKind::Promotion,
            2024, 3, 4, 12,
        ),
        entry(
            3,
            "App update available",
            "Version 2.1 brings faster search and bug fixes.",
            "notif/update.png",
            NotificationKind::Update,
            2024, 3, 18, 8,
        ),
        entry(
            4,
            "New arrivals",
            "Fresh products just landed in the electronics section.",
            "notif/new-arrivals.png",
            NotificationKind::News,
            2024, 4, 2, 10,
        ),
        entry(
            5,
            "Weekend flash deal",
            "24 hours only: free shipping on every order.",
            "notif/flash-deal.png",
            NotificationKind::Promotion,
            2024, 4, 20, 18,
        ),
        entry(
            6,
            "Rate your purchases",
            "Your ratings help other shoppers find the good stuff.",
            "notif/ratings.png",
            NotificationKind::System,
            2024, 5, 6, 14,
        ),
    ]
}

#[derive(Debug, Default)]
struct State {
    flags: NotificationFlags,
    loaded: bool,
}

/// Per-user notification state over the fixed seed list.
pub struct NotificationCenter {
    storage: Arc<dyn KeyValueStorage>,
    inner: RwLock<State>,
}

impl NotificationCenter {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            inner: RwLock::new(State::default()),
        }
    }

    /// Read the persisted flag sets. Absence or a parse failure
    /// initializes empty flags (everything unread, nothing favorited).
    pub async fn load(&self) {
        let flags = match self.storage.get(keys::NOTIFICATION_FLAGS).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                tracing::warn!("discarding unparseable notification flags: {err}");
                NotificationFlags::default()
            }),
            Ok(None) => NotificationFlags::default(),
            Err(err) => {
                tracing::warn!("failed to load notification flags: {err}");
                NotificationFlags::default()
            }
        };
        let mut inner = self.inner.write().await;
        inner.flags = flags;
        inner.loaded = true;
    }

    pub async fn is_loaded(&self) -> bool {
        self.inner.read().await.loaded
    }

    // ─── Mutations ──────────────────────────────────────────────────

    /// Mark one notification read. Returns `false` for an id not in the
    /// seed list or on persistence failure; marking an already-read id
    /// is a no-op success.
    pub async fn mark_as_read(&self, id: i64) -> bool {
        if !seed().iter().any(|n| n.id == id) {
            return false;
        }
        let mut inner = self.inner.write().await;
        if inner.flags.read.contains(&id) {
            return true;
        }
        let mut next = inner.flags.clone();
        next.read.push(id);
        self.commit(&mut inner, next).await
    }

    /// Mark every seed notification read.
    pub async fn mark_all_as_read(&self) -> bool {
        let mut inner = self.inner.write().await;
        let next = NotificationFlags {
            read: seed().iter().map(|n| n.id).collect(),
            favorites: inner.flags.favorites.clone(),
        };
        if next.read == inner.flags.read {
            return true;
        }
        self.commit(&mut inner, next).await
    }

    /// Flip the favorite flag for one notification.
    pub async fn toggle_favorite(&self, id: i64) -> bool {
        if !seed().iter().any(|n| n.id == id) {
            return false;
        }
        let mut inner = self.inner.write().await;
        let mut next = inner.flags.clone();
        if let Some(pos) = next.favorites.iter().position(|f| *f == id) {
            next.favorites.remove(pos);
        } else {
            next.favorites.push(id);
        }
        self.commit(&mut inner, next).await
    }

    /// Reset all flags and drop the persistence key entirely.
    pub async fn clear(&self) -> bool {
        let mut inner = self.inner.write().await;
        if let Err(err) = self.storage.remove(keys::NOTIFICATION_FLAGS).await {
            tracing::warn!("failed to clear notification flags: {err}");
            return false;
        }
        inner.flags = NotificationFlags::default();
        true
    }

    async fn commit(&self, inner: &mut State, next: NotificationFlags) -> bool {
        let json = match serde_json::to_string(&next) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!("failed to encode notification flags: {err}");
                return false;
            }
        };
        if let Err(err) = self.storage.set(keys::NOTIFICATION_FLAGS, &json).await {
            tracing::warn!("failed to persist notification flags: {err}");
            return false;
        }
        inner.flags = next;
        true
    }

    // ─── Derived queries ────────────────────────────────────────────

    /// The merged view: seed content joined with the current flags,
    /// newest first.
    pub async fn all(&self) -> Vec<Notification> {
        let inner = self.inner.read().await;
        let mut merged: Vec<Notification> = seed()
            .into_iter()
            .map(|mut n| {
                n.is_read = inner.flags.read.contains(&n.id);
                n.is_favorite = inner.flags.favorites.contains(&n.id);
                n
            })
            .collect();
        merged.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        merged
    }

    pub async fn unread(&self) -> Vec<Notification> {
        self.all().await.into_iter().filter(|n| !n.is_read).collect()
    }

    pub async fn favorites(&self) -> Vec<Notification> {
        self.all().await.into_iter().filter(|n| n.is_favorite).collect()
    }

    pub async fn of_kind(&self, kind: NotificationKind) -> Vec<Notification> {
        self.all().await.into_iter().filter(|n| n.kind == kind).collect()
    }

    /// Case-insensitive substring match over title and description.
    pub async fn search(&self, query: &str) -> Vec<Notification> {
        let needle = query.to_lowercase();
        self.all()
            .await
            .into_iter()
            .filter(|n| {
                n.title.to_lowercase().contains(&needle)
                    || n.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub async fn unread_count(&self) -> usize {
        let inner = self.inner.read().await;
        seed().iter().filter(|n| !inner.flags.read.contains(&n.id)).count()
    }
}
