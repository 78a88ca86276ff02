//! Favorites collection.
//!
//! At most one entry per product id. The persistent store holds the
//! full collection as a JSON array under one key; derived queries are
//! pure functions over the in-memory snapshot.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::RwLock;

use shopfront_core::keys;
use shopfront_core::models::FavoriteEntry;
use shopfront_core::storage::KeyValueStorage;

use crate::error::GatewayError;
use crate::gateway::RemoteGateway;

use super::{SortOrder, SweepReport};

#[derive(Debug, Default)]
struct State {
    entries: Vec<FavoriteEntry>,
    loaded: bool,
}

/// The user's favorited products, mirrored to durable storage.
pub struct FavoritesCollection {
    storage: Arc<dyn KeyValueStorage>,
    inner: RwLock<State>,
}

impl FavoritesCollection {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            inner: RwLock::new(State::default()),
        }
    }

    /// Read the persisted collection into memory. Absence or a parse
    /// failure initializes empty. Must run before mutations are
    /// considered valid; `is_loaded()` reports the flag.
    pub async fn load(&self) {
        let entries = match self.storage.get(keys::FAVORITES).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                tracing::warn!("discarding unparseable favorites: {err}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!("failed to load favorites: {err}");
                Vec::new()
            }
        };
        let mut inner = self.inner.write().await;
        inner.entries = entries;
        inner.loaded = true;
    }

    pub async fn is_loaded(&self) -> bool {
        self.inner.read().await.loaded
    }

    // ─── Mutations ──────────────────────────────────────────────────

    /// Add an entry. Returns `false` without mutating if an entry with
    /// the same product id already exists or persistence fails.
    pub async fn add(&self, entry: FavoriteEntry) -> bool {
        let mut inner = self.inner.write().await;
        if inner.entries.iter().any(|e| e.id == entry.id) {
            return false;
        }
        let mut next = inner.entries.clone();
        next.push(entry);
        self.commit(&mut inner, next).await
    }

    /// Remove the entry with the given product id. Removing an absent
    /// id is a no-op success (idempotent-delete semantics).
    pub async fn remove(&self, id: i64) -> bool {
        let mut inner = self.inner.write().await;
        if !inner.entries.iter().any(|e| e.id == id) {
            return true;
        }
        let next: Vec<_> = inner.entries.iter().filter(|e| e.id != id).cloned().collect();
        self.commit(&mut inner, next).await
    }

    /// Add if absent, remove if present.
    pub async fn toggle(&self, entry: FavoriteEntry) -> bool {
        if self.contains(entry.id).await {
            self.remove(entry.id).await
        } else {
            self.add(entry).await
        }
    }

    /// Empty the collection and drop the persistence key entirely.
    pub async fn clear(&self) -> bool {
        let mut inner = self.inner.write().await;
        if let Err(err) = self.storage.remove(keys::FAVORITES).await {
            tracing::warn!("failed to clear favorites: {err}");
            return false;
        }
        inner.entries.clear();
        true
    }

    /// Prune entries whose product no longer exists upstream. Only ever
    /// shrinks the collection. Runs on explicit caller request; nothing
    /// schedules it.
    pub async fn validate_against_catalog(
        &self,
        gateway: &dyn RemoteGateway,
    ) -> Result<SweepReport, GatewayError> {
        let ids: Vec<i64> = {
            let inner = self.inner.read().await;
            inner.entries.iter().map(|e| e.id).collect()
        };

        // Only ids confirmed orphaned get removed. An entry added while
        // this loop is suspended was never probed and must survive.
        let mut orphaned = BTreeSet::new();
        for id in ids {
            if gateway.get_product(id).await?.is_none() {
                orphaned.insert(id);
            }
        }

        let mut inner = self.inner.write().await;
        if orphaned.is_empty() {
            return Ok(SweepReport {
                validated: true,
                removed: 0,
            });
        }
        let next: Vec<_> = inner
            .entries
            .iter()
            .filter(|e| !orphaned.contains(&e.id))
            .cloned()
            .collect();
        let removed = inner.entries.len() - next.len();
        if removed == 0 {
            return Ok(SweepReport {
                validated: true,
                removed: 0,
            });
        }
        let validated = self.commit(&mut inner, next).await;
        Ok(SweepReport {
            validated,
            removed: if validated { removed } else { 0 },
        })
    }

    /// Persist `next`, then swap it in. Memory is untouched on failure.
    async fn commit(&self, inner: &mut State, next: Vec<FavoriteEntry>) -> bool {
        let json = match serde_json::to_string(&next) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!("failed to encode favorites: {err}");
                return false;
            }
        };
        if let Err(err) = self.storage.set(keys::FAVORITES, &json).await {
            tracing::warn!("failed to persist favorites: {err}");
            return false;
        }
        inner.entries = next;
        true
    }

    // ─── Derived queries ────────────────────────────────────────────

    pub async fn contains(&self, id: i64) -> bool {
        self.inner.read().await.entries.iter().any(|e| e.id == id)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn all(&self) -> Vec<FavoriteEntry> {
        self.inner.read().await.entries.clone()
    }

    /// Entries newest-first by `added_at`.
    pub async fn sorted_by_date(&self) -> Vec<FavoriteEntry> {
        let mut entries = self.all().await;
        entries.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        entries
    }

    pub async fn sorted_by_price(&self, order: SortOrder) -> Vec<FavoriteEntry> {
        let mut entries = self.all().await;
        entries.sort_by(|a, b| {
            let cmp = a.price.partial_cmp(&b.price).unwrap_or(std::cmp::Ordering::Equal);
            match order {
                SortOrder::Ascending => cmp,
                SortOrder::Descending => cmp.reverse(),
            }
        });
        entries
    }

    /// Case-insensitive substring match on category.
    pub async fn filter_by_category(&self, category: &str) -> Vec<FavoriteEntry> {
        let needle = category.to_lowercase();
        self.inner
            .read()
            .await
            .entries
            .iter()
            .filter(|e| e.category.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Case-insensitive substring match on title.
    pub async fn search(&self, query: &str) -> Vec<FavoriteEntry> {
        let needle = query.to_lowercase();
        self.inner
            .read()
            .await
            .entries
            .iter()
            .filter(|e| e.title.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Sum of entry prices.
    pub async fn total_price(&self) -> f64 {
        self.inner.read().await.entries.iter().map(|e| e.price).sum()
    }

    /// Distinct categories, sorted.
    pub async fn categories(&self) -> Vec<String> {
        let set: BTreeSet<String> = self
            .inner
            .read()
            .await
            .entries
            .iter()
            .map(|e| e.category.clone())
            .collect();
        set.into_iter().collect()
    }
}
