//! Ratings cache.
//!
//! Locally cached star ratings keyed by product id. Each product holds
//! its full rating set alongside the aggregate, and the aggregate is
//! always rebuilt as `sum(stars) / count` over that set — never patched
//! incrementally. A `(user, product)` pair has at most one record;
//! re-rating replaces it in place.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use shopfront_core::keys;
use shopfront_core::models::{ProductRating, Rating};
use shopfront_core::storage::KeyValueStorage;

use crate::error::GatewayError;
use crate::gateway::RemoteGateway;

use super::SweepReport;

#[derive(Debug, Default)]
struct State {
    by_product: BTreeMap<i64, ProductRating>,
    loaded: bool,
}

/// The locally cached ratings, mirrored to durable storage as a JSON
/// object keyed by product id.
pub struct RatingsCollection {
    storage: Arc<dyn KeyValueStorage>,
    inner: RwLock<State>,
}

impl RatingsCollection {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            inner: RwLock::new(State::default()),
        }
    }

    /// Read the persisted cache. Absence or a parse failure initializes
    /// empty.
    pub async fn load(&self) {
        let by_product = match self.storage.get(keys::RATINGS).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                tracing::warn!("discarding unparseable ratings cache: {err}");
                BTreeMap::new()
            }),
            Ok(None) => BTreeMap::new(),
            Err(err) => {
                tracing::warn!("failed to load ratings cache: {err}");
                BTreeMap::new()
            }
        };
        let mut inner = self.inner.write().await;
        inner.by_product = by_product;
        inner.loaded = true;
    }

    pub async fn is_loaded(&self) -> bool {
        self.inner.read().await.loaded
    }

    // ─── Mutations ──────────────────────────────────────────────────

    /// Record `user_id`'s rating for `product_id`.
    ///
    /// An existing record for the same `(user_id, product_id)` pair is
    /// replaced in place — stars and timestamp — so the pair never has
    /// two records. The product aggregate is then recomputed from the
    /// full set. Stars outside 1..=5 are rejected.
    pub async fn rate(&self, user_id: &str, product_id: i64, stars: u8) -> bool {
        if !(1..=5).contains(&stars) {
            return false;
        }

        let mut inner = self.inner.write().await;

        let mut ratings = inner
            .by_product
            .get(&product_id)
            .map(|p| p.ratings.clone())
            .unwrap_or_default();

        match ratings.iter_mut().find(|r| r.user_id == user_id) {
            Some(existing) => {
                existing.stars = stars;
                existing.created_at = Utc::now();
            }
            None => {
                let next_id = inner
                    .by_product
                    .values()
                    .flat_map(|p| p.ratings.iter())
                    .map(|r| r.id)
                    .max()
                    .unwrap_or(0)
                    + 1;
                ratings.push(Rating {
                    id: next_id,
                    user_id: user_id.to_string(),
                    product_id,
                    stars,
                    created_at: Utc::now(),
                });
            }
        }

        let mut next = inner.by_product.clone();
        next.insert(product_id, ProductRating::from_ratings(product_id, ratings));
        self.commit(&mut inner, next).await
    }

    /// Empty the cache and drop the persistence key entirely.
    pub async fn clear(&self) -> bool {
        let mut inner = self.inner.write().await;
        if let Err(err) = self.storage.remove(keys::RATINGS).await {
            tracing::warn!("failed to clear ratings cache: {err}");
            return false;
        }
        inner.by_product.clear();
        true
    }

    /// Prune ratings for products that no longer exist upstream. Only
    /// ever shrinks the cache. Runs on explicit caller request; nothing
    /// schedules it.
    pub async fn validate_against_catalog(
        &self,
        gateway: &dyn RemoteGateway,
    ) -> Result<SweepReport, GatewayError> {
        let ids: Vec<i64> = {
            let inner = self.inner.read().await;
            inner.by_product.keys().copied().collect()
        };

        let mut orphaned = Vec::new();
        for id in ids {
            if gateway.get_product(id).await?.is_none() {
                orphaned.push(id);
            }
        }

        let mut inner = self.inner.write().await;
        if orphaned.is_empty() {
            return Ok(SweepReport {
                validated: true,
                removed: 0,
            });
        }
        let mut next = inner.by_product.clone();
        for id in &orphaned {
            next.remove(id);
        }
        let removed = inner.by_product.len() - next.len();
        let validated = self.commit(&mut inner, next).await;
        Ok(SweepReport {
            validated,
            removed: if validated { removed } else { 0 },
        })
    }

    async fn commit(&self, inner: &mut State, next: BTreeMap<i64, ProductRating>) -> bool {
        let json = match serde_json::to_string(&next) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!("failed to encode ratings cache: {err}");
                return false;
            }
        };
        if let Err(err) = self.storage.set(keys::RATINGS, &json).await {
            tracing::warn!("failed to persist ratings cache: {err}");
            return false;
        }
        inner.by_product = next;
        true
    }

    // ─── Derived queries ────────────────────────────────────────────

    pub async fn product_rating(&self, product_id: i64) -> Option<ProductRating> {
        self.inner.read().await.by_product.get(&product_id).cloned()
    }

    pub async fn average_rating(&self, product_id: i64) -> Option<f64> {
        self.inner
            .read()
            .await
            .by_product
            .get(&product_id)
            .map(|p| p.average_rating)
    }

    pub async fn user_rating(&self, user_id: &str, product_id: i64) -> Option<Rating> {
        self.inner
            .read()
            .await
            .by_product
            .get(&product_id)
            .and_then(|p| p.ratings.iter().find(|r| r.user_id == user_id).cloned())
    }

    /// Product ids with at least one cached rating, ascending.
    pub async fn rated_products(&self) -> Vec<i64> {
        self.inner.read().await.by_product.keys().copied().collect()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.by_product.is_empty()
    }
}
