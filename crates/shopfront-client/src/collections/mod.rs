//! Local synchronized collections.
//!
//! Favorites, notification flags, and the ratings cache share one
//! pattern: an in-memory value behind a `tokio::sync::RwLock`, mirrored
//! to one key in the persistent store. Every mutation computes the next
//! full value, persists it, and only then swaps the in-memory reference
//! — a failed persist leaves memory untouched. The write lock is held
//! across the persist, so writes to one collection commit in call order.
//!
//! Storage failures are logged and reported as `false` to the caller;
//! they never propagate past the collection boundary.

pub mod favorites;
pub mod notifications;
pub mod ratings;

pub use favorites::FavoritesCollection;
pub use notifications::NotificationCenter;
pub use ratings::RatingsCollection;

/// Sort direction for price-ordered queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Outcome of a catalog validation sweep.
///
/// The sweep only ever prunes local state; it never adds entries.
/// `validated` is `false` when the pruned result could not be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub validated: bool,
    pub removed: usize,
}
