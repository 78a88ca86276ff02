//! # Shopfront Client
//!
//! Session, token lifecycle, local synchronized collections, and the
//! remote gateway for the Shopfront mobile storefront. The UI layer
//! constructs these services once at startup and drives them by handle;
//! everything durable goes through the [`shopfront_core::KeyValueStorage`]
//! seam.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use shopfront_client::{
//!     FavoritesCollection, GatewayOptions, HttpGateway, SessionCoordinator, TokenManager,
//! };
//! use shopfront_core::MemoryStorage;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = Arc::new(MemoryStorage::new());
//! let tokens = TokenManager::new(storage.clone());
//! let gateway = Arc::new(HttpGateway::new(
//!     GatewayOptions {
//!         base_url: "https://api.example.com".into(),
//!         ..Default::default()
//!     },
//!     tokens.clone(),
//! )?);
//!
//! let session = SessionCoordinator::new(storage.clone(), tokens, gateway);
//! session.restore_session().await;
//!
//! let favorites = FavoritesCollection::new(storage);
//! favorites.load().await;
//! # Ok(())
//! # }
//! ```

pub mod collections;
mod error;
mod gateway;
mod session;
mod token;
mod types;

pub use collections::{
    FavoritesCollection, NotificationCenter, RatingsCollection, SortOrder, SweepReport,
};
pub use error::GatewayError;
pub use gateway::{GatewayOptions, HttpGateway, RemoteGateway};
pub use session::{SessionCoordinator, SessionError, SessionState};
pub use token::{TokenManager, TokenStatus, TOKEN_TTL_MS};
pub use types::*;
