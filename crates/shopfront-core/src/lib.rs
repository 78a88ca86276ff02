//! # Shopfront Core
//!
//! Shared foundation for the Shopfront mobile storefront client: the
//! durable key-value storage abstraction, the persisted-key namespace,
//! the domain data model, and client-side input validation.
//!
//! This crate has no network dependency. The HTTP gateway, the token
//! lifecycle, the session coordinator, and the synchronized collections
//! live in `shopfront-client` and build on the types defined here.

pub mod keys;
pub mod models;
pub mod storage;
pub mod validation;

pub use models::*;
pub use storage::{KeyValueStorage, MemoryStorage, StorageError};
pub use validation::ValidationError;
