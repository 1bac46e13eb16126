//! RocketShoes Cart - shopping cart state for the storefront.
//!
//! # Architecture
//!
//! - [`CartStore`] owns the cart and is the only thing that mutates it
//! - [`ShopApi`] looks up products and stock (`reqwest` client: [`HttpShopApi`])
//! - [`KeyValueStore`] persists the cart after every successful mutation
//! - [`Notifier`] receives user-facing messages when a mutation is rejected
//!
//! Mutations never return errors. Stock violations, missing lines and
//! transient failures are logged, reported through the notifier, and leave
//! both the in-memory and the persisted cart untouched.
//!
//! # Modules
//!
//! - [`api`] - Products/stock REST client with product caching
//! - [`config`] - Environment-based configuration
//! - [`error`] - Cart operation errors
//! - [`notify`] - Notifications and notification sinks
//! - [`storage`] - Persistent key-value stores
//! - [`store`] - The cart store
//! - [`view`] - Display data for carts and catalogs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod notify;
pub mod storage;
pub mod store;
pub mod view;

pub use api::{ApiError, HttpShopApi, ShopApi};
pub use config::{ApiConfig, CartConfig, ConfigError, DEFAULT_STORAGE_KEY, StorageConfig};
pub use error::CartError;
pub use notify::{Locale, Notification, Notifier, RecordingNotifier, TracingNotifier};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{CartStore, DefaultCartStore, Outcome};
pub use view::{CartItemView, CartView, CatalogEntry};
