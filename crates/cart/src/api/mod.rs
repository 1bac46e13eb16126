//! Products and stock REST API.
//!
//! # Endpoints
//!
//! - `GET /products` - full catalog
//! - `GET /products/{id}` - a single product
//! - `GET /stock` - available quantity for every product
//! - `GET /stock/{id}` - available quantity for one product
//!
//! [`ShopApi`] is the seam the cart store depends on; [`HttpShopApi`] is the
//! `reqwest` implementation. Products are cached in memory via `moka`; stock
//! is always fetched fresh because it is the upper bound for every mutation.

mod cache;
mod client;

use std::future::Future;
use std::sync::Arc;

pub use client::HttpShopApi;

use rocketshoes_core::{Product, ProductId, StockEntry};
use thiserror::Error;

/// Errors that can occur when talking to the products/stock API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },

    /// An endpoint URL could not be built from the base URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Catalog and stock lookups used by the cart store.
pub trait ShopApi: Send + Sync {
    /// Fetch the full catalog.
    fn products(&self) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send;

    /// Fetch a single product.
    fn product(&self, id: ProductId) -> impl Future<Output = Result<Product, ApiError>> + Send;

    /// Fetch available quantity for every product.
    fn stock_levels(&self) -> impl Future<Output = Result<Vec<StockEntry>, ApiError>> + Send;

    /// Fetch available quantity for one product.
    fn stock(&self, id: ProductId) -> impl Future<Output = Result<StockEntry, ApiError>> + Send;
}

impl<T: ShopApi> ShopApi for Arc<T> {
    fn products(&self) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send {
        (**self).products()
    }

    fn product(&self, id: ProductId) -> impl Future<Output = Result<Product, ApiError>> + Send {
        (**self).product(id)
    }

    fn stock_levels(&self) -> impl Future<Output = Result<Vec<StockEntry>, ApiError>> + Send {
        (**self).stock_levels()
    }

    fn stock(&self, id: ProductId) -> impl Future<Output = Result<StockEntry, ApiError>> + Send {
        (**self).stock(id)
    }
}
