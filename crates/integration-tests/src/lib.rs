//! Integration test support for the RocketShoes cart.
//!
//! [`MockApi`] is an in-process `axum` stand-in for the products/stock REST
//! API. Each test builds its own catalog, starts the server on an ephemeral
//! port and points an `HttpShopApi` at [`MockServer::base_url`].
//!
//! ```rust,ignore
//! let server = MockApi::new().with_product(1, "Tênis", 17990, 3).serve().await;
//! let api = HttpShopApi::new(&ApiConfig::new(server.base_url()))?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use rocketshoes_core::{Product, ProductId, StockEntry};
use rust_decimal::Decimal;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Scriptable products/stock API.
///
/// Clones share state, so a test can keep a handle to adjust stock or inspect
/// request counts while the server is running.
#[derive(Debug, Clone, Default)]
pub struct MockApi {
    inner: Arc<Mutex<MockData>>,
}

#[derive(Debug, Default)]
struct MockData {
    products: BTreeMap<ProductId, Product>,
    stock: BTreeMap<ProductId, u32>,
    hits: HashMap<String, usize>,
    required_token: Option<String>,
    forced_status: Option<(StatusCode, Option<u64>)>,
}

impl MockApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product priced in cents with the given stock.
    #[must_use]
    pub fn with_product(self, id: i32, title: &str, price_cents: i64, stock: u32) -> Self {
        {
            let mut data = self.data();
            let id = ProductId::new(id);
            data.products.insert(
                id,
                Product {
                    id,
                    title: title.to_string(),
                    price: Decimal::new(price_cents, 2),
                    image: format!("https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis{id}.jpg"),
                },
            );
            data.stock.insert(id, stock);
        }
        self
    }

    /// Require `Authorization: Bearer <token>` on every request.
    #[must_use]
    pub fn require_token(self, token: &str) -> Self {
        self.data().required_token = Some(token.to_string());
        self
    }

    /// Change a product's available quantity.
    pub fn set_stock(&self, id: i32, amount: u32) {
        self.data().stock.insert(ProductId::new(id), amount);
    }

    /// Answer every request with `status` (and optional `Retry-After`).
    pub fn force_status(&self, status: StatusCode, retry_after: Option<u64>) {
        self.data().forced_status = Some((status, retry_after));
    }

    /// Number of requests received for `path` (e.g. `/products/1`).
    #[must_use]
    pub fn hits(&self, path: &str) -> usize {
        self.data().hits.get(path).copied().unwrap_or(0)
    }

    /// Start serving on an ephemeral localhost port.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn serve(self) -> MockServer {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock API listener");
        let addr = listener.local_addr().expect("Listener has no local address");

        let app = Router::new()
            .route("/products", get(list_products))
            .route("/products/{id}", get(get_product))
            .route("/stock", get(list_stock))
            .route("/stock/{id}", get(get_stock))
            .with_state(self);

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        MockServer { addr, handle }
    }

    fn data(&self) -> MutexGuard<'_, MockData> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the hit and apply auth / forced-status rules.
    fn admit(&self, path: &str, headers: &HeaderMap) -> Result<(), Response> {
        let mut data = self.data();
        *data.hits.entry(path.to_string()).or_insert(0) += 1;

        if let Some(token) = &data.required_token {
            let expected = format!("Bearer {token}");
            let provided = headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok());
            if provided != Some(expected.as_str()) {
                return Err(StatusCode::UNAUTHORIZED.into_response());
            }
        }

        if let Some((status, retry_after)) = data.forced_status {
            let mut response = (status, "forced failure").into_response();
            if let Some(secs) = retry_after {
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(secs));
            }
            return Err(response);
        }

        Ok(())
    }
}

/// A running [`MockApi`]. The server stops when this is dropped.
#[derive(Debug)]
pub struct MockServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl MockServer {
    /// Base URL to configure the client with.
    ///
    /// # Panics
    ///
    /// Never in practice; the address is always a valid URL.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("Socket address is a valid URL")
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// =============================================================================
// Handlers
// =============================================================================

async fn list_products(State(api): State<MockApi>, headers: HeaderMap) -> Response {
    if let Err(response) = api.admit("/products", &headers) {
        return response;
    }
    let products: Vec<Product> = api.data().products.values().cloned().collect();
    Json(products).into_response()
}

async fn get_product(
    State(api): State<MockApi>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = api.admit(&format!("/products/{id}"), &headers) {
        return response;
    }
    match api.data().products.get(&ProductId::new(id)) {
        Some(product) => Json(product.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(serde_json::json!({}))).into_response(),
    }
}

async fn list_stock(State(api): State<MockApi>, headers: HeaderMap) -> Response {
    if let Err(response) = api.admit("/stock", &headers) {
        return response;
    }
    let stock: Vec<StockEntry> = api
        .data()
        .stock
        .iter()
        .map(|(id, amount)| StockEntry {
            id: *id,
            amount: *amount,
        })
        .collect();
    Json(stock).into_response()
}

async fn get_stock(
    State(api): State<MockApi>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = api.admit(&format!("/stock/{id}"), &headers) {
        return response;
    }
    let id = ProductId::new(id);
    match api.data().stock.get(&id) {
        Some(amount) => Json(StockEntry {
            id,
            amount: *amount,
        })
        .into_response(),
        None => (StatusCode::NOT_FOUND, Json(serde_json::json!({}))).into_response(),
    }
}
