//! The cart store.
//!
//! [`CartStore`] owns the cart and exposes the three mutations a storefront
//! needs: add one unit, remove a line, set a line's quantity. Every mutation
//! is validated against the stock service and persisted before it becomes
//! visible, so the persisted cart always equals the in-memory cart.
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_cart::{CartConfig, CartStore};
//!
//! let config = CartConfig::from_env()?;
//! let store = CartStore::from_config(&config)?;
//!
//! store.add_product(ProductId::new(1)).await;
//! store
//!     .update_product_amount(UpdateProductAmount { product_id: ProductId::new(1), amount: 3 })
//!     .await;
//! store.remove_product(ProductId::new(1)).await;
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use rocketshoes_core::{Cart, CartItem, CurrencyCode, Price, ProductId, UpdateProductAmount};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use crate::api::{ApiError, HttpShopApi, ShopApi};
use crate::config::CartConfig;
use crate::error::CartError;
use crate::notify::{Notification, Notifier, TracingNotifier};
use crate::storage::{FileStore, KeyValueStore, StorageError};
use crate::view::{CartView, CatalogEntry};

/// Result of a cart operation.
///
/// Operations never fail from the caller's point of view; a rejected
/// operation has already been reported through the [`Notifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The cart changed and was persisted.
    Applied,
    /// The request was ignored without notification.
    Skipped,
    /// The request was rejected and the cart left unchanged.
    Rejected(Notification),
}

impl Outcome {
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Cart store backed by the HTTP API, a JSON file and `tracing` notifications.
pub type DefaultCartStore = CartStore<HttpShopApi, FileStore, TracingNotifier>;

/// Shopping cart state container.
///
/// Generic over its collaborators so any front end can inject its own API
/// client, persistent store and notification sink.
pub struct CartStore<A, S, N> {
    api: A,
    storage: S,
    notifier: N,
    key: String,
    cart: RwLock<Cart>,
    /// Held for the whole of a mutation so overlapping operations queue.
    mutation: Mutex<()>,
}

impl<A, S, N> std::fmt::Debug for CartStore<A, S, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("cart", &*self.read_cart())
            .finish_non_exhaustive()
    }
}

impl DefaultCartStore {
    /// Open the cart described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &CartConfig) -> Result<Self, ApiError> {
        let api = HttpShopApi::new(&config.api)?;
        let storage = FileStore::new(&config.storage.path);
        let notifier = TracingNotifier::new(config.locale);
        Ok(Self::load(api, storage, notifier, config.storage.key.clone()))
    }
}

impl<A, S, N> CartStore<A, S, N>
where
    A: ShopApi,
    S: KeyValueStore,
    N: Notifier,
{
    /// Create a store, loading the cart saved under `key`.
    ///
    /// A missing or unreadable value yields an empty cart.
    pub fn load(api: A, storage: S, notifier: N, key: impl Into<String>) -> Self {
        let key = key.into();
        let cart = load_cart(&storage, &key);
        info!(key = %key, lines = cart.len(), "Cart loaded");

        Self {
            api,
            storage,
            notifier,
            key,
            cart: RwLock::new(cart),
            mutation: Mutex::new(()),
        }
    }

    // =========================================================================
    // Read accessors
    // =========================================================================

    /// Snapshot of the current cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.read_cart().clone()
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn cart_size(&self) -> usize {
        self.read_cart().len()
    }

    /// Quantity in the cart keyed by product.
    #[must_use]
    pub fn amounts_by_product(&self) -> HashMap<ProductId, u32> {
        self.read_cart().amounts()
    }

    /// Display data for the current cart.
    #[must_use]
    pub fn view(&self, currency: CurrencyCode) -> CartView {
        CartView::new(&self.read_cart(), currency)
    }

    /// The catalog annotated with stock and the quantity already in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if either the product list or the stock list cannot
    /// be fetched.
    #[instrument(skip(self))]
    pub async fn catalog(&self, currency: CurrencyCode) -> Result<Vec<CatalogEntry>, ApiError> {
        let (products, stock) = tokio::try_join!(self.api.products(), self.api.stock_levels())?;

        let stock: HashMap<ProductId, u32> = stock
            .into_iter()
            .map(|entry| (entry.id, entry.amount))
            .collect();
        let amounts = self.amounts_by_product();

        Ok(products
            .into_iter()
            .map(|product| CatalogEntry {
                price: Price::new(product.price, currency).display(),
                in_cart: amounts.get(&product.id).copied().unwrap_or(0),
                in_stock: stock.get(&product.id).copied(),
                product,
            })
            .collect())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add one unit of a product, creating its line if needed.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> Outcome {
        let _guard = self.mutation.lock().await;
        let result = self.try_add_product(product_id).await;
        self.settle(result, Notification::AddFailed)
    }

    /// Remove a product's line entirely.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) -> Outcome {
        let _guard = self.mutation.lock().await;
        let result = self.try_remove_product(product_id);
        self.settle(result, Notification::RemoveFailed)
    }

    /// Set a line's quantity. Quantities below 1 are ignored.
    #[instrument(skip_all, fields(product_id = %request.product_id, amount = request.amount))]
    pub async fn update_product_amount(&self, request: UpdateProductAmount) -> Outcome {
        if request.amount < 1 {
            debug!("Ignoring non-positive quantity");
            return Outcome::Skipped;
        }

        let _guard = self.mutation.lock().await;
        let result = self.try_update_product_amount(request).await;
        self.settle(result, Notification::UpdateFailed)
    }

    async fn try_add_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let mut cart = self.cart();
        let requested = u64::from(cart.amount_of(product_id)) + 1;

        let stock = self.api.stock(product_id).await?;
        if requested > u64::from(stock.amount) {
            return Err(CartError::StockExceeded {
                product_id,
                requested,
                available: stock.amount,
            });
        }

        if !cart.increment(product_id) {
            let product = self.api.product(product_id).await?;
            cart.push(CartItem::from_product(product, 1));
        }

        self.commit(cart)
    }

    fn try_remove_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let mut cart = self.cart();
        if cart.remove(product_id).is_none() {
            return Err(CartError::NotInCart(product_id));
        }
        self.commit(cart)
    }

    async fn try_update_product_amount(
        &self,
        request: UpdateProductAmount,
    ) -> Result<(), CartError> {
        let UpdateProductAmount { product_id, amount } = request;
        let requested = u64::try_from(amount).unwrap_or(0);

        let stock = self.api.stock(product_id).await?;
        let amount = match u32::try_from(requested) {
            Ok(amount) if amount <= stock.amount => amount,
            _ => {
                return Err(CartError::StockExceeded {
                    product_id,
                    requested,
                    available: stock.amount,
                });
            }
        };

        let mut cart = self.cart();
        if !cart.set_amount(product_id, amount) {
            return Err(CartError::NotInCart(product_id));
        }
        self.commit(cart)
    }

    /// Persist `cart`, then make it the current cart.
    fn commit(&self, cart: Cart) -> Result<(), CartError> {
        let serialized = serde_json::to_string(&cart).map_err(StorageError::from)?;
        self.storage.set(&self.key, &serialized)?;

        debug!(lines = cart.len(), "Cart persisted");
        *self.cart.write().unwrap_or_else(PoisonError::into_inner) = cart;
        Ok(())
    }

    /// Convert an operation result to an [`Outcome`], notifying on failure.
    fn settle(&self, result: Result<(), CartError>, failure: Notification) -> Outcome {
        match result {
            Ok(()) => Outcome::Applied,
            Err(err) => {
                let notification = err.notification(failure);
                if err.is_transient() {
                    error!(error = %err, ?notification, "Cart operation failed");
                } else {
                    warn!(error = %err, ?notification, "Cart operation rejected");
                }
                self.notifier.notify(notification);
                Outcome::Rejected(notification)
            }
        }
    }
}

impl<A, S, N> CartStore<A, S, N> {
    fn read_cart(&self) -> RwLockReadGuard<'_, Cart> {
        self.cart.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Read the persisted cart, falling back to an empty one.
fn load_cart(storage: &impl KeyValueStore, key: &str) -> Cart {
    match storage.get(key) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(key, error = %e, "Persisted cart is corrupt, starting empty");
            Cart::new()
        }),
        Ok(None) => Cart::new(),
        Err(e) => {
            warn!(key, error = %e, "Failed to read persisted cart, starting empty");
            Cart::new()
        }
    }
}
