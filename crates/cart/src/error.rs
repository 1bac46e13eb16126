//! Cart operation errors.
//!
//! These never escape a store operation: each one is logged and converted to
//! a [`Notification`] at the operation boundary.

use rocketshoes_core::ProductId;
use thiserror::Error;

use crate::api::ApiError;
use crate::notify::Notification;
use crate::storage::StorageError;

/// Why a cart mutation was not applied.
#[derive(Debug, Error)]
pub enum CartError {
    /// The requested quantity is more than the stock service has available.
    #[error("Requested {requested} of product {product_id}, only {available} in stock")]
    StockExceeded {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    /// The operation targets a product that has no cart line.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Catalog or stock lookup failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The new cart could not be persisted.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CartError {
    /// Notification shown for this error, given the operation's generic
    /// failure notification.
    #[must_use]
    pub const fn notification(&self, failure: Notification) -> Notification {
        match self {
            Self::StockExceeded { .. } => Notification::StockExceeded,
            Self::NotInCart(_) | Self::Api(_) | Self::Storage(_) => failure,
        }
    }

    /// Whether the failure was unexpected rather than a business rejection.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Api(_) | Self::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_exceeded_overrides_failure_notification() {
        let err = CartError::StockExceeded {
            product_id: ProductId::new(1),
            requested: 3,
            available: 2,
        };
        assert_eq!(
            err.notification(Notification::AddFailed),
            Notification::StockExceeded
        );
        assert!(!err.is_transient());
        assert_eq!(
            err.to_string(),
            "Requested 3 of product 1, only 2 in stock"
        );
    }

    #[test]
    fn test_other_errors_use_operation_failure() {
        let err = CartError::NotInCart(ProductId::new(4));
        assert_eq!(
            err.notification(Notification::RemoveFailed),
            Notification::RemoveFailed
        );

        let err = CartError::Api(ApiError::NotFound("products/4".to_string()));
        assert_eq!(
            err.notification(Notification::AddFailed),
            Notification::AddFailed
        );
        assert!(err.is_transient());
    }
}
