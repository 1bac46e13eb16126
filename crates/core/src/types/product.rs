//! Catalog and stock entries as served by the storefront REST API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A catalog product.
///
/// `price` is carried as a JSON number on the wire and in persisted carts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Product image URL.
    pub image: String,
}

/// Available quantity for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    pub id: ProductId,
    pub amount: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_numeric_price() {
        let product: Product = serde_json::from_str(
            r#"{"id":1,"title":"Tênis de Caminhada Leve Confortável","price":179.9,"image":"https://example.com/1.jpg"}"#,
        )
        .unwrap();

        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Decimal::new(1799, 1));
    }

    #[test]
    fn test_stock_entry_rejects_negative_amount() {
        assert!(serde_json::from_str::<StockEntry>(r#"{"id":1,"amount":-1}"#).is_err());
        let entry: StockEntry = serde_json::from_str(r#"{"id":1,"amount":3}"#).unwrap();
        assert_eq!(entry.amount, 3);
    }
}
