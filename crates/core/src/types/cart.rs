//! Cart and cart line types.
//!
//! [`Cart`] is an ordered list of [`CartItem`]s, unique by product ID. The
//! mutation helpers here are pure: they never consult stock. Stock validation
//! and persistence live in the cart store, which mutates a copy and only
//! commits it once the new state has been saved.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::id::ProductId;
use super::product::Product;

/// One product line in the cart with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: String,
    /// Quantity in the cart, always at least 1.
    pub amount: u32,
}

impl CartItem {
    /// Create a new cart line from a catalog product.
    #[must_use]
    pub fn from_product(product: Product, amount: u32) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image: product.image,
            amount,
        }
    }

    /// Price multiplied by quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.amount)
    }
}

/// Request to set a cart line to an explicit quantity.
///
/// `amount` is caller-supplied and may be zero or negative; such requests are
/// ignored by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// The shopping cart.
///
/// Serializes as a bare JSON array of lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Cart lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == product_id)
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Quantity of a product in the cart, 0 when absent.
    #[must_use]
    pub fn amount_of(&self, product_id: ProductId) -> u32 {
        self.get(product_id).map_or(0, |item| item.amount)
    }

    /// Add one unit to an existing line.
    ///
    /// Returns `false` if the product has no line.
    pub fn increment(&mut self, product_id: ProductId) -> bool {
        match self.items.iter_mut().find(|item| item.id == product_id) {
            Some(item) => {
                item.amount = item.amount.saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// Append a line, replacing any existing line for the same product.
    pub fn push(&mut self, item: CartItem) {
        match self.items.iter_mut().find(|line| line.id == item.id) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    /// Set the quantity of an existing line.
    ///
    /// Returns `false` if the product has no line.
    pub fn set_amount(&mut self, product_id: ProductId, amount: u32) -> bool {
        match self.items.iter_mut().find(|item| item.id == product_id) {
            Some(item) => {
                item.amount = amount;
                true
            }
            None => false,
        }
    }

    /// Remove a product's line, returning it if present.
    pub fn remove(&mut self, product_id: ProductId) -> Option<CartItem> {
        let position = self.items.iter().position(|item| item.id == product_id)?;
        Some(self.items.remove(position))
    }

    /// Sum of all line subtotals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// Quantity in the cart keyed by product.
    #[must_use]
    pub fn amounts(&self) -> HashMap<ProductId, u32> {
        self.items
            .iter()
            .map(|item| (item.id, item.amount))
            .collect()
    }
}

impl From<Vec<CartItem>> for Cart {
    /// Build a cart from lines, keeping the last line seen for each product
    /// and dropping lines with a zero quantity.
    fn from(items: Vec<CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items.into_iter().filter(|item| item.amount > 0) {
            cart.push(item);
        }
        cart
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<CartItem>::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn item(id: i32, price: i64, amount: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            title: format!("Tênis {id}"),
            price: Decimal::new(price, 2),
            image: format!("https://example.com/{id}.jpg"),
            amount,
        }
    }

    #[test]
    fn test_amount_of_absent_is_zero() {
        let cart = Cart::from(vec![item(1, 1000, 2)]);
        assert_eq!(cart.amount_of(ProductId::new(1)), 2);
        assert_eq!(cart.amount_of(ProductId::new(9)), 0);
    }

    #[test]
    fn test_increment_only_touches_target_line() {
        let mut cart = Cart::from(vec![item(1, 1000, 1), item(2, 500, 3)]);
        assert!(cart.increment(ProductId::new(2)));
        assert!(!cart.increment(ProductId::new(3)));
        assert_eq!(cart.amount_of(ProductId::new(1)), 1);
        assert_eq!(cart.amount_of(ProductId::new(2)), 4);
    }

    #[test]
    fn test_remove_keeps_order_of_others() {
        let mut cart = Cart::from(vec![item(1, 1000, 1), item(2, 500, 1), item(3, 100, 1)]);
        let removed = cart.remove(ProductId::new(2)).unwrap();
        assert_eq!(removed.id, ProductId::new(2));
        let ids: Vec<_> = cart.items().iter().map(|i| i.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(cart.remove(ProductId::new(2)).is_none());
    }

    #[test]
    fn test_from_vec_deduplicates_by_id() {
        let cart = Cart::from(vec![item(1, 1000, 1), item(1, 1000, 4)]);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.amount_of(ProductId::new(1)), 4);
    }

    #[test]
    fn test_deserialize_drops_empty_lines() {
        let cart: Cart = serde_json::from_str(
            r#"[{"id":1,"title":"a","price":10,"image":"i","amount":0},
                {"id":2,"title":"b","price":5.5,"image":"i","amount":2}]"#,
        )
        .unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.amount_of(ProductId::new(2)), 2);
    }

    #[test]
    fn test_total_sums_subtotals() {
        let cart = Cart::from(vec![item(1, 17990, 2), item(2, 13990, 1)]);
        assert_eq!(cart.total(), Decimal::new(49970, 2));
    }

    #[test]
    fn test_serializes_as_array_with_numeric_price() {
        let cart = Cart::from(vec![item(5, 13990, 1)]);
        let json: serde_json::Value = serde_json::to_value(&cart).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["id"], 5);
        assert_eq!(json[0]["amount"], 1);
        assert!(json[0]["price"].is_number());

        let back: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(back, cart);
    }

    #[test]
    fn test_update_request_uses_camel_case() {
        let request: UpdateProductAmount =
            serde_json::from_str(r#"{"productId":3,"amount":-1}"#).unwrap();
        assert_eq!(request.product_id, ProductId::new(3));
        assert_eq!(request.amount, -1);
    }
}
