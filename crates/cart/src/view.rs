//! Display data derived from the cart and catalog.

use rocketshoes_core::{Cart, CartItem, CurrencyCode, Price, Product, ProductId};
use serde::Serialize;

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub amount: u32,
    pub price: String,
    pub subtotal: String,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    /// Number of distinct products, as shown on the header badge.
    pub size: usize,
}

impl CartView {
    /// Build display data for `cart`, formatting prices in `currency`.
    #[must_use]
    pub fn new(cart: &Cart, currency: CurrencyCode) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| CartItemView::new(item, currency))
                .collect(),
            total: Price::new(cart.total(), currency).display(),
            size: cart.len(),
        }
    }
}

impl CartItemView {
    fn new(item: &CartItem, currency: CurrencyCode) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            image: item.image.clone(),
            amount: item.amount,
            price: Price::new(item.price, currency).display(),
            subtotal: Price::new(item.subtotal(), currency).display(),
        }
    }
}

/// A catalog product annotated with cart and stock state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub product: Product,
    /// Formatted price.
    pub price: String,
    /// Quantity of this product already in the cart.
    pub in_cart: u32,
    /// Available quantity, `None` when the stock service has no entry.
    pub in_stock: Option<u32>,
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_cart_view_formats_prices_and_total() {
        let cart = Cart::from(vec![
            CartItem {
                id: ProductId::new(1),
                title: "Tênis de Caminhada Leve Confortável".to_string(),
                price: Decimal::new(17990, 2),
                image: "https://example.com/1.jpg".to_string(),
                amount: 2,
            },
            CartItem {
                id: ProductId::new(2),
                title: "Tênis VR Caminhada Confortável Detalhes Couro Masculino".to_string(),
                price: Decimal::new(13990, 2),
                image: "https://example.com/2.jpg".to_string(),
                amount: 1,
            },
        ]);

        let view = CartView::new(&cart, CurrencyCode::BRL);

        assert_eq!(view.size, 2);
        assert_eq!(view.items[0].price, "R$ 179,90");
        assert_eq!(view.items[0].subtotal, "R$ 359,80");
        assert_eq!(view.total, "R$ 499,70");
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::new(&Cart::new(), CurrencyCode::USD);
        assert!(view.items.is_empty());
        assert_eq!(view.total, "$0.00");
        assert_eq!(view.size, 0);
    }
}
