//! Catalog listing.

use rocketshoes_cart::DefaultCartStore;
use rocketshoes_core::CurrencyCode;
use tracing::info;

use super::CommandError;

/// List the catalog with stock and in-cart quantities.
///
/// # Errors
///
/// Returns an error if the product or stock list cannot be fetched.
pub async fn list(store: &DefaultCartStore, currency: CurrencyCode) -> Result<(), CommandError> {
    let catalog = store.catalog(currency).await?;

    info!("{} product(s)", catalog.len());
    for entry in &catalog {
        let stock = entry
            .in_stock
            .map_or_else(|| "?".to_string(), |amount| amount.to_string());
        info!(
            "#{} {} - {} (stock {stock}, in cart {})",
            entry.product.id, entry.product.title, entry.price, entry.in_cart
        );
    }
    Ok(())
}
