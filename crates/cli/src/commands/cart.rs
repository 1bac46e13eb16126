//! Cart commands.

use rocketshoes_cart::{DefaultCartStore, Outcome};
use rocketshoes_core::{CurrencyCode, ProductId, UpdateProductAmount};
use tracing::info;

use super::CommandError;

/// Show cart lines and total.
pub fn show(store: &DefaultCartStore, currency: CurrencyCode) {
    let view = store.view(currency);

    if view.items.is_empty() {
        info!("Cart is empty");
        return;
    }

    for item in &view.items {
        info!(
            "#{} {} - {} x {} = {}",
            item.id, item.title, item.amount, item.price, item.subtotal
        );
    }
    info!("{} product(s), total {}", view.size, view.total);
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns an error if the store rejected the operation.
pub async fn add(store: &DefaultCartStore, product_id: ProductId) -> Result<(), CommandError> {
    report(store.add_product(product_id).await)?;
    info!(
        "Product {product_id} now x{} in cart",
        store.cart().amount_of(product_id)
    );
    Ok(())
}

/// Remove a product's line.
///
/// # Errors
///
/// Returns an error if the store rejected the operation.
pub async fn remove(store: &DefaultCartStore, product_id: ProductId) -> Result<(), CommandError> {
    report(store.remove_product(product_id).await)?;
    info!("Product {product_id} removed from cart");
    Ok(())
}

/// Set a line's quantity.
///
/// # Errors
///
/// Returns an error if the store rejected the operation.
pub async fn update(
    store: &DefaultCartStore,
    request: UpdateProductAmount,
) -> Result<(), CommandError> {
    match report(store.update_product_amount(request).await)? {
        Outcome::Skipped => info!("Quantity must be at least 1, cart unchanged"),
        _ => info!(
            "Product {} now x{} in cart",
            request.product_id, request.amount
        ),
    }
    Ok(())
}

fn report(outcome: Outcome) -> Result<Outcome, CommandError> {
    match outcome {
        Outcome::Rejected(notification) => Err(CommandError::Rejected(notification)),
        other => Ok(other),
    }
}
