//! Subcommand implementations.

pub mod cart;
pub mod products;

use rocketshoes_cart::{ApiError, Notification};
use thiserror::Error;

/// Errors that end a CLI invocation with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The API client could not be built or a catalog lookup failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The cart operation was rejected; the user has already been notified.
    #[error("Cart operation rejected: {0:?}")]
    Rejected(Notification),
}
