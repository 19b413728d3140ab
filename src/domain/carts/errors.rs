//! Carts service errors.

use thiserror::Error;

use crate::http::GatewayError;

/// Errors returned by the carts service.
#[derive(Debug, Error)]
pub enum CartsServiceError {
    /// The referenced cart line does not exist.
    #[error("cart item not found")]
    NotFound,

    /// Quantities start at one; zero is a removal, not an add.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// A batch add only partially succeeded.
    #[error("{added} of {requested} items were added to the cart")]
    PartialBatch { requested: usize, added: usize },

    /// The cart API failed and no local fallback applied.
    #[error("cart API error")]
    Gateway(#[from] GatewayError),
}
