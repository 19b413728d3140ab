//! Checkout errors.

use thiserror::Error;

use crate::{
    domain::{
        carts::errors::CartsServiceError, checkout::billing::BillingIssue,
        orders::errors::OrdersServiceError,
    },
    http::GatewayError,
};

/// Errors returned by the checkout service.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// One or more billing fields were rejected; nothing was sent anywhere.
    #[error("billing details failed validation")]
    InvalidBilling(Vec<BillingIssue>),

    /// A payment method must be chosen before checkout starts.
    #[error("no payment method selected")]
    MissingPaymentMethod,

    /// Checkout needs at least one cart line.
    #[error("cart is empty")]
    EmptyCart,

    /// The order total must be positive.
    #[error("order total must be positive")]
    NonPositiveTotal,

    /// The provider answered but refused to open a session.
    #[error("payment declined: {0}")]
    PaymentDeclined(String),

    /// The provider accepted the session but sent no redirect URL.
    #[error("payment provider returned no redirect URL")]
    MissingRedirect,

    /// The provider could not be reached.
    #[error("payment initiation failed")]
    Payment(#[source] GatewayError),

    /// The durable order could not be created; the cart is preserved.
    #[error("order creation failed")]
    OrderCreation(#[source] OrdersServiceError),

    /// A cart operation inside checkout failed.
    #[error("cart update failed")]
    Cart(#[from] CartsServiceError),
}
