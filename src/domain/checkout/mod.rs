//! Checkout

pub mod billing;
pub mod errors;
pub mod service;

pub use billing::{BillingDetails, BillingField, BillingIssue};
pub use errors::CheckoutError;
pub use service::*;
