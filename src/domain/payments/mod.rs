//! Payments

pub mod gateway;
pub mod records;

pub use records::{PaymentInitiation, PendingPayment};
