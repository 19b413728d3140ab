//! Snapcart Domain Concerns

pub mod carts;
pub mod checkout;
pub mod events;
pub mod orders;
pub mod payments;
