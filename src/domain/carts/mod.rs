//! Carts

pub mod data;
pub mod errors;
pub mod gateway;
pub mod records;
pub mod service;
pub mod store;

pub use errors::CartsServiceError;
pub use service::*;
pub use store::CartStore;
