//! Snapcart
//!
//! Cart and checkout client for an event-photography marketplace. The cart
//! lives on the server; this crate keeps an observable local copy in sync,
//! falls back to local state while the API is unreachable, and drives the
//! checkout flow from billing validation to the durable order.

pub mod config;
pub mod context;
pub mod domain;
pub mod http;
pub mod pricing;

#[cfg(test)]
mod test;
