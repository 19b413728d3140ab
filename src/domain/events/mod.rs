//! Events

pub mod gateway;
pub mod records;

pub use records::EventDetails;
