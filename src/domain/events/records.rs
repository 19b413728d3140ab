//! Event records.

/// Display and pricing metadata for an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetails {
    pub id: String,
    pub name: String,
    /// Base price of a digital photo at this event, in minor units.
    pub base_price: u64,
    /// ISO 4217 currency code.
    pub currency: String,
}
