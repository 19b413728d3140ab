//! Fallback pricing.
//!
//! When the cart API cannot price an item for us, the client prices it
//! itself: the event's base price (or [`DEFAULT_BASE_PRICE`] when event
//! metadata is also unavailable) plus a per-format surcharge.

use crate::domain::carts::records::PhotoFormat;

/// Base price in minor units applied when no event metadata is available.
pub const DEFAULT_BASE_PRICE: u64 = 5_99;

/// Currency assumed when no event metadata is available.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Surcharge over the event base price for a given format, in minor units.
#[must_use]
pub fn format_surcharge(format: PhotoFormat) -> u64 {
    match format {
        PhotoFormat::Digital => 0,
        PhotoFormat::PrintSmall => 2_00,
        PhotoFormat::PrintMedium => 5_00,
        PhotoFormat::PrintLarge => 15_00,
    }
}

/// Unit price for a locally priced item.
#[must_use]
pub fn fallback_unit_price(base_price: u64, format: PhotoFormat) -> u64 {
    base_price + format_surcharge(format)
}
