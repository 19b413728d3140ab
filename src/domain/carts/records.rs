//! Cart records.

use jiff::Timestamp;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Product format for a purchased photo.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum PhotoFormat {
    /// Digital download at the event's base price.
    #[default]
    Digital,
    /// Small print.
    PrintSmall,
    /// Medium print.
    PrintMedium,
    /// Large print.
    PrintLarge,
}

impl PhotoFormat {
    /// Stable wire and display name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Digital => "digital",
            Self::PrintSmall => "print-small",
            Self::PrintMedium => "print-medium",
            Self::PrintLarge => "print-large",
        }
    }
}

impl std::fmt::Display for PhotoFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    /// Server-assigned line id. Locally generated while the line is unsynced.
    pub id: String,
    pub photo_id: String,
    pub event_id: String,
    pub event_name: String,
    pub thumbnail_url: Option<String>,
    /// Unit price in minor units.
    pub unit_price: u64,
    /// ISO 4217 currency code.
    pub currency: String,
    pub quantity: u32,
    pub format: PhotoFormat,
    pub added_at: Timestamp,
}

impl CartItem {
    /// Line total in minor units.
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.unit_price * u64::from(self.quantity)
    }
}

/// Derived, read-only projection over the current cart items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartSummary {
    /// Sum of line quantities.
    pub item_count: u32,
    /// Sum of line totals, in minor units.
    pub subtotal: u64,
    /// Tax charged on top of the subtotal. Photo sales are currently untaxed.
    pub tax: u64,
    /// Subtotal plus tax.
    pub total: u64,
    /// Number of distinct events represented in the cart.
    pub unique_events: usize,
}

impl CartSummary {
    /// Recompute the projection from a full item list.
    #[must_use]
    pub fn from_items(items: &[CartItem]) -> Self {
        let item_count = items.iter().map(|item| item.quantity).sum();
        let subtotal = items.iter().map(CartItem::line_total).sum::<u64>();
        let unique_events: FxHashSet<&str> =
            items.iter().map(|item| item.event_id.as_str()).collect();

        let tax = 0;

        Self {
            item_count,
            subtotal,
            tax,
            total: subtotal + tax,
            unique_events: unique_events.len(),
        }
    }
}

/// The unit of publication of the local cart cache: the full item list and
/// the summary derived from it, always consistent with each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    pub summary: CartSummary,
}
