//! Order records.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::domain::carts::records::PhotoFormat;

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Created, payment not yet confirmed by the provider.
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the order has reached a terminal state.
    #[must_use]
    pub fn is_settled(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One purchased photo inside an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub photo_id: String,
    pub event_id: String,
    pub format: PhotoFormat,
    pub quantity: u32,
    /// Unit price in minor units.
    pub unit_price: u64,
}

/// A durable order as held by the marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Server-assigned order id.
    pub id: String,
    /// Client-generated reference handed to the payment provider.
    pub order_ref: String,
    pub status: OrderStatus,
    /// Order total in minor units.
    pub total: u64,
    /// ISO 4217 currency code.
    pub currency: String,
    #[serde(default)]
    pub payment_intent_id: Option<String>,
    pub created_at: Timestamp,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn orders_deserialize_from_the_wire_shape() -> TestResult {
        let body = r#"{
            "id": "order-42",
            "orderRef": "ord_0192f0c1",
            "status": "pending",
            "total": 5000,
            "currency": "EUR",
            "createdAt": "2026-08-21T10:15:00Z",
            "items": [{
                "photoId": "photo-1",
                "eventId": "event-1",
                "format": "digital",
                "quantity": 2,
                "unitPrice": 2500
            }]
        }"#;

        let order: Order = serde_json::from_str(body)?;

        assert_eq!(order.status, OrderStatus::Pending);
        assert!(!order.status.is_settled());
        assert_eq!(order.items.len(), 1);
        assert!(order.payment_intent_id.is_none());

        Ok(())
    }

    #[test]
    fn settled_covers_both_terminal_states() {
        assert!(OrderStatus::Completed.is_settled());
        assert!(OrderStatus::Cancelled.is_settled());
    }
}
