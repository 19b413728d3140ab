//! Order input data.

use serde::Serialize;

use crate::domain::{
    carts::records::CartItem,
    orders::records::{OrderItem, OrderStatus},
};

/// Payload for creating a durable order. The payment intent id is attached
/// separately once the provider reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// Client-generated reference that ties the order to its payment.
    pub order_ref: String,
    pub items: Vec<OrderItem>,
    /// Order total in minor units.
    pub total: u64,
    /// ISO 4217 currency code.
    pub currency: String,
}

/// Server-side filter for order listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
}

/// Map a cart line to its order-item form.
#[must_use]
pub fn order_item_from_cart(item: &CartItem) -> OrderItem {
    OrderItem {
        photo_id: item.photo_id.clone(),
        event_id: item.event_id.clone(),
        format: item.format,
        quantity: item.quantity,
        unit_price: item.unit_price,
    }
}
