//! Test Helpers

use jiff::Timestamp;
use uuid::Uuid;

use crate::{
    domain::{
        carts::{
            data::NewCartItem,
            records::{CartItem, PhotoFormat},
        },
        checkout::billing::BillingDetails,
        orders::records::{Order, OrderStatus},
    },
    http::GatewayError,
};

pub(crate) fn cart_item(
    photo_id: &str,
    event_id: &str,
    unit_price: u64,
    quantity: u32,
) -> CartItem {
    CartItem {
        id: Uuid::now_v7().to_string(),
        photo_id: photo_id.to_owned(),
        event_id: event_id.to_owned(),
        event_name: format!("Event {event_id}"),
        thumbnail_url: None,
        unit_price,
        currency: "EUR".to_owned(),
        quantity,
        format: PhotoFormat::Digital,
        added_at: Timestamp::now(),
    }
}

pub(crate) fn new_cart_item(photo_id: &str, event_id: &str, quantity: u32) -> NewCartItem {
    NewCartItem {
        photo_id: photo_id.to_owned(),
        event_id: event_id.to_owned(),
        quantity,
        format: None,
        thumbnail_url: None,
    }
}

pub(crate) fn billing_details() -> BillingDetails {
    BillingDetails {
        full_name: "Ada Lovelace".to_owned(),
        email: "ada@example.com".to_owned(),
        phone: "+44 20 7946 0123".to_owned(),
        address: "12 Analytical Row".to_owned(),
        city: "London".to_owned(),
        postal_code: "EC1A 1BB".to_owned(),
        country: "GB".to_owned(),
    }
}

pub(crate) fn order(status: OrderStatus) -> Order {
    Order {
        id: "order-42".to_owned(),
        order_ref: format!("ord_{}", Uuid::now_v7().simple()),
        status,
        total: 50_00,
        currency: "EUR".to_owned(),
        payment_intent_id: None,
        created_at: Timestamp::now(),
        items: Vec::new(),
    }
}

/// A gateway error that does not need a live `reqwest::Error`.
pub(crate) fn unreachable_api() -> GatewayError {
    GatewayError::UnexpectedStatus {
        status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        body: "upstream unreachable".to_owned(),
    }
}
