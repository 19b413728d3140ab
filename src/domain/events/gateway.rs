//! Events metadata gateway.
//!
//! Read-only. The carts service only consults it when the cart API could
//! not price an item itself.

use async_trait::async_trait;
use mockall::automock;
use serde::Deserialize;

use crate::{
    domain::events::records::EventDetails,
    http::{Api, GatewayError, expect_success},
    pricing,
};

/// Event metadata lookups.
#[automock]
#[async_trait]
pub trait EventsGateway: Send + Sync {
    /// Fetch display and pricing metadata for an event.
    async fn fetch_event(&self, event_id: String) -> Result<EventDetails, GatewayError>;
}

/// [`EventsGateway`] backed by the marketplace HTTP API.
#[derive(Debug, Clone)]
pub struct HttpEventsGateway {
    api: Api,
}

impl HttpEventsGateway {
    #[must_use]
    pub fn new(api: Api) -> Self {
        Self { api }
    }
}

#[async_trait]
impl EventsGateway for HttpEventsGateway {
    async fn fetch_event(&self, event_id: String) -> Result<EventDetails, GatewayError> {
        let response = self
            .api
            .http()
            .get(self.api.url(&format!("/api/events/{event_id}")))
            .send()
            .await?;

        let response = expect_success(response).await?;
        let event: EventDto = response.json().await?;

        Ok(event.into_record())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventDto {
    id: String,
    #[serde(default)]
    name: String,
    base_price: Option<u64>,
    currency: Option<String>,
}

impl EventDto {
    fn into_record(self) -> EventDetails {
        EventDetails {
            id: self.id,
            name: self.name,
            base_price: self.base_price.unwrap_or(pricing::DEFAULT_BASE_PRICE),
            currency: self
                .currency
                .unwrap_or_else(|| pricing::DEFAULT_CURRENCY.to_owned()),
        }
    }
}
