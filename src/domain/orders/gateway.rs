//! Orders gateway.

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;

use crate::{
    domain::orders::{
        data::{NewOrder, OrderFilter},
        records::Order,
    },
    http::{Api, GatewayError, expect_success},
};

/// Orders API operations.
#[automock]
#[async_trait]
pub trait OrdersGateway: Send + Sync {
    /// Create a durable order.
    async fn create_order(&self, order: NewOrder) -> Result<Order, GatewayError>;

    /// Fetch a single order by id.
    async fn fetch_order(&self, order_id: String) -> Result<Order, GatewayError>;

    /// List orders, optionally filtered by status.
    async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, GatewayError>;

    /// Record the payment provider's intent id on an order.
    async fn attach_payment_intent(
        &self,
        order_id: String,
        payment_intent_id: String,
    ) -> Result<Order, GatewayError>;
}

/// [`OrdersGateway`] backed by the marketplace HTTP API.
#[derive(Debug, Clone)]
pub struct HttpOrdersGateway {
    api: Api,
}

impl HttpOrdersGateway {
    #[must_use]
    pub fn new(api: Api) -> Self {
        Self { api }
    }
}

#[async_trait]
impl OrdersGateway for HttpOrdersGateway {
    async fn create_order(&self, order: NewOrder) -> Result<Order, GatewayError> {
        let response = self
            .api
            .http()
            .post(self.api.url("/api/orders"))
            .json(&order)
            .send()
            .await?;

        let response = expect_success(response).await?;

        Ok(response.json().await?)
    }

    async fn fetch_order(&self, order_id: String) -> Result<Order, GatewayError> {
        let response = self
            .api
            .http()
            .get(self.api.url(&format!("/api/orders/{order_id}")))
            .send()
            .await?;

        let response = expect_success(response).await?;

        Ok(response.json().await?)
    }

    async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, GatewayError> {
        let mut request = self.api.http().get(self.api.url("/api/orders"));
        if let Some(status) = filter.status {
            request = request.query(&[("status", status.as_str())]);
        }

        let response = request.send().await?;
        let response = expect_success(response).await?;

        Ok(response.json().await?)
    }

    async fn attach_payment_intent(
        &self,
        order_id: String,
        payment_intent_id: String,
    ) -> Result<Order, GatewayError> {
        let response = self
            .api
            .http()
            .patch(self.api.url(&format!("/api/orders/{order_id}")))
            .json(&AttachIntentBody {
                payment_intent_id: &payment_intent_id,
            })
            .send()
            .await?;

        let response = expect_success(response).await?;

        Ok(response.json().await?)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AttachIntentBody<'a> {
    payment_intent_id: &'a str,
}
