//! Orders service.

use std::sync::Arc;
use std::time::Duration;

use tracing::{Span, debug, info};

use crate::domain::orders::{
    data::{NewOrder, OrderFilter},
    errors::OrdersServiceError,
    gateway::OrdersGateway,
    records::Order,
};

/// Cadence for settlement polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// Pause between checks.
    pub interval: Duration,
    /// Checks before giving up.
    pub max_attempts: u32,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 30,
        }
    }
}

/// Read and write access to durable orders.
#[derive(Clone)]
pub struct OrdersService {
    gateway: Arc<dyn OrdersGateway>,
}

impl OrdersService {
    #[must_use]
    pub fn new(gateway: Arc<dyn OrdersGateway>) -> Self {
        Self { gateway }
    }

    /// Create a durable order.
    ///
    /// # Errors
    ///
    /// Returns [`OrdersServiceError::Gateway`] when the orders API rejects
    /// the order or cannot be reached.
    #[tracing::instrument(
        name = "orders.service.create",
        skip(self, order),
        fields(order_ref = %order.order_ref, total = order.total),
        err
    )]
    pub async fn create(&self, order: NewOrder) -> Result<Order, OrdersServiceError> {
        let order = self.gateway.create_order(order).await?;
        info!(order_id = %order.id, "order created");

        Ok(order)
    }

    /// Fetch a single order.
    ///
    /// # Errors
    ///
    /// Returns [`OrdersServiceError::NotFound`] when the order does not
    /// exist.
    #[tracing::instrument(name = "orders.service.get_order", skip(self), err)]
    pub async fn get_order(&self, order_id: String) -> Result<Order, OrdersServiceError> {
        Ok(self.gateway.fetch_order(order_id).await?)
    }

    /// List orders, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns [`OrdersServiceError::Gateway`] when the orders API cannot be
    /// reached.
    #[tracing::instrument(name = "orders.service.list_orders", skip(self), err)]
    pub async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, OrdersServiceError> {
        Ok(self.gateway.list_orders(filter).await?)
    }

    /// Record the payment provider's intent id on an order.
    ///
    /// # Errors
    ///
    /// Returns [`OrdersServiceError::NotFound`] when the order does not
    /// exist.
    #[tracing::instrument(name = "orders.service.attach_payment_intent", skip(self), err)]
    pub async fn attach_payment_intent(
        &self,
        order_id: String,
        payment_intent_id: String,
    ) -> Result<Order, OrdersServiceError> {
        Ok(self
            .gateway
            .attach_payment_intent(order_id, payment_intent_id)
            .await?)
    }

    /// Re-fetch an order until it leaves `pending`.
    ///
    /// # Errors
    ///
    /// Returns [`OrdersServiceError::PollTimedOut`] when the order is still
    /// pending after `options.max_attempts` checks.
    #[tracing::instrument(
        name = "orders.service.poll_until_settled",
        skip(self, options),
        fields(attempts = tracing::field::Empty, status = tracing::field::Empty),
        err
    )]
    pub async fn poll_until_settled(
        &self,
        order_id: String,
        options: PollOptions,
    ) -> Result<Order, OrdersServiceError> {
        for attempt in 1..=options.max_attempts {
            let order = self.gateway.fetch_order(order_id.clone()).await?;

            if order.status.is_settled() {
                let span = Span::current();
                span.record("attempts", attempt);
                span.record("status", order.status.as_str());
                info!(order_id = %order.id, status = %order.status, "order settled");

                return Ok(order);
            }

            debug!(attempt, "order still pending");

            if attempt < options.max_attempts {
                tokio::time::sleep(options.interval).await;
            }
        }

        Err(OrdersServiceError::PollTimedOut {
            attempts: options.max_attempts,
        })
    }
}
