//! Carts service.
//!
//! Remote-first reconciliation over the cart API. Every mutation is tried
//! against the gateway; on success the store is replaced with the cart the
//! server returned, and on failure the same mutation is applied locally so
//! the cart stays usable while unsynced. The next successful remote call
//! overwrites any locally approximated state.

use std::sync::Arc;
use std::time::Duration;

use tracing::{Span, debug, info, warn};
use uuid::Uuid;

use crate::{
    domain::{
        carts::{
            data::NewCartItem,
            errors::CartsServiceError,
            gateway::{BatchAddResponse, CartGateway},
            records::{CartItem, CartSnapshot},
            store::CartStore,
        },
        events::gateway::EventsGateway,
    },
    pricing,
};

/// Pause between sequential fallback calls so a degraded batch does not
/// hammer the cart API.
const SEQUENTIAL_ADD_DELAY: Duration = Duration::from_millis(150);

/// How a cart mutation was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The cart API confirmed the operation; the store holds server state.
    Remote,
    /// The remote call failed; the store holds a local approximation.
    Fallback,
}

impl SyncOutcome {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate result of a batch add.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    /// Items the caller asked for.
    pub requested: usize,
    /// Items that made it into the cart, locally or remotely.
    pub added: usize,
    /// Items the server never saw (locally approximated lines).
    pub local_only: usize,
    /// Whether the batch endpoint itself served the request.
    pub outcome: SyncOutcome,
}

/// Reconciles cart mutations between the marketplace API and the local
/// cart store.
#[derive(Clone)]
pub struct CartsService {
    gateway: Arc<dyn CartGateway>,
    events: Arc<dyn EventsGateway>,
    store: Arc<CartStore>,
}

impl CartsService {
    #[must_use]
    pub fn new(
        gateway: Arc<dyn CartGateway>,
        events: Arc<dyn EventsGateway>,
        store: Arc<CartStore>,
    ) -> Self {
        Self {
            gateway,
            events,
            store,
        }
    }

    /// Latest snapshot of the local cart store.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.store.snapshot()
    }

    /// Replace local state with the server-held cart.
    ///
    /// Unlike the mutating operations this has no local fallback: a stale
    /// local cart is more useful than an emptied one, so on failure the
    /// store is left untouched and the error propagates.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::Gateway`] when the cart API call fails.
    #[tracing::instrument(name = "carts.service.refresh", skip(self), err)]
    pub async fn refresh(&self) -> Result<(), CartsServiceError> {
        let items = self.gateway.fetch().await?;
        debug!(count = items.len(), "cart refreshed from the API");
        self.store.replace(items);

        Ok(())
    }

    /// Add a photo to the cart.
    ///
    /// Remote-first: on success the store takes the server's cart. When the
    /// call fails the item is priced locally, from event metadata when
    /// available and from defaults otherwise, and upserted into the store.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::InvalidQuantity`] for a zero quantity.
    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, item),
        fields(
            photo_id = %item.photo_id,
            quantity = item.quantity,
            outcome = tracing::field::Empty,
        ),
        err
    )]
    pub async fn add_item(&self, item: NewCartItem) -> Result<SyncOutcome, CartsServiceError> {
        if item.quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        match self
            .gateway
            .add_item(item.photo_id.clone(), item.quantity, item.effective_format())
            .await
        {
            Ok(cart) => {
                self.store.replace(cart);
                Span::current().record("outcome", SyncOutcome::Remote.as_str());

                Ok(SyncOutcome::Remote)
            }
            Err(error) => {
                warn!(error = %error, "remote add failed; keeping the item locally");
                self.add_item_locally(item).await;
                Span::current().record("outcome", SyncOutcome::Fallback.as_str());

                Ok(SyncOutcome::Fallback)
            }
        }
    }

    /// Add several photos at once.
    ///
    /// Tries the batch endpoint first. When it fails, or answers without a
    /// usable cart, each item is added sequentially through [`Self::add_item`]
    /// with a short pause between calls; individual failures do not stop the
    /// remaining items.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::PartialBatch`] when some items could not
    /// be added at all.
    #[tracing::instrument(
        name = "carts.service.add_items",
        skip(self, items),
        fields(requested = items.len(), outcome = tracing::field::Empty),
        err
    )]
    pub async fn add_items(
        &self,
        items: Vec<NewCartItem>,
    ) -> Result<BatchReport, CartsServiceError> {
        let requested = items.len();
        if requested == 0 {
            return Ok(BatchReport {
                requested: 0,
                added: 0,
                local_only: 0,
                outcome: SyncOutcome::Remote,
            });
        }

        let items: Vec<NewCartItem> = items.into_iter().map(NewCartItem::normalized).collect();

        let batch_failure = match self.gateway.add_items_batch(items.clone()).await {
            Ok(BatchAddResponse {
                success: true,
                cart: Some(cart),
            }) => {
                self.store.replace(cart);
                Span::current().record("outcome", SyncOutcome::Remote.as_str());
                info!(added = requested, "batch add accepted");

                return Ok(BatchReport {
                    requested,
                    added: requested,
                    local_only: 0,
                    outcome: SyncOutcome::Remote,
                });
            }
            Ok(response) => format!(
                "batch endpoint refused the request: success={}, cart_returned={}",
                response.success,
                response.cart.is_some()
            ),
            Err(error) => error.to_string(),
        };

        warn!(
            error = %batch_failure,
            "batch add failed; falling back to sequential adds"
        );

        let mut added = 0_usize;
        let mut local_only = 0_usize;

        for (index, item) in items.into_iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(SEQUENTIAL_ADD_DELAY).await;
            }

            match self.add_item(item).await {
                Ok(SyncOutcome::Remote) => added += 1,
                Ok(SyncOutcome::Fallback) => {
                    added += 1;
                    local_only += 1;
                }
                Err(error) => {
                    warn!(error = %error, index, "sequential add failed; continuing");
                }
            }
        }

        Span::current().record("outcome", SyncOutcome::Fallback.as_str());

        if added < requested {
            return Err(CartsServiceError::PartialBatch { requested, added });
        }

        Ok(BatchReport {
            requested,
            added,
            local_only,
            outcome: SyncOutcome::Fallback,
        })
    }

    /// Change the quantity of a cart line. A zero quantity removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::NotFound`] when the remote call failed
    /// and the line is not in the local store either.
    #[tracing::instrument(
        name = "carts.service.update_quantity",
        skip(self),
        fields(outcome = tracing::field::Empty),
        err
    )]
    pub async fn update_quantity(
        &self,
        item_id: String,
        quantity: u32,
    ) -> Result<SyncOutcome, CartsServiceError> {
        if quantity == 0 {
            // Zero means the line should no longer exist.
            return self.remove_item(item_id).await;
        }

        match self.gateway.update_item(item_id.clone(), quantity).await {
            Ok(cart) => {
                self.store.replace(cart);
                Span::current().record("outcome", SyncOutcome::Remote.as_str());

                Ok(SyncOutcome::Remote)
            }
            Err(error) => {
                warn!(error = %error, "remote update failed; updating locally");
                if self.store.set_quantity(&item_id, quantity) {
                    Span::current().record("outcome", SyncOutcome::Fallback.as_str());

                    Ok(SyncOutcome::Fallback)
                } else {
                    Err(CartsServiceError::NotFound)
                }
            }
        }
    }

    /// Remove a cart line.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::NotFound`] when the remote call failed
    /// and the line is not in the local store either.
    #[tracing::instrument(
        name = "carts.service.remove_item",
        skip(self),
        fields(outcome = tracing::field::Empty),
        err
    )]
    pub async fn remove_item(&self, item_id: String) -> Result<SyncOutcome, CartsServiceError> {
        match self.gateway.remove_item(item_id.clone()).await {
            Ok(cart) => {
                self.store.replace(cart);
                Span::current().record("outcome", SyncOutcome::Remote.as_str());

                Ok(SyncOutcome::Remote)
            }
            Err(error) => {
                warn!(error = %error, "remote remove failed; removing locally");
                if self.store.remove(&item_id) {
                    Span::current().record("outcome", SyncOutcome::Fallback.as_str());

                    Ok(SyncOutcome::Fallback)
                } else {
                    Err(CartsServiceError::NotFound)
                }
            }
        }
    }

    /// Empty the cart.
    ///
    /// The local store is cleared even when the remote call fails, so the
    /// user always ends up with an empty cart.
    ///
    /// # Errors
    ///
    /// Currently infallible; the `Result` keeps the signature uniform with
    /// the other mutations.
    #[tracing::instrument(
        name = "carts.service.clear",
        skip(self),
        fields(outcome = tracing::field::Empty),
        err
    )]
    pub async fn clear(&self) -> Result<SyncOutcome, CartsServiceError> {
        let outcome = match self.gateway.clear().await {
            Ok(()) => SyncOutcome::Remote,
            Err(error) => {
                warn!(error = %error, "remote clear failed; clearing locally only");
                SyncOutcome::Fallback
            }
        };

        self.store.clear();
        Span::current().record("outcome", outcome.as_str());

        Ok(outcome)
    }

    /// Price and store an item the server never saw.
    async fn add_item_locally(&self, item: NewCartItem) {
        let (event_name, base_price, currency) =
            match self.events.fetch_event(item.event_id.clone()).await {
                Ok(event) => (event.name, event.base_price, event.currency),
                Err(error) => {
                    warn!(
                        error = %error,
                        event_id = %item.event_id,
                        "event lookup failed; using default pricing"
                    );
                    (
                        String::new(),
                        pricing::DEFAULT_BASE_PRICE,
                        pricing::DEFAULT_CURRENCY.to_owned(),
                    )
                }
            };

        let format = item.effective_format();

        self.store.upsert(CartItem {
            id: Uuid::now_v7().to_string(),
            photo_id: item.photo_id,
            event_id: item.event_id,
            event_name,
            thumbnail_url: item.thumbnail_url,
            unit_price: pricing::fallback_unit_price(base_price, format),
            currency,
            quantity: item.quantity,
            format,
            added_at: jiff::Timestamp::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::{
        domain::{
            carts::{gateway::MockCartGateway, records::PhotoFormat},
            events::{EventDetails, gateway::MockEventsGateway},
        },
        test::helpers::{cart_item, new_cart_item, unreachable_api},
    };

    fn service(
        gateway: MockCartGateway,
        events: MockEventsGateway,
    ) -> (CartsService, Arc<CartStore>) {
        let store = Arc::new(CartStore::new());
        let service = CartsService::new(Arc::new(gateway), Arc::new(events), Arc::clone(&store));

        (service, store)
    }

    #[tokio::test]
    async fn add_item_rejects_a_zero_quantity_without_calling_the_api() {
        let mut gateway = MockCartGateway::new();
        gateway.expect_add_item().never();
        let (service, _store) = service(gateway, MockEventsGateway::new());

        let mut item = new_cart_item("photo-1", "event-1", 1);
        item.quantity = 0;
        let result = service.add_item(item).await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );
    }

    #[tokio::test]
    async fn add_item_replaces_the_store_with_the_server_cart() -> TestResult {
        let mut gateway = MockCartGateway::new();
        gateway
            .expect_add_item()
            .once()
            .withf(|photo_id, quantity, format| {
                photo_id == "photo-1" && *quantity == 2 && *format == PhotoFormat::Digital
            })
            .returning(|_, _, _| Ok(vec![cart_item("photo-1", "event-1", 12_00, 2)]));
        let (service, store) = service(gateway, MockEventsGateway::new());

        let outcome = service.add_item(new_cart_item("photo-1", "event-1", 2)).await?;

        assert_eq!(outcome, SyncOutcome::Remote);
        assert_eq!(store.summary().subtotal, 24_00);

        Ok(())
    }

    #[tokio::test]
    async fn failed_add_prices_the_item_from_event_metadata() -> TestResult {
        let mut gateway = MockCartGateway::new();
        gateway
            .expect_add_item()
            .once()
            .returning(|_, _, _| Err(unreachable_api()));

        let mut events = MockEventsGateway::new();
        events.expect_fetch_event().once().returning(|event_id| {
            Ok(EventDetails {
                id: event_id,
                name: "City Marathon".to_owned(),
                base_price: 10_00,
                currency: "EUR".to_owned(),
            })
        });
        let (service, store) = service(gateway, events);

        let mut item = new_cart_item("photo-1", "event-1", 1);
        item.format = Some(PhotoFormat::PrintMedium);
        let outcome = service.add_item(item).await?;

        assert_eq!(outcome, SyncOutcome::Fallback);
        let items = store.items();
        assert_eq!(items[0].unit_price, 15_00);
        assert_eq!(items[0].event_name, "City Marathon");

        Ok(())
    }

    #[tokio::test]
    async fn failed_add_falls_back_to_default_pricing_when_metadata_is_gone() -> TestResult {
        let mut gateway = MockCartGateway::new();
        gateway
            .expect_add_item()
            .once()
            .returning(|_, _, _| Err(unreachable_api()));

        let mut events = MockEventsGateway::new();
        events
            .expect_fetch_event()
            .once()
            .returning(|_| Err(unreachable_api()));
        let (service, store) = service(gateway, events);

        service.add_item(new_cart_item("photo-1", "event-1", 1)).await?;

        let items = store.items();
        assert_eq!(items[0].unit_price, 5_99);
        assert_eq!(items[0].currency, "EUR");

        Ok(())
    }

    #[tokio::test]
    async fn adding_the_same_photo_twice_locally_bumps_the_quantity() -> TestResult {
        let mut gateway = MockCartGateway::new();
        gateway
            .expect_add_item()
            .times(2)
            .returning(|_, _, _| Err(unreachable_api()));

        let mut events = MockEventsGateway::new();
        events
            .expect_fetch_event()
            .times(2)
            .returning(|_| Err(unreachable_api()));
        let (service, store) = service(gateway, events);

        service.add_item(new_cart_item("photo-1", "event-1", 1)).await?;
        service.add_item(new_cart_item("photo-1", "event-1", 1)).await?;

        let items = store.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);

        Ok(())
    }

    #[tokio::test]
    async fn update_to_zero_quantity_removes_the_line() -> TestResult {
        let mut gateway = MockCartGateway::new();
        gateway.expect_update_item().never();
        gateway
            .expect_remove_item()
            .once()
            .withf(|item_id| item_id == "ci_1")
            .returning(|_| Ok(Vec::new()));
        let (service, store) = service(gateway, MockEventsGateway::new());

        let outcome = service.update_quantity("ci_1".to_owned(), 0).await?;

        assert_eq!(outcome, SyncOutcome::Remote);
        assert!(store.items().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn local_update_of_an_unknown_line_is_not_found() {
        let mut gateway = MockCartGateway::new();
        gateway
            .expect_update_item()
            .once()
            .returning(|_, _| Err(unreachable_api()));
        let (service, _store) = service(gateway, MockEventsGateway::new());

        let result = service.update_quantity("ci_missing".to_owned(), 3).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn refresh_propagates_gateway_failures_and_keeps_local_state() {
        let mut gateway = MockCartGateway::new();
        gateway
            .expect_fetch()
            .once()
            .returning(|| Err(unreachable_api()));
        let (service, store) = service(gateway, MockEventsGateway::new());
        store.replace(vec![cart_item("photo-1", "event-1", 10_00, 1)]);

        let result = service.refresh().await;

        assert!(matches!(result, Err(CartsServiceError::Gateway(_))));
        assert_eq!(store.items().len(), 1, "stale cart must be preserved");
    }

    #[tokio::test]
    async fn clear_empties_the_store_even_when_the_api_is_down() -> TestResult {
        let mut gateway = MockCartGateway::new();
        gateway
            .expect_clear()
            .once()
            .returning(|| Err(unreachable_api()));
        let (service, store) = service(gateway, MockEventsGateway::new());
        store.replace(vec![cart_item("photo-1", "event-1", 10_00, 1)]);

        let outcome = service.clear().await?;

        assert_eq!(outcome, SyncOutcome::Fallback);
        assert!(store.items().is_empty());

        Ok(())
    }
}
