//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    config::ClientConfig,
    domain::{
        carts::{gateway::HttpCartGateway, service::CartsService, store::CartStore},
        checkout::service::{CheckoutService, RedirectTargets},
        events::gateway::HttpEventsGateway,
        orders::{gateway::HttpOrdersGateway, service::OrdersService},
        payments::gateway::HttpPaymentGateway,
    },
    http::{self, Api},
};

/// Errors during application context initialization.
#[derive(Debug, Error)]
pub enum AppInitError {
    /// The shared HTTP client could not be constructed.
    #[error("failed to build the HTTP client")]
    HttpClient(#[source] reqwest::Error),
}

/// Shared application context holding the wired-up services.
#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<CartStore>,
    pub carts: Arc<CartsService>,
    pub orders: Arc<OrdersService>,
    pub checkout: Arc<CheckoutService>,
}

impl AppContext {
    /// Wire every gateway and service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, AppInitError> {
        let client =
            http::build_client(config.request_timeout()).map_err(AppInitError::HttpClient)?;
        let api = Api::new(config.api_url.clone(), client);

        let store = Arc::new(CartStore::new());
        let carts = Arc::new(CartsService::new(
            Arc::new(HttpCartGateway::new(api.clone())),
            Arc::new(HttpEventsGateway::new(api.clone())),
            Arc::clone(&store),
        ));
        let orders = Arc::new(OrdersService::new(Arc::new(HttpOrdersGateway::new(
            api.clone(),
        ))));
        let checkout = Arc::new(CheckoutService::new(
            Arc::clone(&store),
            Arc::clone(&carts),
            Arc::new(HttpPaymentGateway::new(api)),
            Arc::clone(&orders),
            RedirectTargets::from_app_url(&config.app_url),
        ));

        Ok(Self {
            store,
            carts,
            orders,
            checkout,
        })
    }
}
