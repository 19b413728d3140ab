//! Checkout service.
//!
//! Drives the checkout flow as a small state machine observable through a
//! [`watch`] channel: `Idle`, `Validating`, `PaymentInitiated`,
//! `AwaitingConfirmation`, then `Completed` or `Failed`. Billing validation
//! happens before any network call; the cart is only cleared once the
//! durable order exists.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{Span, debug, info, warn};
use uuid::Uuid;

use crate::{
    domain::{
        carts::{records::CartItem, service::CartsService, store::CartStore},
        checkout::{billing::BillingDetails, errors::CheckoutError},
        orders::{
            data::{NewOrder, order_item_from_cart},
            records::Order,
            service::OrdersService,
        },
        payments::{gateway::PaymentGateway, records::PendingPayment},
    },
    pricing,
};

/// Observable state of the checkout flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckoutPhase {
    #[default]
    Idle,
    /// Billing and cart checks are running; nothing has been sent yet.
    Validating,
    /// The payment provider has been asked for a session.
    PaymentInitiated,
    /// The customer is with the provider; waiting for confirmation.
    AwaitingConfirmation,
    Completed,
    Failed,
}

impl CheckoutPhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::PaymentInitiated => "payment_initiated",
            Self::AwaitingConfirmation => "awaiting_confirmation",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the customer wants to pay. Captured before checkout starts but
/// resolved on the provider's hosted page, so it is never transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PaymentMethod {
    Card,
    Paypal,
    Sepa,
}

/// Everything the customer submitted to start a checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub billing: BillingDetails,
    pub payment_method: Option<PaymentMethod>,
}

/// Hand-off to the payment provider's hosted page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutHandoff {
    /// Client-generated reference for the eventual order.
    pub order_ref: String,
    /// Hosted payment page to redirect the customer to.
    pub checkout_url: String,
}

/// What the provider's redirect told us about a finished payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmation {
    pub order_ref: String,
    pub payment_intent_id: Option<String>,
}

/// Where the provider sends the customer back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTargets {
    pub success_url: String,
    pub cancel_url: String,
}

impl RedirectTargets {
    /// Standard redirect pages under the web app's base URL.
    #[must_use]
    pub fn from_app_url(app_url: &str) -> Self {
        let base = app_url.trim_end_matches('/');

        Self {
            success_url: format!("{base}/checkout/success"),
            cancel_url: format!("{base}/checkout/cancelled"),
        }
    }

    /// Redirect pair carrying the order reference as a query parameter.
    #[must_use]
    fn for_order(&self, order_ref: &str) -> (String, String) {
        (
            format!("{}?order={order_ref}", self.success_url),
            format!("{}?order={order_ref}", self.cancel_url),
        )
    }
}

/// Orchestrates validation, payment initiation and order creation.
pub struct CheckoutService {
    store: Arc<CartStore>,
    carts: Arc<CartsService>,
    payments: Arc<dyn PaymentGateway>,
    orders: Arc<OrdersService>,
    redirects: RedirectTargets,
    phase: watch::Sender<CheckoutPhase>,
}

impl CheckoutService {
    #[must_use]
    pub fn new(
        store: Arc<CartStore>,
        carts: Arc<CartsService>,
        payments: Arc<dyn PaymentGateway>,
        orders: Arc<OrdersService>,
        redirects: RedirectTargets,
    ) -> Self {
        let (phase, _) = watch::channel(CheckoutPhase::Idle);

        Self {
            store,
            carts,
            payments,
            orders,
            redirects,
            phase,
        }
    }

    /// Current phase of the checkout flow.
    #[must_use]
    pub fn phase(&self) -> CheckoutPhase {
        *self.phase.borrow()
    }

    /// Subscribe to phase transitions.
    #[must_use]
    pub fn subscribe_phase(&self) -> watch::Receiver<CheckoutPhase> {
        self.phase.subscribe()
    }

    /// Validate the request and hand the customer over to the payment
    /// provider.
    ///
    /// Nothing leaves the client while validation fails: the provider is
    /// only contacted once billing details, payment method and cart state
    /// all check out. The cart itself is not touched here.
    ///
    /// # Errors
    ///
    /// Validation errors ([`CheckoutError::InvalidBilling`],
    /// [`CheckoutError::MissingPaymentMethod`], [`CheckoutError::EmptyCart`],
    /// [`CheckoutError::NonPositiveTotal`]) leave the flow in `Validating`;
    /// payment errors move it to `Failed`.
    #[tracing::instrument(
        name = "checkout.service.begin",
        skip(self, request),
        fields(order_ref = tracing::field::Empty),
        err
    )]
    pub async fn begin(&self, request: CheckoutRequest) -> Result<CheckoutHandoff, CheckoutError> {
        self.set_phase(CheckoutPhase::Validating);

        if let Err(issues) = request.billing.validate() {
            return Err(CheckoutError::InvalidBilling(issues));
        }

        if request.payment_method.is_none() {
            return Err(CheckoutError::MissingPaymentMethod);
        }

        let snapshot = self.store.snapshot();
        if snapshot.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        if snapshot.summary.total == 0 {
            return Err(CheckoutError::NonPositiveTotal);
        }

        let order_ref = generate_order_ref();
        Span::current().record("order_ref", order_ref.as_str());

        let (success_url, cancel_url) = self.redirects.for_order(&order_ref);
        let event_id = if snapshot.summary.unique_events == 1 {
            snapshot.items.first().map(|item| item.event_id.clone())
        } else {
            None
        };

        let payment = PendingPayment {
            order_ref: order_ref.clone(),
            amount: snapshot.summary.total,
            currency: cart_currency(&snapshot.items),
            customer_email: request.billing.email.trim().to_owned(),
            event_id,
            success_url,
            cancel_url,
        };

        self.set_phase(CheckoutPhase::PaymentInitiated);

        let initiation = match self.payments.initiate(payment).await {
            Ok(initiation) => initiation,
            Err(error) => {
                self.set_phase(CheckoutPhase::Failed);
                return Err(CheckoutError::Payment(error));
            }
        };

        if !initiation.success {
            self.set_phase(CheckoutPhase::Failed);
            let reason = initiation
                .error
                .unwrap_or_else(|| "payment rejected by provider".to_owned());

            return Err(CheckoutError::PaymentDeclined(reason));
        }

        let Some(checkout_url) = initiation.checkout_url else {
            self.set_phase(CheckoutPhase::Failed);
            return Err(CheckoutError::MissingRedirect);
        };

        self.set_phase(CheckoutPhase::AwaitingConfirmation);
        info!(order_ref = %order_ref, "payment initiated; awaiting confirmation");

        Ok(CheckoutHandoff {
            order_ref,
            checkout_url,
        })
    }

    /// Turn a confirmed payment into a durable order and empty the cart.
    ///
    /// The cart is cleared only after order creation succeeds, so a failed
    /// creation can be retried with the purchase intact. Attaching the
    /// payment intent id is best-effort: the order exists either way.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::OrderCreation`] when the orders API rejects
    /// the order; the phase is left untouched so the caller may retry.
    #[tracing::instrument(
        name = "checkout.service.complete_order",
        skip(self, confirmation),
        fields(order_ref = %confirmation.order_ref),
        err
    )]
    pub async fn complete_order(
        &self,
        confirmation: PaymentConfirmation,
    ) -> Result<Order, CheckoutError> {
        let snapshot = self.store.snapshot();
        if snapshot.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let new_order = NewOrder {
            order_ref: confirmation.order_ref,
            items: snapshot.items.iter().map(order_item_from_cart).collect(),
            total: snapshot.summary.total,
            currency: cart_currency(&snapshot.items),
        };

        let order = match self.orders.create(new_order).await {
            Ok(order) => order,
            Err(error) => {
                warn!(error = %error, "order creation failed; cart preserved");
                return Err(CheckoutError::OrderCreation(error));
            }
        };

        if let Some(intent) = confirmation.payment_intent_id {
            if let Err(error) = self
                .orders
                .attach_payment_intent(order.id.clone(), intent)
                .await
            {
                warn!(error = %error, order_id = %order.id, "could not attach payment intent");
            }
        }

        let cleared = self.carts.clear().await?;
        debug!(outcome = %cleared, "cart cleared after order creation");

        self.set_phase(CheckoutPhase::Completed);
        info!(order_id = %order.id, "checkout completed");

        Ok(order)
    }

    fn set_phase(&self, phase: CheckoutPhase) {
        self.phase.send_replace(phase);
        debug!(phase = %phase, "checkout phase changed");
    }
}

/// New order references: UUIDv7 keeps them time-ordered and unguessable.
fn generate_order_ref() -> String {
    format!("ord_{}", Uuid::now_v7().simple())
}

/// The cart is single-currency in practice; take the first line's currency
/// and fall back to the default for safety.
fn cart_currency(items: &[CartItem]) -> String {
    items
        .first()
        .map_or_else(|| pricing::DEFAULT_CURRENCY.to_owned(), |item| item.currency.clone())
}
