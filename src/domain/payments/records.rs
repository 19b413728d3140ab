//! Payment records.

/// Everything the payment provider needs to open a checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPayment {
    /// Client-generated order reference, echoed back on confirmation.
    pub order_ref: String,
    /// Amount to charge, in minor units.
    pub amount: u64,
    /// ISO 4217 currency code.
    pub currency: String,
    pub customer_email: String,
    /// Set when every cart line belongs to the same event.
    pub event_id: Option<String>,
    /// Where the provider sends the customer after a successful payment.
    pub success_url: String,
    /// Where the provider sends the customer after an abandoned payment.
    pub cancel_url: String,
}

/// The provider's answer to a session request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInitiation {
    /// Whether the provider accepted the session.
    pub success: bool,
    /// Hosted payment page to redirect the customer to.
    pub checkout_url: Option<String>,
    /// Provider-supplied reason when `success` is `false`.
    pub error: Option<String>,
}
