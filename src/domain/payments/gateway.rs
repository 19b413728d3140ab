//! Payment initiation gateway.

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::{
    domain::payments::records::{PaymentInitiation, PendingPayment},
    http::{Api, GatewayError, expect_success},
};

/// Payment provider operations.
#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Ask the provider to open a hosted checkout session.
    ///
    /// A clean `Err` means the provider could not be reached at all; a
    /// response with `success == false` means it refused the session.
    async fn initiate(&self, payment: PendingPayment) -> Result<PaymentInitiation, GatewayError>;
}

/// [`PaymentGateway`] backed by the marketplace HTTP API.
#[derive(Debug, Clone)]
pub struct HttpPaymentGateway {
    api: Api,
}

impl HttpPaymentGateway {
    #[must_use]
    pub fn new(api: Api) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn initiate(&self, payment: PendingPayment) -> Result<PaymentInitiation, GatewayError> {
        let response = self
            .api
            .http()
            .post(self.api.url("/api/payments/checkout-session"))
            .json(&SessionBody {
                amount: payment.amount,
                currency: &payment.currency,
                order_id: &payment.order_ref,
                event_id: payment.event_id.as_deref(),
                customer_email: &payment.customer_email,
                success_url: &payment.success_url,
                cancel_url: &payment.cancel_url,
            })
            .send()
            .await?;

        let response = expect_success(response).await?;
        let session: SessionDto = response.json().await?;

        Ok(PaymentInitiation {
            success: session.success,
            checkout_url: session.checkout_url,
            error: session.error,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionBody<'a> {
    amount: u64,
    currency: &'a str,
    order_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    event_id: Option<&'a str>,
    customer_email: &'a str,
    success_url: &'a str,
    cancel_url: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionDto {
    success: bool,
    checkout_url: Option<String>,
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn session_body_omits_an_absent_event_id() -> TestResult {
        let body = SessionBody {
            amount: 50_00,
            currency: "EUR",
            order_id: "ord_1",
            event_id: None,
            customer_email: "ada@example.com",
            success_url: "https://shop.example/checkout/success?order=ord_1",
            cancel_url: "https://shop.example/checkout/cancelled?order=ord_1",
        };

        let json = serde_json::to_value(&body)?;

        assert!(json.get("eventId").is_none());
        assert_eq!(json["orderId"], "ord_1");

        Ok(())
    }

    #[test]
    fn declined_sessions_carry_the_provider_reason() -> TestResult {
        let session: SessionDto =
            serde_json::from_str(r#"{"success":false,"error":"card_declined"}"#)?;

        assert!(!session.success);
        assert_eq!(session.error.as_deref(), Some("card_declined"));
        assert!(session.checkout_url.is_none());

        Ok(())
    }
}
