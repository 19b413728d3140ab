//! Orders service errors.

use reqwest::StatusCode;
use thiserror::Error;

use crate::http::GatewayError;

/// Errors returned by the orders service.
#[derive(Debug, Error)]
pub enum OrdersServiceError {
    /// The referenced order does not exist.
    #[error("order not found")]
    NotFound,

    /// The order never left `pending` within the polling budget.
    #[error("order still pending after {attempts} checks")]
    PollTimedOut { attempts: u32 },

    /// The orders API failed.
    #[error("orders API error")]
    Gateway(#[source] GatewayError),
}

impl From<GatewayError> for OrdersServiceError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::UnexpectedStatus { status, .. } if status == StatusCode::NOT_FOUND => {
                Self::NotFound
            }
            other => Self::Gateway(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_404_maps_to_not_found() {
        let error = GatewayError::UnexpectedStatus {
            status: StatusCode::NOT_FOUND,
            body: String::new(),
        };

        assert!(matches!(
            OrdersServiceError::from(error),
            OrdersServiceError::NotFound
        ));
    }

    #[test]
    fn other_statuses_stay_gateway_errors() {
        let error = GatewayError::UnexpectedStatus {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: String::new(),
        };

        assert!(matches!(
            OrdersServiceError::from(error),
            OrdersServiceError::Gateway(_)
        ));
    }
}
