//! Marketplace API access.
//!
//! All gateways share one [`Api`] handle: a configured [`reqwest::Client`]
//! plus the API base URL. Response bodies are parsed by the individual
//! gateways; this module only knows how to reach the API and how to turn a
//! non-success status into an error.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use thiserror::Error;

/// Errors surfaced by the marketplace API gateways.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport-level failure: connection, timeout, or body decoding.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("marketplace API returned {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code of the response.
        status: StatusCode,
        /// Response body, kept for diagnostics.
        body: String,
    },
}

/// Shared handle to the marketplace HTTP API.
#[derive(Debug, Clone)]
pub struct Api {
    base_url: String,
    http: Client,
}

impl Api {
    /// Create a handle from a base URL and a configured client.
    #[must_use]
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self { base_url, http }
    }

    /// Absolute URL for an API path. `path` must start with `/`.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }
}

/// Build the HTTP client shared by every gateway.
///
/// # Errors
///
/// Returns an error when the TLS backend or client configuration cannot be
/// initialised.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

/// Pass 2xx responses through, turning anything else into
/// [`GatewayError::UnexpectedStatus`] with the body preserved.
pub(crate) async fn expect_success(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    Err(GatewayError::UnexpectedStatus { status, body })
}

#[cfg(test)]
mod tests {
    use super::Api;
    use reqwest::Client;

    #[test]
    fn url_joins_base_and_path() {
        let api = Api::new("http://localhost:3000", Client::new());

        assert_eq!(api.url("/api/cart"), "http://localhost:3000/api/cart");
    }

    #[test]
    fn trailing_slashes_are_stripped_from_the_base_url() {
        let api = Api::new("http://localhost:3000//", Client::new());

        assert_eq!(api.url("/api/cart"), "http://localhost:3000/api/cart");
    }
}
