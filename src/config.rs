//! Client configuration module

use std::time::Duration;

use clap::Parser;

/// Marketplace client configuration
#[derive(Debug, Clone, Parser)]
pub struct ClientConfig {
    /// Marketplace API base URL
    #[arg(long, env = "SNAPCART_API_URL", default_value = "http://localhost:3000")]
    pub api_url: String,

    /// Web app base URL, used to build checkout redirect targets
    #[arg(long, env = "SNAPCART_APP_URL", default_value = "http://localhost:4200")]
    pub app_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "SNAPCART_REQUEST_TIMEOUT_SECS", default_value = "10")]
    pub request_timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl ClientConfig {
    /// Load configuration from environment variables and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Per-request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
