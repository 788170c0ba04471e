//! HTTP implementation of [`MarketDataProvider`].
//!
//! Talks to the market-data service:
//! - `GET {base}/quote?symbol=` for live quotes
//! - `GET {base}/profile?symbol=` for company profiles
//!
//! The service signals per-symbol failures with a 200 response carrying an
//! `{"error": "..."}` payload, so the body is probed for an error field
//! before being parsed into the target model.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::MarketDataError;
use crate::models::{AssetProfile, Quote};
use crate::provider::MarketDataProvider;

/// Default timeout for market-data requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the market-data service.
pub struct HttpMarketDataProvider {
    client: Client,
    base_url: String,
}

impl HttpMarketDataProvider {
    /// Create a provider against the given base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        symbol: &str,
    ) -> Result<T, MarketDataError> {
        let url = format!("{}{}", self.base_url, endpoint);

        debug!("market data request: {} symbol={}", endpoint, symbol);

        let response = self
            .client
            .get(&url)
            .query(&[("symbol", symbol)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MarketDataError::Timeout {
                        symbol: symbol.to_string(),
                    }
                } else {
                    MarketDataError::Network(e)
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited);
        }
        if !status.is_success() {
            return Err(MarketDataError::ProviderError {
                symbol: symbol.to_string(),
                message: format!("HTTP {}", status.as_u16()),
            });
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout {
                    symbol: symbol.to_string(),
                }
            } else {
                MarketDataError::Network(e)
            }
        })?;

        // Per-symbol failures come back as 200 + {"error": "..."}.
        if let Some(message) = body.get("error").and_then(|v| v.as_str()) {
            return Err(MarketDataError::ProviderError {
                symbol: symbol.to_string(),
                message: message.to_string(),
            });
        }

        serde_json::from_value(body).map_err(|e| MarketDataError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl MarketDataProvider for HttpMarketDataProvider {
    async fn get_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        self.fetch_json("/quote", symbol).await
    }

    async fn get_profile(&self, symbol: &str) -> Result<AssetProfile, MarketDataError> {
        self.fetch_json("/profile", symbol).await
    }
}
