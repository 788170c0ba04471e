//! HTTP implementation of [`FxRateProvider`] over the Frankfurter-style
//! REST contract: `GET {base}/latest?from=USD&to=INR` answers
//! `{"rates": {"INR": 83.7}}`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::fx_errors::FxError;
use super::fx_traits::FxRateProvider;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    rates: HashMap<String, Decimal>,
}

/// Client for the external FX collaborator.
pub struct HttpFxProvider {
    client: Client,
    base_url: String,
}

impl HttpFxProvider {
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
}

#[async_trait]
impl FxRateProvider for HttpFxProvider {
    async fn fetch_rate(&self, from: &str, to: &str) -> Result<Decimal, FxError> {
        let url = format!("{}/latest", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("from", from), ("to", to)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FxError::InvalidResponse(format!(
                "HTTP {}",
                status.as_u16()
            )));
        }

        let body: RatesResponse = response.json().await?;
        body.rates
            .get(to)
            .copied()
            .ok_or_else(|| FxError::MissingRate {
                from: from.to_string(),
                to: to.to_string(),
            })
    }
}
