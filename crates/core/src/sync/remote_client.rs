//! HTTP client for the remote ledger collaborator.
//!
//! The server is authoritative for every identity's ledger; this client
//! speaks its small REST contract:
//! - `POST /api/portfolio/identify` - claim or rejoin a username
//! - `GET  /api/portfolio/load`     - full ledger for a username
//! - `POST /api/portfolio/save`     - upsert one holding
//! - `POST /api/portfolio/delete`   - remove one holding
//! - `POST /api/portfolio/sync`     - wholesale replace of the server copy

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::RemoteError;
use crate::holdings::Holding;

/// Default timeout for ledger API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The remote persistence seam the session talks through.
#[async_trait]
pub trait RemoteLedgerClient: Send + Sync {
    /// Claim a new username or rejoin an existing one. Returns the
    /// server-confirmed name.
    async fn identify(&self, username: &str) -> Result<String, RemoteError>;

    /// The full ledger for a username, in `added_at` order.
    async fn load(&self, username: &str) -> Result<Vec<Holding>, RemoteError>;

    /// Upsert one holding.
    async fn save(&self, username: &str, holding: &Holding) -> Result<(), RemoteError>;

    /// Delete one holding by canonical symbol.
    async fn delete(&self, username: &str, symbol: &str) -> Result<(), RemoteError>;

    /// Replace the entire server-side ledger with the given holdings.
    async fn replace_all(&self, username: &str, holdings: &[Holding]) -> Result<(), RemoteError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct IdentifyRequest<'a> {
    username: &'a str,
}

#[derive(Deserialize)]
struct IdentifyResponse {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct LoadResponse {
    #[serde(default)]
    holdings: Vec<Holding>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Serialize)]
struct SaveRequest<'a> {
    username: &'a str,
    symbol: &'a str,
    quantity: Decimal,
    average_cost: Decimal,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    added_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    username: &'a str,
    symbol: &'a str,
}

#[derive(Serialize)]
struct ReplaceAllRequest<'a> {
    username: &'a str,
    holdings: &'a [Holding],
}

// ─────────────────────────────────────────────────────────────────────────────
// HttpRemoteLedgerClient
// ─────────────────────────────────────────────────────────────────────────────

/// Production implementation over the portfolio server's REST API.
pub struct HttpRemoteLedgerClient {
    client: Client,
    base_url: String,
}

impl HttpRemoteLedgerClient {
    /// Create a client against the given base URL (no trailing slash).
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

    /// POST a JSON body and require a 2xx answer.
    async fn post_expect_ok<B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<(), RemoteError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteLedgerClient for HttpRemoteLedgerClient {
    async fn identify(&self, username: &str) -> Result<String, RemoteError> {
        let url = format!("{}/api/portfolio/identify", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&IdentifyRequest { username })
            .send()
            .await?;

        // The server answers rejections with a 4xx carrying an error
        // payload; probe the body before the status so the message
        // reaches the user verbatim.
        let status = response.status();
        let body: IdentifyResponse = response.json().await?;
        if let Some(error) = body.error {
            return Err(RemoteError::Rejected(error));
        }
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }
        body.username
            .ok_or_else(|| RemoteError::InvalidResponse("identify answer missing username".into()))
    }

    async fn load(&self, username: &str) -> Result<Vec<Holding>, RemoteError> {
        let url = format!("{}/api/portfolio/load", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("username", username)])
            .send()
            .await?;

        let status = response.status();
        let body: LoadResponse = response.json().await?;
        if let Some(error) = body.error {
            return Err(RemoteError::Rejected(error));
        }
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }

        debug!("loaded {} holdings for {}", body.holdings.len(), username);
        Ok(body.holdings)
    }

    async fn save(&self, username: &str, holding: &Holding) -> Result<(), RemoteError> {
        self.post_expect_ok(
            "/api/portfolio/save",
            &SaveRequest {
                username,
                symbol: &holding.symbol,
                quantity: holding.quantity,
                average_cost: holding.average_cost,
                added_at: holding.added_at,
            },
        )
        .await
    }

    async fn delete(&self, username: &str, symbol: &str) -> Result<(), RemoteError> {
        self.post_expect_ok("/api/portfolio/delete", &DeleteRequest { username, symbol })
            .await
    }

    async fn replace_all(&self, username: &str, holdings: &[Holding]) -> Result<(), RemoteError> {
        self.post_expect_ok(
            "/api/portfolio/sync",
            &ReplaceAllRequest { username, holdings },
        )
        .await
    }
}
