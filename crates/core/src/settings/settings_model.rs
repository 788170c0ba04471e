use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::REFRESH_INTERVAL;

/// Endpoints and cadence for the engine's collaborators.
///
/// Defaults point at a local portfolio server and the public Frankfurter
/// FX API; each field can be overridden through `FOLIO_*` environment
/// variables, which is how the presentation adapters configure deployed
/// builds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Base URL of the remote ledger collaborator.
    pub ledger_api_url: String,

    /// Base URL of the market-data service (quotes + profiles).
    pub market_data_url: String,

    /// Base URL of the external FX rate source.
    pub fx_api_url: String,

    /// Seconds between refresh cycles.
    pub refresh_interval_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ledger_api_url: "http://localhost:5000".to_string(),
            market_data_url: "http://localhost:5000/si".to_string(),
            fx_api_url: "https://api.frankfurter.app".to_string(),
            refresh_interval_secs: REFRESH_INTERVAL.as_secs(),
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `FOLIO_LEDGER_API_URL`,
    /// `FOLIO_MARKET_DATA_URL`, `FOLIO_FX_API_URL`, and
    /// `FOLIO_REFRESH_INTERVAL_SECS` where set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = env::var("FOLIO_LEDGER_API_URL") {
            config.ledger_api_url = url;
        }
        if let Ok(url) = env::var("FOLIO_MARKET_DATA_URL") {
            config.market_data_url = url;
        }
        if let Ok(url) = env::var("FOLIO_FX_API_URL") {
            config.fx_api_url = url;
        }
        if let Ok(secs) = env::var("FOLIO_REFRESH_INTERVAL_SECS") {
            if let Ok(secs) = secs.parse() {
                config.refresh_interval_secs = secs;
            }
        }
        config
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}
