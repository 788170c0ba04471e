use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{AssetProfile, Quote};

/// Source of live quotes and company profiles.
///
/// Implementations must be safe to call concurrently: the refresh cycle
/// fetches every holding's quote and profile in parallel and joins the
/// results before aggregation.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch the live quote for a canonical symbol.
    async fn get_quote(&self, symbol: &str) -> Result<Quote, MarketDataError>;

    /// Fetch the company profile for a canonical symbol.
    async fn get_profile(&self, symbol: &str) -> Result<AssetProfile, MarketDataError>;
}
