use async_trait::async_trait;
use rust_decimal::Decimal;

use super::fx_errors::FxError;

/// External source of spot FX rates.
#[async_trait]
pub trait FxRateProvider: Send + Sync {
    /// Units of `to` per one unit of `from`.
    async fn fetch_rate(&self, from: &str, to: &str) -> Result<Decimal, FxError>;
}
