use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A live quote for one symbol, valid only for the instant it was fetched.
///
/// Mirrors the `/quote` payload of the market-data service. Only the last
/// traded price and the quote currency are required; everything else is
/// best-effort and may be absent depending on the instrument's home market.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Quote {
    /// Last traded price (required)
    pub current: Decimal,

    /// Previous session close
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_close: Option<Decimal>,

    /// Absolute change since previous close
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<Decimal>,

    /// Percentage change since previous close
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_pct: Option<Decimal>,

    /// Session open
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<Decimal>,

    /// Session high
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<Decimal>,

    /// Session low
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<Decimal>,

    /// Session traded volume
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,

    /// Average daily volume
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_volume: Option<u64>,

    /// Quote currency ("INR" for NSE/BSE listings, "USD" for US listings)
    pub currency: String,
}

impl Quote {
    /// Create a quote with only the required fields, for callers that
    /// construct quotes directly (tests, fixtures).
    pub fn new(current: Decimal, currency: impl Into<String>) -> Self {
        Self {
            current,
            prev_close: None,
            change: None,
            change_pct: None,
            open: None,
            high: None,
            low: None,
            volume: None,
            avg_volume: None,
            currency: currency.into(),
        }
    }
}
