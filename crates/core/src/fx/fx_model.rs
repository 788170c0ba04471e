use std::fmt;

use rust_decimal::Decimal;
use tokio::time::Instant;

/// An ordered currency pair, the cache key. "USD/INR" means units of INR
/// per one USD.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyPair {
    pub from: String,
    pub to: String,
}

impl CurrencyPair {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_uppercase(),
            to: to.to_uppercase(),
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.from, self.to)
    }
}

/// A rate plus when it was obtained. Age, not wall-clock time, drives
/// expiry.
#[derive(Debug, Clone, Copy)]
pub struct CachedRate {
    pub rate: Decimal,
    pub fetched_at: Instant,
}
