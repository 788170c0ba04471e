use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use log::warn;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::fx_model::{CachedRate, CurrencyPair};
use super::fx_traits::FxRateProvider;
use crate::constants::FX_RATE_TTL;

/// TTL'd cache over an [`FxRateProvider`].
///
/// `get_rate` is infallible by contract: conversion must always produce a
/// usable number. A fetch failure degrades to the last cached value
/// (however old), then to a fixed fallback if nothing was ever fetched.
/// After a failure the degraded value is re-cached with a fresh timestamp,
/// so an unreachable provider is retried once per TTL window rather than
/// on every valuation cycle.
pub struct RateCache {
    provider: Arc<dyn FxRateProvider>,
    ttl: Duration,
    entries: RwLock<HashMap<CurrencyPair, CachedRate>>,
}

impl RateCache {
    pub fn new(provider: Arc<dyn FxRateProvider>) -> Self {
        Self::with_ttl(provider, FX_RATE_TTL)
    }

    pub fn with_ttl(provider: Arc<dyn FxRateProvider>, ttl: Duration) -> Self {
        Self {
            provider,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Units of `to` per one unit of `from`, from cache when fresh enough.
    pub async fn get_rate(&self, from: &str, to: &str) -> Decimal {
        if from.eq_ignore_ascii_case(to) {
            return Decimal::ONE;
        }
        let pair = CurrencyPair::new(from, to);

        let stale = {
            let entries = self.entries.read().await;
            match entries.get(&pair) {
                Some(cached) if cached.fetched_at.elapsed() < self.ttl => return cached.rate,
                Some(cached) => Some(cached.rate),
                None => None,
            }
        };

        let rate = match self.provider.fetch_rate(&pair.from, &pair.to).await {
            Ok(rate) => rate,
            Err(e) => {
                let degraded = stale.unwrap_or_else(|| fallback_rate(&pair));
                warn!(
                    "FX refresh failed for {}: {}. Using {} rate {}.",
                    pair,
                    e,
                    if stale.is_some() { "last known" } else { "fallback" },
                    degraded
                );
                degraded
            }
        };

        self.entries.write().await.insert(
            pair,
            CachedRate {
                rate,
                fetched_at: Instant::now(),
            },
        );
        rate
    }
}

/// Hardcoded last-resort rates for when the provider has never answered.
fn fallback_rate(pair: &CurrencyPair) -> Decimal {
    match (pair.from.as_str(), pair.to.as_str()) {
        ("USD", "INR") => dec!(84.0),
        _ => Decimal::ONE,
    }
}
