use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::join_all;
use log::warn;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::valuation_model::{HoldingValuation, PortfolioSummary, PortfolioValuation};
use crate::constants::BASE_CURRENCY;
use crate::fx::RateCache;
use crate::holdings::Holding;
use folio_market_data::{display_symbol, AssetProfile, MarketDataProvider, Quote};

/// Aggregates ledger entries and live quotes into portfolio figures.
///
/// Each holding is valued independently: quote and profile are fetched
/// concurrently across all holdings and joined before aggregation, and a
/// failed fetch degrades that one row to "unknown" instead of aborting the
/// pass. Foreign-currency rows are converted to the base currency through
/// the rate cache before entering the totals.
#[derive(Clone)]
pub struct ValuationService {
    market_data: Arc<dyn MarketDataProvider>,
    rate_cache: Arc<RateCache>,
}

impl ValuationService {
    pub fn new(market_data: Arc<dyn MarketDataProvider>, rate_cache: Arc<RateCache>) -> Self {
        Self {
            market_data,
            rate_cache,
        }
    }

    /// Run one aggregation pass over a ledger snapshot.
    pub async fn value_portfolio(&self, holdings: &[Holding]) -> PortfolioValuation {
        let fetched: Vec<(Option<Quote>, Option<AssetProfile>)> =
            join_all(holdings.iter().map(|h| self.fetch_instrument_data(&h.symbol))).await;

        let positions: Vec<HoldingValuation> = holdings
            .iter()
            .zip(fetched)
            .map(|(holding, (quote, profile))| value_holding(holding, quote, profile))
            .collect();

        let summary = self.summarize(&positions).await;

        PortfolioValuation { positions, summary }
    }

    /// Quote and profile for one symbol, fetched concurrently. Failures
    /// are logged and flattened to `None`.
    async fn fetch_instrument_data(
        &self,
        symbol: &str,
    ) -> (Option<Quote>, Option<AssetProfile>) {
        let (quote, profile) = tokio::join!(
            self.market_data.get_quote(symbol),
            self.market_data.get_profile(symbol),
        );

        let quote = quote
            .map_err(|e| warn!("Quote fetch failed for {}: {}", symbol, e))
            .ok();
        // Profiles are cosmetic; a miss is not worth a warning.
        let profile = profile.ok();

        (quote, profile)
    }

    async fn summarize(&self, positions: &[HoldingValuation]) -> PortfolioSummary {
        // Conversion rates for every foreign currency seen on a live row.
        let foreign_currencies: HashSet<&str> = positions
            .iter()
            .filter(|p| p.is_live() && p.currency != BASE_CURRENCY)
            .map(|p| p.currency.as_str())
            .collect();

        let mut applied_fx_rates: HashMap<String, Decimal> = HashMap::new();
        for currency in foreign_currencies {
            let rate = self.rate_cache.get_rate(currency, BASE_CURRENCY).await;
            applied_fx_rates.insert(currency.to_string(), rate);
        }

        let mut total_invested = Decimal::ZERO;
        let mut total_value = Decimal::ZERO;
        let mut live_positions = 0usize;
        let mut live_currencies: HashSet<&str> = HashSet::new();

        for position in positions {
            let Some(current_value) = position.current_value else {
                continue;
            };
            live_positions += 1;
            live_currencies.insert(position.currency.as_str());

            let rate = applied_fx_rates
                .get(&position.currency)
                .copied()
                .unwrap_or(Decimal::ONE);
            total_invested += position.invested * rate;
            total_value += current_value * rate;
        }

        let total_pnl = total_value - total_invested;
        let total_return_pct = if total_invested.is_zero() {
            Decimal::ZERO
        } else {
            total_pnl / total_invested * dec!(100)
        };

        PortfolioSummary {
            base_currency: BASE_CURRENCY.to_string(),
            total_invested,
            total_value,
            total_pnl,
            total_return_pct,
            live_positions,
            total_positions: positions.len(),
            mixed_currency: live_currencies.len() > 1,
            applied_fx_rates,
        }
    }
}

/// Value one row from its quote. Pure; independent of every other row.
fn value_holding(
    holding: &Holding,
    quote: Option<Quote>,
    profile: Option<AssetProfile>,
) -> HoldingValuation {
    let invested = holding.quantity * holding.average_cost;

    let last_price = quote.as_ref().map(|q| q.current);
    let current_value = last_price.map(|price| holding.quantity * price);
    let pnl = current_value.map(|cv| cv - invested);
    let pnl_pct = pnl.and_then(|p| {
        if invested.is_zero() {
            None
        } else {
            Some(p / invested * dec!(100))
        }
    });

    let currency = quote
        .as_ref()
        .map(|q| q.currency.clone())
        .unwrap_or_else(|| BASE_CURRENCY.to_string());

    let (name, logo) = profile
        .map(|p| (p.name, p.logo))
        .unwrap_or((None, None));

    HoldingValuation {
        display_symbol: display_symbol(&holding.symbol),
        holding: holding.clone(),
        name,
        logo,
        currency,
        invested,
        last_price,
        current_value,
        pnl,
        pnl_pct,
    }
}
