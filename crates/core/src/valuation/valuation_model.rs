use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::holdings::Holding;

/// One ledger row with its live figures, in the instrument's own currency.
///
/// A row whose quote fetch failed keeps `invested` (that needs no market
/// data) and leaves every live field `None` - "unknown", not an error.
#[derive(Debug, Clone, Serialize)]
pub struct HoldingValuation {
    pub holding: Holding,

    /// Symbol with the domestic-market suffix stripped, for display.
    pub display_symbol: String,

    /// Company name from the profile, when one was fetched.
    pub name: Option<String>,

    /// Logo URL from the profile.
    pub logo: Option<String>,

    /// Currency of the live fields; the base currency when no quote came
    /// back.
    pub currency: String,

    /// quantity x average_cost
    pub invested: Decimal,

    /// Last traded price from the quote.
    pub last_price: Option<Decimal>,

    /// quantity x last_price
    pub current_value: Option<Decimal>,

    pub pnl: Option<Decimal>,

    /// pnl / invested x 100; absent when invested is zero.
    pub pnl_pct: Option<Decimal>,
}

impl HoldingValuation {
    /// Whether this row has live market data and so participates in the
    /// portfolio totals.
    pub fn is_live(&self) -> bool {
        self.current_value.is_some()
    }
}

/// Portfolio-level totals, in the base currency.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioSummary {
    pub base_currency: String,
    pub total_invested: Decimal,
    pub total_value: Decimal,
    pub total_pnl: Decimal,
    /// total_pnl / total_invested x 100, zero when nothing is invested.
    pub total_return_pct: Decimal,
    /// Rows that contributed to the totals.
    pub live_positions: usize,
    pub total_positions: usize,
    /// True when live rows span more than one currency.
    pub mixed_currency: bool,
    /// Conversion rates applied to foreign rows, keyed by source currency.
    pub applied_fx_rates: HashMap<String, Decimal>,
}

/// The full result of one aggregation pass.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioValuation {
    pub positions: Vec<HoldingValuation>,
    pub summary: PortfolioSummary,
}
