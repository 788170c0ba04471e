use lazy_static::lazy_static;
use std::collections::HashSet;

/// Suffix appended to bare tickers; NSE is the home market.
pub const DEFAULT_MARKET_SUFFIX: &str = ".NS";

lazy_static! {
    /// US-listed tickers accepted without a market suffix.
    static ref US_TICKERS: HashSet<&'static str> = [
        "AAPL", "MSFT", "GOOGL", "GOOG", "AMZN", "META", "TSLA", "NVDA",
        "NFLX", "AMD", "INTC", "JPM", "BAC", "V", "MA", "WMT", "DIS",
        "UBER", "GE", "BA", "XOM", "CVX", "PFE", "JNJ", "MRK", "ABBV",
        "LLY", "UNH", "GS", "MS", "C", "WFC", "KO", "PEP", "MCD", "SBUX",
        "NKE", "HD", "COST", "BABA", "NIO", "COIN", "PLTR", "RBLX",
        "ABNB", "SHOP", "SPY", "QQQ", "BRK.B", "BRK.A", "PYPL", "SQ",
        "ZM", "F", "GM",
    ]
    .into_iter()
    .collect();
}

/// Resolve a raw user-entered ticker to its canonical symbol.
///
/// Rules, in order:
/// 1. Trim and uppercase.
/// 2. Already carries a market-suffix delimiter (`.`) - the user has fully
///    qualified it, return as-is.
/// 3. Known US-listed ticker - return as-is.
/// 4. Anything else is assumed to be an NSE listing and gets the default
///    suffix appended.
///
/// Distinct raw inputs may resolve to the same canonical symbol
/// ("reliance" and "RELIANCE.NS"); that collapse is what de-duplicates
/// holdings in the ledger.
pub fn resolve(raw: &str) -> String {
    let symbol = raw.trim().to_uppercase();
    if symbol.contains('.') {
        return symbol;
    }
    if US_TICKERS.contains(symbol.as_str()) {
        return symbol;
    }
    format!("{}{}", symbol, DEFAULT_MARKET_SUFFIX)
}

/// Strip the Indian market suffixes for presentation ("RELIANCE.NS" shows
/// as "RELIANCE"). Foreign symbols pass through unchanged.
pub fn display_symbol(symbol: &str) -> String {
    symbol
        .strip_suffix(".NS")
        .or_else(|| symbol.strip_suffix(".BO"))
        .unwrap_or(symbol)
        .to_string()
}
