//! Error types for the market data crate.

use thiserror::Error;

/// Errors that can occur while fetching market data.
///
/// None of these are fatal to a render: the valuation aggregator in
/// `folio-core` treats any of them as "no quote for this row" and keeps
/// going with the remaining holdings.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The service answered with an explicit error payload for this symbol.
    #[error("Market data unavailable for {symbol}: {message}")]
    ProviderError {
        /// Symbol the request was for
        symbol: String,
        /// The error message from the service
        message: String,
    },

    /// The service rate limited the request (HTTP 429).
    #[error("Rate limited by market data service")]
    RateLimited,

    /// The request timed out before the service answered.
    #[error("Timeout fetching market data for {symbol}")]
    Timeout {
        /// Symbol the request was for
        symbol: String,
    },

    /// The response body did not match the documented shape.
    #[error("Unexpected market data response: {0}")]
    InvalidResponse(String),

    /// A transport-level error occurred.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let error = MarketDataError::ProviderError {
            symbol: "RELIANCE.NS".to_string(),
            message: "Could not fetch quote".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Market data unavailable for RELIANCE.NS: Could not fetch quote"
        );
    }

    #[test]
    fn test_timeout_display_names_symbol() {
        let error = MarketDataError::Timeout {
            symbol: "AAPL".to_string(),
        };
        assert_eq!(format!("{}", error), "Timeout fetching market data for AAPL");
    }
}
