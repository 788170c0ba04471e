//! Market data access.
//!
//! [`MarketDataProvider`] is the seam the valuation aggregator consumes;
//! [`HttpMarketDataProvider`] is the production implementation over the
//! market-data service's REST endpoints.

mod http;
mod traits;

pub use http::HttpMarketDataProvider;
pub use traits::MarketDataProvider;
