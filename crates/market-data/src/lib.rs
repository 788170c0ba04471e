//! Folio Market Data - symbol resolution and live market data access.
//!
//! This crate contains the pieces of the engine that talk about instruments:
//! the canonical symbol resolver and the HTTP client for the market-data
//! service (quotes and company profiles). It knows nothing about ledgers,
//! identities, or valuation - that lives in `folio-core`.

pub mod errors;
pub mod models;
pub mod provider;
pub mod resolver;

pub use errors::MarketDataError;
pub use models::{AssetProfile, Quote};
pub use provider::{HttpMarketDataProvider, MarketDataProvider};
pub use resolver::{display_symbol, resolve, DEFAULT_MARKET_SUFFIX};
