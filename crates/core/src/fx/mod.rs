//! FX (Foreign Exchange) - the TTL'd rate cache used when aggregating
//! mixed-currency holdings.

mod fx_errors;
mod fx_model;
mod fx_provider;
mod fx_service;
mod fx_traits;

pub use fx_errors::FxError;
pub use fx_model::{CachedRate, CurrencyPair};
pub use fx_provider::HttpFxProvider;
pub use fx_service::RateCache;
pub use fx_traits::FxRateProvider;
