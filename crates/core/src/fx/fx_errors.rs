use thiserror::Error;

/// Errors from the external FX rate source.
///
/// These never reach the valuation path - [`super::RateCache`] absorbs them
/// and degrades to a stale or default rate - but the provider seam reports
/// them faithfully so the cache can log what went wrong.
#[derive(Error, Debug)]
pub enum FxError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate {from}->{to} missing from provider response")]
    MissingRate { from: String, to: String },

    #[error("Unexpected FX response: {0}")]
    InvalidResponse(String),
}
