//! Core error types for the Folio engine.
//!
//! The taxonomy follows the engine's failure policy: validation failures are
//! recoverable and surfaced inline, remote rejections are surfaced verbatim,
//! and network failures always have a degraded fallback (last local cache,
//! "unknown" valuation row, stale or default FX rate) rather than aborting
//! a render.

use thiserror::Error;

use crate::fx::FxError;
use folio_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A mutating operation was attempted with no claimed identity.
    /// Callers route this to the identity-claim flow.
    #[error("No identity claimed for this session")]
    NotIdentified,

    /// The server answered an identity claim with an explicit error payload.
    /// Surfaced verbatim to the user; no local state is changed.
    #[error("Identity claim rejected: {0}")]
    RemoteRejection(String),

    #[error("Remote ledger operation failed: {0}")]
    Remote(#[from] RemoteError),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Fx error: {0}")]
    Fx(#[from] FxError),
}

/// Errors from the remote ledger collaborator.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// A transport-level failure (DNS, connect, timeout, decode).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server returned an explicit error payload.
    #[error("{0}")]
    Rejected(String),

    /// The server answered with a non-success status and no error payload.
    #[error("Server returned HTTP {0}")]
    Status(u16),

    /// The response body did not match the documented shape.
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

/// Validation errors for user input.
///
/// Display strings double as the inline messages shown next to the form
/// field that produced them.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a stock symbol")]
    EmptySymbol,

    #[error("Quantity must be greater than zero")]
    NonPositiveQuantity,

    #[error("Average buy price must be greater than zero")]
    NonPositiveAverageCost,

    #[error("Username must be 2-30 characters")]
    UsernameLength,

    #[error("Username may only contain letters, numbers, _ and -")]
    UsernameCharset,
}
