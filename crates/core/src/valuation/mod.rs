//! Valuation - combining the ledger with live quotes into per-holding and
//! portfolio-level figures.

mod valuation_model;
mod valuation_service;

pub use valuation_model::{HoldingValuation, PortfolioSummary, PortfolioValuation};
pub use valuation_service::ValuationService;
