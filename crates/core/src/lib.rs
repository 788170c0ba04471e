//! Folio Core - portfolio ledger, valuation, and sync orchestration.
//!
//! This crate is the shared engine behind the desktop and mobile surfaces:
//! the holdings ledger and its merge algorithm, the username identity
//! session, the FX rate cache, the valuation aggregator, and the periodic
//! refresh loop. Presentation is out of scope here - adapters consume the
//! engine through [`Engine`], [`sync::PortfolioSession`], and the
//! scheduler's watch channel.

pub mod constants;
pub mod engine;
pub mod errors;
pub mod fx;
pub mod holdings;
pub mod identity;
pub mod settings;
pub mod sync;
pub mod valuation;

// Re-export the types adapters touch most.
pub use engine::Engine;
pub use errors::{Error, Result};
pub use holdings::{Holding, HoldingLot, LedgerStore, UpdateMode};
pub use sync::{PortfolioSession, RefreshScheduler, SessionState};
pub use valuation::{PortfolioValuation, ValuationService};
