//! The holdings ledger - domain model, in-memory store, and the
//! merge/update algorithm.

mod holdings_model;
mod holdings_service;
mod holdings_store;

pub use holdings_model::{Holding, HoldingLot, UpdateMode};
pub use holdings_service::apply_lot;
pub use holdings_store::LedgerStore;
