//! Canonical symbol resolution.
//!
//! Turns whatever the user typed into the canonical instrument symbol used
//! as the ledger key. Resolution is a pure function of the input and a
//! static allow-list: no I/O, no failure path.

mod symbol_resolver;

pub use symbol_resolver::{display_symbol, resolve, DEFAULT_MARKET_SUFFIX};
