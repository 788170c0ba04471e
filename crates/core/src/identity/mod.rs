//! Username identity - the claim-a-name scheme.
//!
//! An identity is a bare opaque token: whoever knows the username can read
//! and write that ledger. There is no credential; validation is purely
//! syntactic and happens before any network call.

mod identity_model;
mod identity_store;

pub use identity_model::Username;
pub use identity_store::{JsonFileStateStore, LocalStateStore, MemoryStateStore};
