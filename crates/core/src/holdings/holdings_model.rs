use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One position in the ledger.
///
/// There is at most one `Holding` per canonical symbol per identity; buying
/// the same instrument again merges into this record instead of creating a
/// second one. `quantity` and `average_cost` are strictly positive for a
/// live holding - removal deletes the record, it is never zeroed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Holding {
    /// Canonical instrument symbol (resolver output) - the ledger key.
    pub symbol: String,

    /// Number of shares/units held.
    pub quantity: Decimal,

    /// Weighted-average cost basis per unit, in the instrument's home
    /// market currency.
    pub average_cost: Decimal,

    /// When the position was first opened. Preserved across edits and
    /// merges; only a remove-then-re-add resets it. Epoch milliseconds on
    /// the wire.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub added_at: DateTime<Utc>,
}

/// An incoming add/edit operation as typed by the user: the symbol is raw
/// (unresolved) and the numbers are unvalidated.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingLot {
    pub symbol: String,
    pub quantity: Decimal,
    pub average_cost: Decimal,
}

/// How an incoming lot combines with an existing position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// Merge into the existing position, recomputing the weighted average.
    Add,
    /// Replace quantity and average cost outright.
    Edit,
}
