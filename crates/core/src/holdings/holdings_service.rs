//! The merge/update algorithm - how an incoming lot lands in the ledger.

use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};

use super::holdings_model::{Holding, HoldingLot, UpdateMode};
use super::holdings_store::LedgerStore;
use crate::constants::AVERAGE_COST_DECIMALS;
use crate::errors::{Result, ValidationError};
use folio_market_data::resolver;

/// Apply an incoming add/edit lot to the ledger, returning the resulting
/// holding.
///
/// The raw symbol is resolved to its canonical form before lookup, so
/// "reliance" and "RELIANCE.NS" land on the same position. Validation
/// happens before any mutation - a rejected lot leaves the ledger
/// untouched.
///
/// - `Edit` on an existing position replaces quantity and average cost
///   outright, keeping `added_at`.
/// - `Add` on an existing position merges: quantities sum, and the average
///   cost becomes the quantity-weighted mean of both lots, rounded to four
///   decimal places. Re-adding the same lot moves the average again - adds
///   are not idempotent.
/// - Either mode on a missing position inserts a fresh holding stamped now
///   (`Edit` falling back to insert covers an edit racing a remote delete).
pub fn apply_lot(store: &mut LedgerStore, lot: &HoldingLot, mode: UpdateMode) -> Result<Holding> {
    let raw_symbol = lot.symbol.trim();
    if raw_symbol.is_empty() {
        return Err(ValidationError::EmptySymbol.into());
    }
    if lot.quantity <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveQuantity.into());
    }
    if lot.average_cost <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAverageCost.into());
    }

    let symbol = resolver::resolve(raw_symbol);

    let updated = match (mode, store.get(&symbol)) {
        (UpdateMode::Edit, Some(existing)) => Holding {
            symbol,
            quantity: lot.quantity,
            average_cost: lot.average_cost,
            added_at: existing.added_at,
        },
        (UpdateMode::Add, Some(existing)) => Holding {
            symbol,
            quantity: existing.quantity + lot.quantity,
            average_cost: merged_average_cost(
                existing.quantity,
                existing.average_cost,
                lot.quantity,
                lot.average_cost,
            ),
            added_at: existing.added_at,
        },
        (_, None) => Holding {
            symbol,
            quantity: lot.quantity,
            average_cost: lot.average_cost,
            added_at: Utc::now(),
        },
    };

    store.upsert(updated.clone());
    Ok(updated)
}

/// Quantity-weighted mean of the old position and the new lot, rounded to
/// four decimal places half-away-from-zero (standard cost-basis averaging).
fn merged_average_cost(
    old_quantity: Decimal,
    old_average: Decimal,
    lot_quantity: Decimal,
    lot_average: Decimal,
) -> Decimal {
    let total_quantity = old_quantity + lot_quantity;
    ((old_quantity * old_average + lot_quantity * lot_average) / total_quantity)
        .round_dp_with_strategy(AVERAGE_COST_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}
