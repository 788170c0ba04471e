use super::holdings_model::Holding;

/// In-memory replica of one identity's ledger.
///
/// The server copy is authoritative; this cache exists for responsive
/// rendering between refreshes. Entries keep insertion order, which matches
/// the server's `added_at` ordering on load. Uniqueness per symbol is
/// enforced here: `upsert` replaces in place, and `replace_all` routes
/// through it.
#[derive(Debug, Clone, Default)]
pub struct LedgerStore {
    holdings: Vec<Holding>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn get(&self, symbol: &str) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.symbol == symbol)
    }

    /// Insert a holding, replacing any existing entry for the same symbol
    /// in place (position in the ordering is kept).
    pub fn upsert(&mut self, holding: Holding) {
        match self.holdings.iter_mut().find(|h| h.symbol == holding.symbol) {
            Some(existing) => *existing = holding,
            None => self.holdings.push(holding),
        }
    }

    pub fn remove(&mut self, symbol: &str) -> Option<Holding> {
        let index = self.holdings.iter().position(|h| h.symbol == symbol)?;
        Some(self.holdings.remove(index))
    }

    /// Wholesale replacement from a remote load - last-write-wins, no merge
    /// of concurrent edits.
    pub fn replace_all(&mut self, holdings: Vec<Holding>) {
        self.holdings.clear();
        for holding in holdings {
            self.upsert(holding);
        }
    }

    pub fn clear(&mut self) {
        self.holdings.clear();
    }

    /// Clone of the current entries, in order. The refresh cycle renders
    /// from a snapshot taken at cycle start.
    pub fn snapshot(&self) -> Vec<Holding> {
        self.holdings.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Holding> {
        self.holdings.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn holding(symbol: &str, quantity: rust_decimal::Decimal) -> Holding {
        Holding {
            symbol: symbol.to_string(),
            quantity,
            average_cost: dec!(100),
            added_at: Utc::now(),
        }
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut store = LedgerStore::new();
        store.upsert(holding("RELIANCE.NS", dec!(10)));
        store.upsert(holding("AAPL", dec!(5)));
        store.upsert(holding("RELIANCE.NS", dec!(12)));

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("RELIANCE.NS").unwrap().quantity, dec!(12));
        // Order preserved: RELIANCE stays first.
        assert_eq!(store.iter().next().unwrap().symbol, "RELIANCE.NS");
    }

    #[test]
    fn test_remove_deletes_the_entry() {
        let mut store = LedgerStore::new();
        store.upsert(holding("AAPL", dec!(5)));
        let removed = store.remove("AAPL").unwrap();
        assert_eq!(removed.quantity, dec!(5));
        assert!(store.is_empty());
        assert!(store.remove("AAPL").is_none());
    }

    #[test]
    fn test_replace_all_is_wholesale() {
        let mut store = LedgerStore::new();
        store.upsert(holding("AAPL", dec!(5)));
        store.replace_all(vec![holding("TCS.NS", dec!(3)), holding("INFY.NS", dec!(7))]);

        assert_eq!(store.len(), 2);
        assert!(store.get("AAPL").is_none());
        assert_eq!(store.get("INFY.NS").unwrap().quantity, dec!(7));
    }

    #[test]
    fn test_replace_all_deduplicates_by_symbol() {
        let mut store = LedgerStore::new();
        store.replace_all(vec![holding("TCS.NS", dec!(3)), holding("TCS.NS", dec!(9))]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("TCS.NS").unwrap().quantity, dec!(9));
    }
}
