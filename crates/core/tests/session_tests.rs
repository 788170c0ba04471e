//! Session lifecycle tests against an in-memory remote ledger.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use folio_core::errors::{Error, RemoteError};
use folio_core::fx::{FxError, FxRateProvider, RateCache};
use folio_core::holdings::{Holding, HoldingLot};
use folio_core::identity::{LocalStateStore, MemoryStateStore};
use folio_core::sync::{PortfolioSession, RefreshScheduler, RemoteLedgerClient, SessionState};
use folio_core::valuation::ValuationService;
use folio_market_data::{AssetProfile, MarketDataError, MarketDataProvider, Quote};

/// In-memory stand-in for the portfolio server, with switchable failure
/// modes.
#[derive(Default)]
struct MockRemote {
    ledgers: Mutex<HashMap<String, Vec<Holding>>>,
    fail_saves: AtomicBool,
    fail_loads: AtomicBool,
    reject_identify: Mutex<Option<String>>,
}

impl MockRemote {
    fn new() -> Self {
        Self::default()
    }

    fn seed(&self, username: &str, holdings: Vec<Holding>) {
        self.ledgers
            .lock()
            .unwrap()
            .insert(username.to_string(), holdings);
    }

    fn server_copy(&self, username: &str) -> Vec<Holding> {
        self.ledgers
            .lock()
            .unwrap()
            .get(username)
            .cloned()
            .unwrap_or_default()
    }

    fn network_error() -> RemoteError {
        RemoteError::Status(503)
    }
}

#[async_trait]
impl RemoteLedgerClient for MockRemote {
    async fn identify(&self, username: &str) -> Result<String, RemoteError> {
        if let Some(message) = self.reject_identify.lock().unwrap().clone() {
            return Err(RemoteError::Rejected(message));
        }
        self.ledgers
            .lock()
            .unwrap()
            .entry(username.to_string())
            .or_default();
        Ok(username.to_string())
    }

    async fn load(&self, username: &str) -> Result<Vec<Holding>, RemoteError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(Self::network_error());
        }
        Ok(self.server_copy(username))
    }

    async fn save(&self, username: &str, holding: &Holding) -> Result<(), RemoteError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Self::network_error());
        }
        let mut ledgers = self.ledgers.lock().unwrap();
        let ledger = ledgers.entry(username.to_string()).or_default();
        match ledger.iter_mut().find(|h| h.symbol == holding.symbol) {
            Some(existing) => *existing = holding.clone(),
            None => ledger.push(holding.clone()),
        }
        Ok(())
    }

    async fn delete(&self, username: &str, symbol: &str) -> Result<(), RemoteError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Self::network_error());
        }
        let mut ledgers = self.ledgers.lock().unwrap();
        if let Some(ledger) = ledgers.get_mut(username) {
            ledger.retain(|h| h.symbol != symbol);
        }
        Ok(())
    }

    async fn replace_all(&self, username: &str, holdings: &[Holding]) -> Result<(), RemoteError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Self::network_error());
        }
        self.ledgers
            .lock()
            .unwrap()
            .insert(username.to_string(), holdings.to_vec());
        Ok(())
    }
}

fn session_with(remote: Arc<MockRemote>) -> (PortfolioSession, Arc<MemoryStateStore>) {
    let local_state = Arc::new(MemoryStateStore::new());
    (
        PortfolioSession::new(remote, local_state.clone()),
        local_state,
    )
}

fn lot(symbol: &str, quantity: Decimal, average_cost: Decimal) -> HoldingLot {
    HoldingLot {
        symbol: symbol.to_string(),
        quantity,
        average_cost,
    }
}

#[tokio::test]
async fn mutations_require_an_identity() {
    let (session, _) = session_with(Arc::new(MockRemote::new()));
    assert_eq!(session.state(), SessionState::Unidentified);

    let err = session
        .add_holding(&lot("AAPL", dec!(1), dec!(150)))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotIdentified));
    assert!(session.holdings().is_empty());
}

#[tokio::test]
async fn claim_pulls_the_server_ledger_and_persists_the_name() {
    let remote = Arc::new(MockRemote::new());
    remote.seed(
        "rahul_investor",
        vec![Holding {
            symbol: "TCS.NS".to_string(),
            quantity: dec!(4),
            average_cost: dec!(3550),
            added_at: chrono::Utc::now(),
        }],
    );
    let (session, local_state) = session_with(remote);

    let confirmed = session.claim_identity("rahul_investor").await.unwrap();
    assert_eq!(confirmed, "rahul_investor");
    assert_eq!(session.state(), SessionState::Synced);
    assert_eq!(session.holdings().len(), 1);
    assert_eq!(local_state.username(), Some("rahul_investor".to_string()));
}

#[tokio::test]
async fn rejected_claim_changes_nothing_locally() {
    let remote = Arc::new(MockRemote::new());
    *remote.reject_identify.lock().unwrap() = Some("Username must be 2-30 characters".to_string());
    let (session, local_state) = session_with(remote);

    let err = session.claim_identity("rahul").await.unwrap_err();
    match err {
        Error::RemoteRejection(message) => {
            assert_eq!(message, "Username must be 2-30 characters")
        }
        other => panic!("expected RemoteRejection, got {other:?}"),
    }
    assert_eq!(session.state(), SessionState::Unidentified);
    assert_eq!(local_state.username(), None);
}

#[tokio::test]
async fn rejected_claim_leaves_an_existing_session_intact() {
    let remote = Arc::new(MockRemote::new());
    let (session, local_state) = session_with(remote.clone());
    session.claim_identity("priya").await.unwrap();
    session
        .add_holding(&lot("AAPL", dec!(1), dec!(150)))
        .await
        .unwrap();

    *remote.reject_identify.lock().unwrap() = Some("Name not available".to_string());
    assert!(session.claim_identity("rahul").await.is_err());

    // Still priya's session, still synced, cache untouched.
    assert_eq!(session.state(), SessionState::Synced);
    assert_eq!(session.username(), Some("priya".to_string()));
    assert_eq!(session.holdings().len(), 1);
    assert_eq!(local_state.username(), Some("priya".to_string()));
}

#[tokio::test]
async fn invalid_username_is_rejected_before_the_wire() {
    let (session, _) = session_with(Arc::new(MockRemote::new()));
    let err = session.claim_identity("x").await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn add_merges_and_pushes_to_the_server() {
    let remote = Arc::new(MockRemote::new());
    let (session, _) = session_with(remote.clone());
    session.claim_identity("priya").await.unwrap();

    session
        .add_holding(&lot("AAPL", dec!(10), dec!(150)))
        .await
        .unwrap();
    let merged = session
        .add_holding(&lot("AAPL", dec!(10), dec!(170)))
        .await
        .unwrap();

    assert_eq!(merged.quantity, dec!(20));
    assert_eq!(merged.average_cost, dec!(160));

    let server = remote.server_copy("priya");
    assert_eq!(server.len(), 1);
    assert_eq!(server[0].quantity, dec!(20));
    assert_eq!(server[0].average_cost, dec!(160));
}

#[tokio::test]
async fn edit_replaces_on_server_too() {
    let remote = Arc::new(MockRemote::new());
    let (session, _) = session_with(remote.clone());
    session.claim_identity("priya").await.unwrap();

    session
        .add_holding(&lot("AAPL", dec!(10), dec!(150)))
        .await
        .unwrap();
    session
        .edit_holding(&lot("AAPL", dec!(5), dec!(200)))
        .await
        .unwrap();

    let server = remote.server_copy("priya");
    assert_eq!(server[0].quantity, dec!(5));
    assert_eq!(server[0].average_cost, dec!(200));
}

#[tokio::test]
async fn remove_then_re_add_resets_added_at_but_not_the_lot() {
    let remote = Arc::new(MockRemote::new());
    let (session, _) = session_with(remote.clone());
    session.claim_identity("priya").await.unwrap();

    let original = session
        .add_holding(&lot("RELIANCE", dec!(10), dec!(2400)))
        .await
        .unwrap();
    let removed = session.remove_holding("RELIANCE").await.unwrap().unwrap();
    assert_eq!(removed.symbol, "RELIANCE.NS");
    assert!(session.holdings().is_empty());
    assert!(remote.server_copy("priya").is_empty());

    let readded = session
        .add_holding(&lot("RELIANCE", dec!(10), dec!(2400)))
        .await
        .unwrap();
    assert_eq!(readded.quantity, original.quantity);
    assert_eq!(readded.average_cost, original.average_cost);
    assert!(readded.added_at >= original.added_at);
}

#[tokio::test]
async fn removing_an_unknown_symbol_is_a_no_op() {
    let (session, _) = session_with(Arc::new(MockRemote::new()));
    session.claim_identity("priya").await.unwrap();
    assert!(session.remove_holding("WIPRO").await.unwrap().is_none());
}

#[tokio::test]
async fn refresh_replaces_the_cache_wholesale() {
    let remote = Arc::new(MockRemote::new());
    let (session, _) = session_with(remote.clone());
    session.claim_identity("priya").await.unwrap();
    session
        .add_holding(&lot("AAPL", dec!(1), dec!(150)))
        .await
        .unwrap();

    // Another device rewrites the server copy; the next pull wins.
    remote.seed(
        "priya",
        vec![Holding {
            symbol: "INFY.NS".to_string(),
            quantity: dec!(12),
            average_cost: dec!(1500),
            added_at: chrono::Utc::now(),
        }],
    );
    assert!(session.refresh_ledger().await);

    let holdings = session.holdings();
    assert_eq!(holdings.len(), 1);
    assert_eq!(holdings[0].symbol, "INFY.NS");
    assert_eq!(session.state(), SessionState::Synced);
}

#[tokio::test]
async fn failed_pull_degrades_to_stale_cache() {
    let remote = Arc::new(MockRemote::new());
    let (session, _) = session_with(remote.clone());
    session.claim_identity("priya").await.unwrap();
    session
        .add_holding(&lot("AAPL", dec!(1), dec!(150)))
        .await
        .unwrap();

    remote.fail_loads.store(true, Ordering::SeqCst);
    assert!(session.refresh_ledger().await);

    // Cache survives, state says so.
    assert_eq!(session.state(), SessionState::Stale);
    assert_eq!(session.holdings().len(), 1);

    remote.fail_loads.store(false, Ordering::SeqCst);
    session.refresh_ledger().await;
    assert_eq!(session.state(), SessionState::Synced);
}

#[tokio::test]
async fn failed_push_is_tracked_not_raised() {
    let remote = Arc::new(MockRemote::new());
    let (session, _) = session_with(remote.clone());
    session.claim_identity("priya").await.unwrap();

    remote.fail_saves.store(true, Ordering::SeqCst);
    let holding = session
        .add_holding(&lot("AAPL", dec!(1), dec!(150)))
        .await
        .unwrap();

    // Local cache applied optimistically, push failure recorded.
    assert_eq!(holding.symbol, "AAPL");
    assert_eq!(session.holdings().len(), 1);
    assert_eq!(session.pending_pushes(), 1);
    assert!(session.last_push_error().is_some());
    assert!(remote.server_copy("priya").is_empty());

    // A successful pull clears the warning: the server copy won.
    remote.fail_saves.store(false, Ordering::SeqCst);
    session.refresh_ledger().await;
    assert_eq!(session.pending_pushes(), 0);
    assert!(session.last_push_error().is_none());
}

#[tokio::test]
async fn push_all_reuploads_the_local_cache() {
    let remote = Arc::new(MockRemote::new());
    let (session, _) = session_with(remote.clone());
    session.claim_identity("priya").await.unwrap();

    remote.fail_saves.store(true, Ordering::SeqCst);
    session
        .add_holding(&lot("AAPL", dec!(1), dec!(150)))
        .await
        .unwrap();
    session
        .add_holding(&lot("TCS", dec!(2), dec!(3500)))
        .await
        .unwrap();
    assert_eq!(session.pending_pushes(), 2);

    remote.fail_saves.store(false, Ordering::SeqCst);
    session.push_all().await.unwrap();

    assert_eq!(session.pending_pushes(), 0);
    assert_eq!(remote.server_copy("priya").len(), 2);
    assert_eq!(session.state(), SessionState::Synced);
}

#[tokio::test]
async fn switch_user_clears_cache_and_persisted_name() {
    let remote = Arc::new(MockRemote::new());
    let (session, local_state) = session_with(remote.clone());
    session.claim_identity("priya").await.unwrap();
    session
        .add_holding(&lot("AAPL", dec!(1), dec!(150)))
        .await
        .unwrap();

    session.switch_user();

    assert_eq!(session.state(), SessionState::Unidentified);
    assert!(session.holdings().is_empty());
    assert_eq!(local_state.username(), None);
    // The server keeps the ledger for a later rejoin.
    assert_eq!(remote.server_copy("priya").len(), 1);
}

#[tokio::test]
async fn restore_rejoins_the_persisted_identity() {
    let remote = Arc::new(MockRemote::new());
    remote.seed(
        "priya",
        vec![Holding {
            symbol: "AAPL".to_string(),
            quantity: dec!(3),
            average_cost: dec!(165),
            added_at: chrono::Utc::now(),
        }],
    );
    let local_state = Arc::new(MemoryStateStore::new());
    local_state.set_username(Some("priya"));
    let session = PortfolioSession::new(remote, local_state);

    assert!(session.restore().await);
    assert_eq!(session.state(), SessionState::Synced);
    assert_eq!(session.username(), Some("priya".to_string()));
    assert_eq!(session.holdings().len(), 1);
}

#[tokio::test]
async fn restore_without_persisted_identity_stays_unidentified() {
    let (session, _) = session_with(Arc::new(MockRemote::new()));
    assert!(!session.restore().await);
    assert_eq!(session.state(), SessionState::Unidentified);
}

// ─────────────────────────────────────────────────────────────────────────────
// Scheduler
// ─────────────────────────────────────────────────────────────────────────────

struct StubMarketData;

#[async_trait]
impl MarketDataProvider for StubMarketData {
    async fn get_quote(&self, _symbol: &str) -> Result<Quote, MarketDataError> {
        Ok(Quote::new(dec!(160), "INR"))
    }

    async fn get_profile(&self, symbol: &str) -> Result<AssetProfile, MarketDataError> {
        Err(MarketDataError::ProviderError {
            symbol: symbol.to_string(),
            message: "no profile".to_string(),
        })
    }
}

struct FixedFxProvider;

#[async_trait]
impl FxRateProvider for FixedFxProvider {
    async fn fetch_rate(&self, _from: &str, _to: &str) -> Result<Decimal, FxError> {
        Ok(dec!(84))
    }
}

#[tokio::test]
async fn scheduler_publishes_valuations_for_an_identified_session() {
    let remote = Arc::new(MockRemote::new());
    let (session, _) = session_with(remote);
    let session = Arc::new(session);
    session.claim_identity("priya").await.unwrap();
    session
        .add_holding(&lot("RELIANCE", dec!(10), dec!(150)))
        .await
        .unwrap();

    let valuation = Arc::new(ValuationService::new(
        Arc::new(StubMarketData),
        Arc::new(RateCache::new(Arc::new(FixedFxProvider))),
    ));
    let scheduler = RefreshScheduler::with_interval(
        Arc::clone(&session),
        valuation,
        Duration::from_millis(20),
    );

    let mut rx = scheduler.subscribe();
    assert!(rx.borrow().is_none());

    scheduler.start();
    assert!(scheduler.is_running());

    rx.changed().await.unwrap();
    let published = rx.borrow_and_update().clone().unwrap();
    assert_eq!(published.positions.len(), 1);
    assert_eq!(published.summary.live_positions, 1);
    assert_eq!(published.summary.total_value, dec!(1600));

    scheduler.stop();
    assert!(!scheduler.is_running());
}

#[tokio::test]
async fn scheduler_idles_while_unidentified() {
    let (session, _) = session_with(Arc::new(MockRemote::new()));
    let session = Arc::new(session);

    let valuation = Arc::new(ValuationService::new(
        Arc::new(StubMarketData),
        Arc::new(RateCache::new(Arc::new(FixedFxProvider))),
    ));
    let scheduler = RefreshScheduler::with_interval(
        Arc::clone(&session),
        valuation,
        Duration::from_millis(10),
    );

    let mut rx = scheduler.subscribe();
    scheduler.start();

    // Several periods pass without a publication.
    let waited =
        tokio::time::timeout(Duration::from_millis(60), rx.changed()).await;
    assert!(waited.is_err(), "unidentified session must not publish");

    scheduler.stop();
}
