//! The identity session - owner of the ledger cache and its lifecycle.
//!
//! One `PortfolioSession` exists per identity session. It owns the local
//! ledger replica, applies mutations optimistically, pushes them to the
//! remote store, and tracks push outcomes instead of swallowing them.
//! Consistency remains last-write-wins: a failed push is overwritten by
//! the next wholesale pull.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::warn;
use serde::Serialize;

use super::remote_client::RemoteLedgerClient;
use crate::errors::{Error, RemoteError, Result};
use crate::holdings::{apply_lot, Holding, HoldingLot, LedgerStore, UpdateMode};
use crate::identity::{LocalStateStore, Username};
use folio_market_data::resolver;

/// Where a session stands relative to the server copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// No identity claimed; mutations are rejected.
    #[default]
    Unidentified,
    /// Identity claimed, first pull in progress.
    Syncing,
    /// Cache mirrors the last successful pull.
    Synced,
    /// Last pull failed; serving the previous cache.
    Stale,
}

#[derive(Default)]
struct SessionInner {
    state: SessionState,
    username: Option<Username>,
    ledger: LedgerStore,
    /// Mutations whose push never got a 2xx. Cleared by the next
    /// successful pull (the server copy wins from then on anyway).
    pending_pushes: u32,
    last_push_error: Option<String>,
}

/// Session-scoped owner of the ledger cache.
///
/// All methods take `&self`; the short lock never spans an await point, so
/// a slow network call cannot block readers.
pub struct PortfolioSession {
    remote: Arc<dyn RemoteLedgerClient>,
    local_state: Arc<dyn LocalStateStore>,
    inner: RwLock<SessionInner>,
}

impl PortfolioSession {
    pub fn new(remote: Arc<dyn RemoteLedgerClient>, local_state: Arc<dyn LocalStateStore>) -> Self {
        Self {
            remote,
            local_state,
            inner: RwLock::new(SessionInner::default()),
        }
    }

    fn read_inner(&self) -> RwLockReadGuard<'_, SessionInner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_inner(&self) -> RwLockWriteGuard<'_, SessionInner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.read_inner().state
    }

    pub fn username(&self) -> Option<String> {
        self.read_inner().username.as_ref().map(|u| u.as_str().to_string())
    }

    /// Snapshot of the cached ledger, in order.
    pub fn holdings(&self) -> Vec<Holding> {
        self.read_inner().ledger.snapshot()
    }

    /// Number of mutations whose push has not been confirmed.
    pub fn pending_pushes(&self) -> u32 {
        self.read_inner().pending_pushes
    }

    /// Message of the most recent failed push, for a sync-warning badge.
    pub fn last_push_error(&self) -> Option<String> {
        self.read_inner().last_push_error.clone()
    }

    // ── Identity lifecycle ──────────────────────────────────────────────────

    /// Claim a username (or rejoin one) and pull its ledger.
    ///
    /// Validation and server rejection abort with no local state changed.
    /// A pull failure after a successful claim degrades to an empty
    /// `Stale` cache rather than failing the claim.
    pub async fn claim_identity(&self, raw_username: &str) -> Result<String> {
        let username = Username::parse(raw_username)?;

        // Remember where the session stood so a failed claim can put it
        // back - "no local state changed" includes the state machine.
        let previous_state = {
            let mut inner = self.write_inner();
            let previous = inner.state;
            inner.state = SessionState::Syncing;
            previous
        };

        let confirmed = match self.remote.identify(username.as_str()).await {
            Ok(confirmed) => confirmed,
            Err(RemoteError::Rejected(message)) => {
                self.write_inner().state = previous_state;
                return Err(Error::RemoteRejection(message));
            }
            Err(e) => {
                self.write_inner().state = previous_state;
                return Err(e.into());
            }
        };

        {
            let mut inner = self.write_inner();
            inner.username = Some(username);
            inner.pending_pushes = 0;
            inner.last_push_error = None;
        }
        self.local_state.set_username(Some(&confirmed));

        self.refresh_ledger().await;
        Ok(confirmed)
    }

    /// Rejoin the identity persisted in local state, if any. Returns
    /// whether the session ended up identified.
    pub async fn restore(&self) -> bool {
        let Some(stored) = self.local_state.username() else {
            return false;
        };
        let Ok(username) = Username::parse(&stored) else {
            warn!("Discarding malformed persisted username {:?}", stored);
            self.local_state.set_username(None);
            return false;
        };

        {
            let mut inner = self.write_inner();
            inner.state = SessionState::Syncing;
            inner.username = Some(username.clone());
        }

        // Rejoin is lenient: the name is already ours, so an unreachable
        // server leaves us identified with a stale (empty) cache.
        if let Err(e) = self.remote.identify(username.as_str()).await {
            warn!("Identity rejoin for {} degraded: {}", username, e);
            self.write_inner().state = SessionState::Stale;
            return true;
        }

        self.refresh_ledger().await;
        true
    }

    /// Tear down the identity: clear the cache and the persisted username.
    /// The ledger itself stays on the server for the next claim.
    pub fn switch_user(&self) {
        {
            let mut inner = self.write_inner();
            inner.state = SessionState::Unidentified;
            inner.username = None;
            inner.ledger.clear();
            inner.pending_pushes = 0;
            inner.last_push_error = None;
        }
        self.local_state.set_username(None);
    }

    // ── Mutations ───────────────────────────────────────────────────────────

    /// Add a lot, merging into an existing position for the same symbol.
    pub async fn add_holding(&self, lot: &HoldingLot) -> Result<Holding> {
        self.mutate(lot, UpdateMode::Add).await
    }

    /// Replace an existing position's quantity and average cost.
    pub async fn edit_holding(&self, lot: &HoldingLot) -> Result<Holding> {
        self.mutate(lot, UpdateMode::Edit).await
    }

    async fn mutate(&self, lot: &HoldingLot, mode: UpdateMode) -> Result<Holding> {
        let username = self.require_username()?;

        let updated = {
            let mut inner = self.write_inner();
            apply_lot(&mut inner.ledger, lot, mode)?
        };

        if let Err(e) = self.remote.save(username.as_str(), &updated).await {
            self.record_push_failure("save", &updated.symbol, e);
        }
        Ok(updated)
    }

    /// Remove a holding. Returns the removed entry, or `None` when the
    /// symbol resolved to nothing in the ledger.
    pub async fn remove_holding(&self, raw_symbol: &str) -> Result<Option<Holding>> {
        let username = self.require_username()?;
        let symbol = resolver::resolve(raw_symbol.trim());

        let removed = { self.write_inner().ledger.remove(&symbol) };
        if removed.is_some() {
            if let Err(e) = self.remote.delete(username.as_str(), &symbol).await {
                self.record_push_failure("delete", &symbol, e);
            }
        }
        Ok(removed)
    }

    /// Bulk-upload the local cache, replacing the server copy. The
    /// recovery action behind a sync-warning indicator.
    pub async fn push_all(&self) -> Result<()> {
        let username = self.require_username()?;
        let holdings = self.holdings();

        self.remote.replace_all(username.as_str(), &holdings).await?;

        let mut inner = self.write_inner();
        inner.pending_pushes = 0;
        inner.last_push_error = None;
        inner.state = SessionState::Synced;
        Ok(())
    }

    // ── Refresh ─────────────────────────────────────────────────────────────

    /// Pull the server copy wholesale into the cache. Returns whether the
    /// session is identified at all; a pull failure keeps the previous
    /// cache and marks the session `Stale` instead of erroring.
    pub async fn refresh_ledger(&self) -> bool {
        let username = { self.read_inner().username.clone() };
        let Some(username) = username else {
            return false;
        };

        match self.remote.load(username.as_str()).await {
            Ok(holdings) => {
                let mut inner = self.write_inner();
                inner.ledger.replace_all(holdings);
                inner.state = SessionState::Synced;
                inner.pending_pushes = 0;
                inner.last_push_error = None;
            }
            Err(e) => {
                warn!(
                    "Ledger refresh for {} failed: {}. Serving cached copy.",
                    username, e
                );
                self.write_inner().state = SessionState::Stale;
            }
        }
        true
    }

    // ── Helpers ─────────────────────────────────────────────────────────────

    fn require_username(&self) -> Result<Username> {
        self.read_inner()
            .username
            .clone()
            .ok_or(Error::NotIdentified)
    }

    fn record_push_failure(&self, operation: &str, symbol: &str, error: RemoteError) {
        warn!(
            "Push ({}) for {} failed: {}. Cache keeps the local copy until the next pull.",
            operation, symbol, error
        );
        let mut inner = self.write_inner();
        inner.pending_pushes += 1;
        inner.last_push_error = Some(error.to_string());
    }
}
