//! The periodic refresh loop: pull ledger, fetch quotes, aggregate,
//! publish.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::session::{PortfolioSession, SessionState};
use crate::constants::REFRESH_INTERVAL;
use crate::valuation::{PortfolioValuation, ValuationService};

/// Drives the refresh cycle on a fixed period and publishes each result on
/// a watch channel for presentation.
///
/// Cycles run strictly one at a time: the loop awaits the whole
/// pull-fetch-aggregate chain before the next tick, and a tick that falls
/// due mid-cycle is delayed, not stacked. While the session is
/// unidentified the loop idles without touching the network.
pub struct RefreshScheduler {
    session: Arc<PortfolioSession>,
    valuation: Arc<ValuationService>,
    interval: Duration,
    tx: watch::Sender<Option<PortfolioValuation>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl RefreshScheduler {
    pub fn new(session: Arc<PortfolioSession>, valuation: Arc<ValuationService>) -> Self {
        Self::with_interval(session, valuation, REFRESH_INTERVAL)
    }

    pub fn with_interval(
        session: Arc<PortfolioSession>,
        valuation: Arc<ValuationService>,
        interval: Duration,
    ) -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            session,
            valuation,
            interval,
            tx,
            handle: Mutex::new(None),
        }
    }

    /// Receiver for published valuations. Starts at `None` until the first
    /// cycle of an identified session completes.
    pub fn subscribe(&self) -> watch::Receiver<Option<PortfolioValuation>> {
        self.tx.subscribe()
    }

    /// Spawn the loop. The first cycle runs immediately; subsequent ones
    /// every interval. Idempotent while running.
    pub fn start(&self) {
        let mut handle = self
            .handle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if handle.is_some() {
            return;
        }

        let session = Arc::clone(&self.session);
        let valuation = Arc::clone(&self.valuation);
        let tx = self.tx.clone();
        let period = self.interval;

        *handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if session.state() == SessionState::Unidentified {
                    continue;
                }
                session.refresh_ledger().await;
                // Render from the cache as pulled at cycle start; user
                // mutations landing mid-cycle show up next cycle.
                let holdings = session.holdings();
                let result = valuation.value_portfolio(&holdings).await;
                tx.send_replace(Some(result));
            }
        }));
    }

    /// Cancel the loop. In-flight requests are dropped with the task; the
    /// last published valuation stays on the channel.
    pub fn stop(&self) {
        let mut handle = self
            .handle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(task) = handle.take() {
            task.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_some()
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
