//! One fully wired engine instance.
//!
//! Both presentation surfaces construct exactly this and nothing else -
//! the resolver, merge algorithm, rate cache, and aggregator live behind
//! it in one shared implementation instead of per-surface copies.

use std::sync::Arc;

use crate::fx::{HttpFxProvider, RateCache};
use crate::identity::LocalStateStore;
use crate::settings::EngineConfig;
use crate::sync::{HttpRemoteLedgerClient, PortfolioSession, RefreshScheduler};
use crate::valuation::ValuationService;
use folio_market_data::HttpMarketDataProvider;

/// The shared portfolio engine a presentation adapter owns.
pub struct Engine {
    pub session: Arc<PortfolioSession>,
    pub valuation: Arc<ValuationService>,
    pub scheduler: RefreshScheduler,
}

impl Engine {
    /// Wire the production collaborators from configuration. The adapter
    /// supplies the local state store (file-backed on desktop, platform
    /// storage on mobile).
    pub fn new(config: &EngineConfig, local_state: Arc<dyn LocalStateStore>) -> Self {
        let session = Arc::new(PortfolioSession::new(
            Arc::new(HttpRemoteLedgerClient::new(config.ledger_api_url.clone())),
            local_state,
        ));
        let valuation = Arc::new(ValuationService::new(
            Arc::new(HttpMarketDataProvider::new(config.market_data_url.clone())),
            Arc::new(RateCache::new(Arc::new(HttpFxProvider::new(
                config.fx_api_url.clone(),
            )))),
        ));
        let scheduler = RefreshScheduler::with_interval(
            Arc::clone(&session),
            Arc::clone(&valuation),
            config.refresh_interval(),
        );

        Self {
            session,
            valuation,
            scheduler,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::MemoryStateStore;
    use crate::sync::SessionState;

    #[tokio::test]
    async fn engine_wires_from_default_config() {
        let engine = Engine::new(
            &EngineConfig::default(),
            Arc::new(MemoryStateStore::new()),
        );
        assert_eq!(engine.session.state(), SessionState::Unidentified);
        assert!(!engine.scheduler.is_running());
        assert!(engine.scheduler.subscribe().borrow().is_none());
    }
}
