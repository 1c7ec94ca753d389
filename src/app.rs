//! Process-wide application context
//!
//! All previously ambient state - theme, history, refresh interval - lives
//! in one explicit object constructed at startup and passed by reference.
//! Persisted values are read here once and written back on every mutation.

use std::sync::Arc;

use crate::application::calculator::CalculatorSession;
use crate::application::history::HistoryStore;
use crate::application::notifications::NotificationCenter;
use crate::application::poller::{PollingController, RefreshKind, RefreshOutcome};
use crate::config::Config;
use crate::infrastructure::provider::MarketDataProvider;
use crate::infrastructure::storage::{KvStore, KEY_REFRESH_INTERVAL, KEY_THEME};
use crate::shared::types::{RefreshInterval, Selectors, Theme};

pub struct AppContext {
    pub config: Config,
    pub kv: KvStore,
    pub theme: Theme,
    pub provider: Arc<dyn MarketDataProvider>,
    pub notifications: NotificationCenter,
    pub calculator: CalculatorSession,
    pub history: HistoryStore,
    pub poller: PollingController,
}

impl AppContext {
    pub fn new(
        config: Config,
        provider: Arc<dyn MarketDataProvider>,
        selectors: Selectors,
    ) -> Self {
        let kv = KvStore::open(&config.storage.path);
        let theme = kv.get(KEY_THEME).unwrap_or_default();
        let interval = kv
            .get::<u64>(KEY_REFRESH_INTERVAL)
            .and_then(RefreshInterval::from_millis)
            .unwrap_or_default();
        let history = HistoryStore::load(&kv);
        let calculator = CalculatorSession::new(config.defaults.inputs());
        let poller = PollingController::new(Arc::clone(&provider), selectors, interval);

        Self {
            config,
            kv,
            theme,
            provider,
            notifications: NotificationCenter::new(),
            calculator,
            history,
            poller,
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.kv.set(KEY_THEME, &theme);
    }

    /// Run one refresh cycle and, on success, feed the new rates into the
    /// live calculation.
    pub async fn refresh(&mut self, kind: RefreshKind) -> RefreshOutcome {
        let outcome = self.poller.refresh(kind, &mut self.notifications).await;
        if outcome == RefreshOutcome::Updated {
            self.sync_rates();
        }
        outcome
    }

    /// Change the market scope; any actual change refreshes silently.
    pub async fn change_selectors(&mut self, selectors: Selectors) -> RefreshOutcome {
        let outcome = self
            .poller
            .change_selectors(selectors, &mut self.notifications)
            .await;
        if outcome == RefreshOutcome::Updated {
            self.sync_rates();
        }
        outcome
    }

    fn sync_rates(&mut self) {
        if let Some(rates) = self.poller.rates() {
            self.calculator.apply_rates(&rates);
        }
    }
}
