//! Polling controller
//!
//! Refresh state machine over the market data provider plus the timer that
//! drives silent refreshes. The two provider requests of one cycle run
//! concurrently and are joined before any state is touched; a refresh is
//! atomic - if either leg fails, neither rates nor offers change.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::application::notifications::{NotificationCenter, NotificationKind};
use crate::domain::market::{MarketOffer, RatePair};
use crate::infrastructure::provider::MarketDataProvider;
use crate::infrastructure::storage::{KvStore, KEY_REFRESH_INTERVAL};
use crate::shared::types::{RefreshInterval, Selectors};

/// Who asked for the refresh. Silent refreshes never notify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshKind {
    Manual,
    Silent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Refreshing(RefreshKind),
}

/// What one refresh request amounted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Rates, offers, and the last-updated stamp were replaced
    Updated,
    /// Another refresh was in flight; this request was dropped
    Skipped,
    /// The provider failed; previous data left untouched
    Failed,
}

pub struct PollingController {
    provider: Arc<dyn MarketDataProvider>,
    selectors: Selectors,
    interval: RefreshInterval,
    state: RefreshState,
    rates: Option<RatePair>,
    offers: Vec<MarketOffer>,
    last_updated: Option<DateTime<Utc>>,
    tick_tx: mpsc::Sender<()>,
    tick_rx: Option<mpsc::Receiver<()>>,
    timer: Option<JoinHandle<()>>,
}

impl PollingController {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        selectors: Selectors,
        interval: RefreshInterval,
    ) -> Self {
        // capacity 1: ticks that pile up behind a slow cycle coalesce
        let (tick_tx, tick_rx) = mpsc::channel(1);
        Self {
            provider,
            selectors,
            interval,
            state: RefreshState::Idle,
            rates: None,
            offers: Vec::new(),
            last_updated: None,
            tick_tx,
            tick_rx: Some(tick_rx),
            timer: None,
        }
    }

    pub fn selectors(&self) -> Selectors {
        self.selectors
    }

    pub fn interval(&self) -> RefreshInterval {
        self.interval
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    pub fn rates(&self) -> Option<RatePair> {
        self.rates
    }

    pub fn offers(&self) -> &[MarketOffer] {
        &self.offers
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// Tick stream for the event loop; each tick asks for one silent
    /// refresh.
    pub fn take_ticks(&mut self) -> Option<mpsc::Receiver<()>> {
        self.tick_rx.take()
    }

    /// Run one refresh cycle: both provider requests in parallel, joined,
    /// applied atomically.
    pub async fn refresh(
        &mut self,
        kind: RefreshKind,
        notifications: &mut NotificationCenter,
    ) -> RefreshOutcome {
        if !self.begin(kind) {
            return RefreshOutcome::Skipped;
        }

        let provider = Arc::clone(&self.provider);
        let selectors = self.selectors;
        let fetched = tokio::try_join!(
            provider.get_rates(&selectors),
            provider.get_offers(&selectors),
        );
        self.state = RefreshState::Idle;

        match fetched {
            Ok((rates, offers)) => {
                self.rates = Some(rates);
                self.offers = offers;
                self.last_updated = Some(Utc::now());
                debug!(
                    "Market data updated for {}: buy={} sell={}, {} offers",
                    selectors.pair(),
                    rates.buy,
                    rates.sell,
                    self.offers.len()
                );
                if kind == RefreshKind::Manual {
                    notifications.push(
                        NotificationKind::Success,
                        format!(
                            "{}: {} updated",
                            selectors.exchange.as_str(),
                            selectors.pair()
                        ),
                    );
                }
                RefreshOutcome::Updated
            }
            Err(e) => {
                warn!("Refresh failed for {}, keeping previous data: {}", selectors.pair(), e);
                RefreshOutcome::Failed
            }
        }
    }

    /// Replace the market scope. Any change invalidates current data and
    /// triggers an immediate silent refresh.
    pub async fn change_selectors(
        &mut self,
        selectors: Selectors,
        notifications: &mut NotificationCenter,
    ) -> RefreshOutcome {
        if selectors == self.selectors {
            return RefreshOutcome::Skipped;
        }
        self.selectors = selectors;
        self.rates = None;
        self.offers.clear();
        self.last_updated = None;
        self.refresh(RefreshKind::Silent, notifications).await
    }

    /// Persist and apply a new cadence. The previous timer is always torn
    /// down before the new one is armed.
    pub fn set_interval(&mut self, kv: &mut KvStore, interval: RefreshInterval) {
        self.interval = interval;
        kv.set(KEY_REFRESH_INTERVAL, &interval.as_millis());
        info!("Refresh interval set to {}", interval.label());
        self.reschedule();
    }

    /// (Re)arm the timer for the current interval. Disabled cancels
    /// outright and never fires.
    pub fn reschedule(&mut self) {
        self.cancel_timer();
        let Some(period) = self.interval.as_duration() else {
            debug!("Automatic refresh disabled");
            return;
        };

        let tx = self.tick_tx.clone();
        self.timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // the interval's immediate first tick is not a refresh
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx.try_send(()).is_err() && tx.is_closed() {
                    break;
                }
            }
        }));
    }

    pub fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    fn begin(&mut self, kind: RefreshKind) -> bool {
        if let RefreshState::Refreshing(active) = self.state {
            match kind {
                RefreshKind::Manual => {
                    debug!("Manual refresh rejected: {:?} refresh in flight", active)
                }
                RefreshKind::Silent => {
                    debug!("Silent refresh skipped: {:?} refresh in flight", active)
                }
            }
            return false;
        }
        self.state = RefreshState::Refreshing(kind);
        true
    }
}

impl Drop for PollingController {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::{MarketInsight, OfferEfficiency};
    use crate::shared::errors::ProviderError;
    use async_trait::async_trait;
    use std::time::Duration;

    struct StaticProvider {
        fail_offers: bool,
    }

    impl StaticProvider {
        fn new(fail_offers: bool) -> Self {
            Self { fail_offers }
        }
    }

    #[async_trait]
    impl MarketDataProvider for StaticProvider {
        async fn get_rates(&self, _selectors: &Selectors) -> Result<RatePair, ProviderError> {
            Ok(RatePair::new(86.60, 87.15))
        }

        async fn get_offers(
            &self,
            _selectors: &Selectors,
        ) -> Result<Vec<MarketOffer>, ProviderError> {
            if self.fail_offers {
                return Err(ProviderError::Status(503));
            }
            Ok(vec![MarketOffer {
                label: "MBank".to_string(),
                buy_rate: 86.5,
                sell_rate: 87.3,
                spread_percent: 0.92,
                efficiency: OfferEfficiency::Excellent,
            }])
        }

        async fn get_insight(
            &self,
            _buy_rate: f64,
            _sell_rate: f64,
            _selectors: &Selectors,
        ) -> Result<MarketInsight, ProviderError> {
            Err(ProviderError::Status(503))
        }
    }

    fn controller(fail_offers: bool, interval: RefreshInterval) -> PollingController {
        PollingController::new(
            Arc::new(StaticProvider::new(fail_offers)),
            Selectors::default(),
            interval,
        )
    }

    #[test]
    fn test_state_machine_rejects_concurrent_requests() {
        let mut poller = controller(false, RefreshInterval::Disabled);

        assert!(poller.begin(RefreshKind::Manual));
        assert_eq!(poller.state(), RefreshState::Refreshing(RefreshKind::Manual));

        // at most one fetch in flight, whatever the kind
        assert!(!poller.begin(RefreshKind::Manual));
        assert!(!poller.begin(RefreshKind::Silent));

        poller.state = RefreshState::Idle;
        assert!(poller.begin(RefreshKind::Silent));
        assert!(!poller.begin(RefreshKind::Manual));
    }

    #[tokio::test]
    async fn test_manual_refresh_updates_and_notifies() {
        let mut poller = controller(false, RefreshInterval::Disabled);
        let mut notifications = NotificationCenter::new();

        let outcome = poller.refresh(RefreshKind::Manual, &mut notifications).await;

        assert_eq!(outcome, RefreshOutcome::Updated);
        assert_eq!(poller.rates(), Some(RatePair::new(86.60, 87.15)));
        assert_eq!(poller.offers().len(), 1);
        assert!(poller.last_updated().is_some());
        assert_eq!(poller.state(), RefreshState::Idle);
        assert_eq!(
            notifications.current().unwrap().message,
            "Binance: USDT/KGS updated"
        );
    }

    #[tokio::test]
    async fn test_silent_refresh_never_notifies() {
        let mut poller = controller(false, RefreshInterval::Disabled);
        let mut notifications = NotificationCenter::new();

        let outcome = poller.refresh(RefreshKind::Silent, &mut notifications).await;

        assert_eq!(outcome, RefreshOutcome::Updated);
        assert!(notifications.current().is_none());
    }

    #[tokio::test]
    async fn test_refresh_is_atomic_on_partial_failure() {
        let mut poller = controller(true, RefreshInterval::Disabled);
        let mut notifications = NotificationCenter::new();

        let outcome = poller.refresh(RefreshKind::Manual, &mut notifications).await;

        // offers failed, so the successful rates leg is discarded too
        assert_eq!(outcome, RefreshOutcome::Failed);
        assert_eq!(poller.rates(), None);
        assert!(poller.offers().is_empty());
        assert!(poller.last_updated().is_none());
        assert_eq!(poller.state(), RefreshState::Idle);
        assert!(notifications.current().is_none());
    }

    #[tokio::test]
    async fn test_selector_change_triggers_silent_refresh() {
        let mut poller = controller(false, RefreshInterval::Disabled);
        let mut notifications = NotificationCenter::new();

        let mut selectors = Selectors::default();
        selectors.fiat = crate::shared::types::Fiat::Rub;
        let outcome = poller.change_selectors(selectors, &mut notifications).await;

        assert_eq!(outcome, RefreshOutcome::Updated);
        assert_eq!(poller.selectors(), selectors);
        assert!(notifications.current().is_none());

        // unchanged selectors do nothing
        let outcome = poller.change_selectors(selectors, &mut notifications).await;
        assert_eq!(outcome, RefreshOutcome::Skipped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_interval_never_ticks() {
        let mut poller = controller(false, RefreshInterval::Disabled);
        let mut ticks = poller.take_ticks().unwrap();
        poller.reschedule();

        let waited =
            tokio::time::timeout(Duration::from_secs(24 * 3600), ticks.recv()).await;
        assert!(waited.is_err(), "no tick may ever fire when disabled");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_ticks_at_the_configured_interval() {
        let mut poller = controller(false, RefreshInterval::Secs30);
        let mut ticks = poller.take_ticks().unwrap();
        poller.reschedule();

        let first = tokio::time::timeout(Duration::from_secs(31), ticks.recv()).await;
        assert!(first.is_ok(), "expected a tick within one period");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_timer_stops_ticking() {
        let mut poller = controller(false, RefreshInterval::Secs30);
        let mut ticks = poller.take_ticks().unwrap();
        poller.reschedule();

        tokio::time::timeout(Duration::from_secs(31), ticks.recv())
            .await
            .expect("first tick");

        poller.cancel_timer();
        // drain the tick that may already be buffered
        while ticks.try_recv().is_ok() {}

        let after_cancel = tokio::time::timeout(Duration::from_secs(3600), ticks.recv()).await;
        assert!(after_cancel.is_err(), "no lingering tick after teardown");
    }
}
