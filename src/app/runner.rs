//! The polling orchestration loop.
//!
//! Drives the fetch → detect → publish cycle for every active subscription,
//! owns all mutable per-market state, and isolates per-market failures so
//! one bad upstream market never stops monitoring of the rest.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::app::config::Config;
use crate::app::state::StateStore;
use crate::detector::Detector;
use crate::domain::{ConvictionEvent, Subscription};
use crate::error::Result;
use crate::port::outbound::{EventPublisher, SnapshotFetcher, SubscriptionStore};

/// Loop lifecycle phase.
///
/// `Running → Draining` on shutdown request; `Draining → Stopped` once the
/// in-flight cycle completes or the drain timeout elapses, whichever first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    Stopped,
    Running,
    Draining,
}

/// Timing knobs for the runner, decoupled from file-path configuration so
/// tests can construct runners without touching the filesystem.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub poll_interval: Duration,
    pub rate_limit_delay: Duration,
    pub drain_timeout: Duration,
    pub flush_timeout: Duration,
    pub source: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            rate_limit_delay: Duration::from_millis(200),
            drain_timeout: Duration::from_secs(10),
            flush_timeout: Duration::from_secs(5),
            source: "convictor".into(),
        }
    }
}

impl From<&Config> for RunnerConfig {
    fn from(config: &Config) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            rate_limit_delay: config.rate_limit_delay(),
            drain_timeout: config.drain_timeout(),
            flush_timeout: config.flush_timeout(),
            source: config.source.clone(),
        }
    }
}

/// Main polling loop orchestrator.
pub struct Runner {
    config: RunnerConfig,
    detector: Detector,
    subscriptions: Arc<dyn SubscriptionStore>,
    fetcher: Arc<dyn SnapshotFetcher>,
    publisher: Arc<dyn EventPublisher>,
    states: StateStore,
    phase: LoopPhase,
}

impl Runner {
    pub fn new(
        config: RunnerConfig,
        detector: Detector,
        subscriptions: Arc<dyn SubscriptionStore>,
        fetcher: Arc<dyn SnapshotFetcher>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            config,
            detector,
            subscriptions,
            fetcher,
            publisher,
            states: StateStore::new(),
            phase: LoopPhase::Stopped,
        }
    }

    #[must_use]
    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    #[must_use]
    pub fn states(&self) -> &StateStore {
        &self.states
    }

    /// Run the polling loop until `shutdown` flips to `true` (or its sender
    /// is dropped). The publisher is flushed exactly once on the way out.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        self.phase = LoopPhase::Running;
        info!(
            poll_interval_secs = self.config.poll_interval.as_secs(),
            "runner started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            let cycle_rx = shutdown.clone();
            let mut drain_rx = shutdown.clone();
            let drain_timeout = self.config.drain_timeout;

            tokio::select! {
                _ = self.run_cycle(&cycle_rx) => {}
                _ = async move {
                    let _ = drain_rx.wait_for(|stop| *stop).await;
                    tokio::time::sleep(drain_timeout).await;
                } => {
                    warn!("drain timeout elapsed with a cycle still in flight");
                    break;
                }
            }

            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.poll_interval) => {}
                _ = shutdown.wait_for(|stop| *stop) => break,
            }
        }

        self.phase = LoopPhase::Draining;
        info!("draining: flushing publisher");
        if let Err(e) = self.publisher.flush(self.config.flush_timeout).await {
            error!(error = %e, "publisher flush failed during shutdown");
        }

        self.phase = LoopPhase::Stopped;
        info!("runner stopped");
        Ok(())
    }

    /// Execute one poll cycle. Returns the number of events published.
    ///
    /// A subscription-store failure skips the whole cycle (retried on the
    /// next interval); any per-market failure is logged and skipped.
    pub async fn run_cycle(&mut self, shutdown: &watch::Receiver<bool>) -> usize {
        let subscriptions = match self.subscriptions.list_active().await {
            Ok(subs) => subs,
            Err(e) => {
                error!(error = %e, "failed to list active subscriptions; skipping cycle");
                return 0;
            }
        };

        let active: Vec<Subscription> = subscriptions
            .into_iter()
            .filter(Subscription::is_active)
            .collect();

        self.states.retain_active(active.iter().map(|s| &s.market_id));

        if active.is_empty() {
            debug!("no active subscriptions this cycle");
            return 0;
        }

        debug!(subscriptions = active.len(), "processing poll cycle");

        let mut emitted = 0;
        for (i, sub) in active.iter().enumerate() {
            if *shutdown.borrow() {
                info!("shutdown requested; interrupting cycle");
                break;
            }

            match self.process_market(sub).await {
                Ok(true) => emitted += 1,
                Ok(false) => {}
                Err(e) => {
                    error!(
                        market_id = %sub.market_id,
                        error = %e,
                        "market processing failed; continuing with next market"
                    );
                }
            }

            if i + 1 < active.len() {
                tokio::time::sleep(self.config.rate_limit_delay).await;
            }
        }

        emitted
    }

    /// Fetch, detect, and publish for one market. Returns whether an event
    /// was published.
    ///
    /// State is only advanced after a successful publish, so a failed
    /// publish leaves the baseline intact and the change is re-detected and
    /// re-emitted on the next cycle (at-least-once delivery).
    async fn process_market(&mut self, sub: &Subscription) -> Result<bool> {
        let snapshot = self.fetcher.fetch(sub).await?;
        let now = Utc::now();

        let state = self.states.get(&sub.market_id);
        let change = self.detector.evaluate(state, sub, &snapshot, now);

        let Some(change) = change else {
            match state {
                Some(prev) => debug!(
                    market_id = %sub.market_id,
                    yes_price = %snapshot.yes_price,
                    prev_price = %prev.last_yes_price(),
                    baseline = %prev.baseline_yes_price(),
                    "no conviction change"
                ),
                None => debug!(
                    market_id = %sub.market_id,
                    yes_price = %snapshot.yes_price,
                    "baseline established"
                ),
            }
            self.states.observe(&snapshot);
            return Ok(false);
        };

        let event = ConvictionEvent::from_detection(&snapshot, &change, &self.config.source)
            .with_published_at(Utc::now());

        info!(
            market_id = %sub.market_id,
            event_id = %event.event_id,
            direction = %change.direction,
            magnitude = %change.magnitude,
            "publishing conviction event"
        );

        self.publisher.publish(&event).await?;

        self.states.observe(&snapshot);
        self.states.mark_emitted(&sub.market_id, snapshot.yes_price, now);

        Ok(true)
    }
}
