//! Scripted snapshot fetcher.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::domain::{MarketId, MarketSnapshot, Subscription};
use crate::error::{Error, FetchError, Result};
use crate::port::outbound::SnapshotFetcher;

use super::snapshot;

/// A fetcher that pops pre-loaded results per market.
///
/// Each `fetch` for a market consumes the next scripted result; an exhausted
/// queue yields a not-found error. An optional per-call delay makes
/// shutdown-timing tests deterministic.
#[derive(Default)]
pub struct ScriptedFetcher {
    scripts: Mutex<HashMap<MarketId, VecDeque<Result<MarketSnapshot>>>>,
    calls: Mutex<Vec<MarketId>>,
    delay: Mutex<Duration>,
}

impl ScriptedFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an arbitrary fetch result for a market.
    pub fn push(&self, market_id: impl Into<MarketId>, result: Result<MarketSnapshot>) {
        self.scripts
            .lock()
            .entry(market_id.into())
            .or_default()
            .push_back(result);
    }

    /// Queue a successful snapshot at the given YES price.
    pub fn push_price(&self, market_id: &str, yes_price: Decimal) {
        self.push(market_id, Ok(snapshot(market_id, yes_price)));
    }

    /// Queue a fetch failure.
    pub fn push_failure(&self, market_id: &str) {
        self.push(
            market_id,
            Err(Error::Fetch(FetchError::Status {
                status: 503,
                body: "injected failure".into(),
            })),
        );
    }

    /// Delay every subsequent fetch by `delay`.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = delay;
    }

    /// Market ids fetched so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<MarketId> {
        self.calls.lock().clone()
    }

    /// Number of fetches issued for one market.
    #[must_use]
    pub fn calls_for(&self, market_id: &str) -> usize {
        let id = MarketId::new(market_id);
        self.calls.lock().iter().filter(|c| **c == id).count()
    }
}

#[async_trait]
impl SnapshotFetcher for ScriptedFetcher {
    async fn fetch(&self, subscription: &Subscription) -> Result<MarketSnapshot> {
        self.calls.lock().push(subscription.market_id.clone());

        let delay = *self.delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let next = self
            .scripts
            .lock()
            .get_mut(&subscription.market_id)
            .and_then(VecDeque::pop_front);

        next.unwrap_or_else(|| {
            Err(Error::Fetch(FetchError::NotFound {
                market_id: subscription.market_id.to_string(),
            }))
        })
    }
}
