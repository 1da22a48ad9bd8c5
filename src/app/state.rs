//! In-memory per-market detection state.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::detector::ConvictionState;
use crate::domain::{MarketId, MarketSnapshot};

/// Mapping from market id to its conviction state.
///
/// Exclusively owned and mutated by the runner; intentionally memory-only.
/// A process restart resets every market to "first observation", which costs
/// one quiet poll per market rather than cross-restart persistence machinery.
#[derive(Debug, Default)]
pub struct StateStore {
    states: HashMap<MarketId, ConvictionState>,
}

impl StateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, market_id: &MarketId) -> Option<&ConvictionState> {
        self.states.get(market_id)
    }

    /// Record an observation, creating first-observation state as needed.
    /// The baseline is untouched for existing entries.
    pub fn observe(&mut self, snapshot: &MarketSnapshot) {
        match self.states.get_mut(&snapshot.market_id) {
            Some(state) => state.observe(snapshot.yes_price, snapshot.fetched_at),
            None => {
                self.states.insert(
                    snapshot.market_id.clone(),
                    ConvictionState::first_observation(snapshot.yes_price, snapshot.fetched_at),
                );
            }
        }
    }

    /// Advance the baseline for a market after a successful publish.
    pub fn mark_emitted(&mut self, market_id: &MarketId, yes_price: Decimal, at: DateTime<Utc>) {
        if let Some(state) = self.states.get_mut(market_id) {
            state.mark_emitted(yes_price, at);
        }
    }

    /// Drop state for markets no longer in the active set.
    pub fn retain_active<'a>(&mut self, active: impl IntoIterator<Item = &'a MarketId>) {
        let keep: HashSet<&MarketId> = active.into_iter().collect();
        self.states.retain(|id, _| keep.contains(id));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn snapshot(id: &str, yes: Decimal) -> MarketSnapshot {
        MarketSnapshot {
            market_id: id.into(),
            question: String::new(),
            yes_price: yes,
            no_price: Decimal::ONE - yes,
            volume: None,
            liquidity: None,
            active: true,
            closed: false,
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn observe_creates_then_updates_without_moving_baseline() {
        let mut store = StateStore::new();
        store.observe(&snapshot("m1", dec!(0.50)));
        store.observe(&snapshot("m1", dec!(0.58)));

        let state = store.get(&"m1".into()).unwrap();
        assert_eq!(state.last_yes_price(), dec!(0.58));
        assert_eq!(state.baseline_yes_price(), dec!(0.50));
    }

    #[test]
    fn mark_emitted_advances_baseline() {
        let mut store = StateStore::new();
        store.observe(&snapshot("m1", dec!(0.50)));
        store.mark_emitted(&"m1".into(), dec!(0.65), Utc::now());

        let state = store.get(&"m1".into()).unwrap();
        assert_eq!(state.baseline_yes_price(), dec!(0.65));
        assert!(state.last_event_at().is_some());
    }

    #[test]
    fn retain_active_prunes_unsubscribed_markets() {
        let mut store = StateStore::new();
        store.observe(&snapshot("m1", dec!(0.50)));
        store.observe(&snapshot("m2", dec!(0.30)));

        let keep = MarketId::new("m1");
        store.retain_active([&keep]);

        assert_eq!(store.len(), 1);
        assert!(store.get(&"m2".into()).is_none());
    }
}
