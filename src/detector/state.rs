//! Per-market conviction tracking state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Mutable per-market state, exclusively owned by the orchestration layer.
///
/// "Last observed" and "baseline" are deliberately separate: the baseline
/// advances only when an event is emitted, so slow drift accumulates against
/// it instead of being reset by every small tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvictionState {
    last_yes_price: Decimal,
    observed_at: DateTime<Utc>,
    baseline_yes_price: Decimal,
    last_event_at: Option<DateTime<Utc>>,
}

impl ConvictionState {
    /// Initialize state from a first observation. The first price becomes
    /// both "last observed" and the comparison baseline.
    #[must_use]
    pub fn first_observation(yes_price: Decimal, observed_at: DateTime<Utc>) -> Self {
        Self {
            last_yes_price: yes_price,
            observed_at,
            baseline_yes_price: yes_price,
            last_event_at: None,
        }
    }

    /// Record a new observation without touching the baseline.
    pub fn observe(&mut self, yes_price: Decimal, observed_at: DateTime<Utc>) {
        self.last_yes_price = yes_price;
        self.observed_at = observed_at;
    }

    /// Advance the baseline after an event was emitted for this market.
    pub fn mark_emitted(&mut self, yes_price: Decimal, at: DateTime<Utc>) {
        self.baseline_yes_price = yes_price;
        self.last_event_at = Some(at);
    }

    /// The most recently observed YES price.
    #[must_use]
    pub fn last_yes_price(&self) -> Decimal {
        self.last_yes_price
    }

    /// When the last observation was taken.
    #[must_use]
    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }

    /// The YES price at the last emitted event (or first observation).
    #[must_use]
    pub fn baseline_yes_price(&self) -> Decimal {
        self.baseline_yes_price
    }

    /// When the last event was emitted, if any.
    #[must_use]
    pub fn last_event_at(&self) -> Option<DateTime<Utc>> {
        self.last_event_at
    }
}
