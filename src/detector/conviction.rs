//! Conviction-change detection.
//!
//! Pure decision logic: given the stored per-market state and a fresh
//! snapshot, decide whether the move is worth reporting. No I/O, never
//! fails. State mutation is the caller's job.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::domain::{ConvictionChange, Direction, MarketSnapshot, Subscription};

use super::config::DetectorConfig;
use super::state::ConvictionState;

/// Conviction-change detector with configurable thresholds.
#[derive(Debug, Clone)]
pub struct Detector {
    config: DetectorConfig,
}

impl Detector {
    #[must_use]
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Evaluate a snapshot against the stored state for its market.
    ///
    /// Returns `None` (the common case) when:
    /// - there is no prior state (a single price carries no change signal);
    /// - the market is closed or inactive, so its price is not a belief signal;
    /// - the move against the baseline clears neither threshold;
    /// - the cool-down window is open and the move does not clear the
    ///   margin-scaled thresholds.
    ///
    /// Prices outside `[0, 1]` are clamped before comparison; the fetch layer
    /// is expected to have rejected them already.
    #[must_use]
    pub fn evaluate(
        &self,
        state: Option<&ConvictionState>,
        subscription: &Subscription,
        snapshot: &MarketSnapshot,
        now: DateTime<Utc>,
    ) -> Option<ConvictionChange> {
        let state = state?;

        if !snapshot.is_tradeable() {
            return None;
        }

        let current = clamp_probability(snapshot.yes_price);
        let baseline = clamp_probability(state.baseline_yes_price());

        let magnitude = (current - baseline).abs();
        let magnitude_pct = if baseline > Decimal::ZERO {
            Some(magnitude / baseline)
        } else {
            None
        };

        let (abs_threshold, pct_threshold) = self.thresholds_for(subscription);
        let margin = self.cooldown_margin(state, now);

        let abs_hit = magnitude >= abs_threshold * margin;
        let pct_hit = magnitude_pct.is_some_and(|pct| pct >= pct_threshold * margin);

        if !abs_hit && !pct_hit {
            return None;
        }

        let direction = if current > baseline {
            Direction::Yes
        } else {
            Direction::No
        };

        Some(ConvictionChange {
            direction,
            magnitude,
            magnitude_pct,
            previous_yes_price: baseline,
            new_yes_price: current,
        })
    }

    /// Resolve thresholds, preferring per-subscription overrides.
    fn thresholds_for(&self, subscription: &Subscription) -> (Decimal, Decimal) {
        let abs = subscription
            .conviction_threshold
            .unwrap_or(self.config.abs_threshold);
        let pct = subscription
            .conviction_threshold_pct
            .unwrap_or(self.config.pct_threshold);
        (abs, pct)
    }

    /// Threshold multiplier: the cool-down margin while the window since the
    /// last emitted event is still open, 1 otherwise.
    fn cooldown_margin(&self, state: &ConvictionState, now: DateTime<Utc>) -> Decimal {
        let Some(last_event_at) = state.last_event_at() else {
            return Decimal::ONE;
        };
        let window = Duration::seconds(self.config.cooldown_secs as i64);
        if now.signed_duration_since(last_event_at) < window {
            self.config.cooldown_margin
        } else {
            Decimal::ONE
        }
    }
}

fn clamp_probability(price: Decimal) -> Decimal {
    price.clamp(Decimal::ZERO, Decimal::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn snapshot(yes: Decimal) -> MarketSnapshot {
        MarketSnapshot {
            market_id: "0xabc".into(),
            question: "Will it happen?".into(),
            yes_price: yes,
            no_price: Decimal::ONE - yes,
            volume: Some(dec!(1000)),
            liquidity: Some(dec!(500)),
            active: true,
            closed: false,
            fetched_at: at(0),
        }
    }

    fn detector() -> Detector {
        Detector::new(DetectorConfig::default())
    }

    fn sub() -> Subscription {
        Subscription::new("0xabc")
    }

    #[test]
    fn no_prior_state_never_fires() {
        let d = detector();
        assert!(d
            .evaluate(None, &sub(), &snapshot(dec!(0.99)), at(0))
            .is_none());
    }

    #[test]
    fn small_move_is_ignored() {
        let d = detector();
        let state = ConvictionState::first_observation(dec!(0.50), at(0));
        assert!(d
            .evaluate(Some(&state), &sub(), &snapshot(dec!(0.51)), at(60))
            .is_none());
    }

    #[test]
    fn absolute_threshold_fires_with_direction_yes() {
        let d = detector();
        let state = ConvictionState::first_observation(dec!(0.50), at(0));
        let change = d
            .evaluate(Some(&state), &sub(), &snapshot(dec!(0.65)), at(60))
            .expect("should fire");
        assert_eq!(change.direction, Direction::Yes);
        assert_eq!(change.magnitude, dec!(0.15));
        assert_eq!(change.magnitude_pct, Some(dec!(0.30)));
        assert_eq!(change.previous_yes_price, dec!(0.50));
        assert_eq!(change.new_yes_price, dec!(0.65));
    }

    #[test]
    fn downward_move_fires_with_direction_no() {
        let d = detector();
        let state = ConvictionState::first_observation(dec!(0.50), at(0));
        let change = d
            .evaluate(Some(&state), &sub(), &snapshot(dec!(0.35)), at(60))
            .expect("should fire");
        assert_eq!(change.direction, Direction::No);
        assert_eq!(change.magnitude, dec!(0.15));
    }

    #[test]
    fn relative_threshold_fires_in_confident_markets() {
        // 0.05 -> 0.07 is a tiny absolute move but a 40% relative one.
        let d = detector();
        let state = ConvictionState::first_observation(dec!(0.05), at(0));
        let change = d
            .evaluate(Some(&state), &sub(), &snapshot(dec!(0.07)), at(60))
            .expect("should fire");
        assert_eq!(change.magnitude, dec!(0.02));
        assert_eq!(change.magnitude_pct, Some(dec!(0.4)));
    }

    #[test]
    fn zero_baseline_relies_on_absolute_threshold_only() {
        let d = detector();
        let state = ConvictionState::first_observation(Decimal::ZERO, at(0));

        // 0 -> 0.05: infinite relative move, but below the absolute threshold.
        assert!(d
            .evaluate(Some(&state), &sub(), &snapshot(dec!(0.05)), at(60))
            .is_none());

        let change = d
            .evaluate(Some(&state), &sub(), &snapshot(dec!(0.12)), at(60))
            .expect("absolute threshold should fire");
        assert_eq!(change.magnitude_pct, None);
    }

    #[test]
    fn closed_market_never_fires() {
        let d = detector();
        let state = ConvictionState::first_observation(dec!(0.50), at(0));
        let mut snap = snapshot(dec!(0.95));
        snap.closed = true;
        assert!(d.evaluate(Some(&state), &sub(), &snap, at(60)).is_none());

        let mut snap = snapshot(dec!(0.95));
        snap.active = false;
        assert!(d.evaluate(Some(&state), &sub(), &snap, at(60)).is_none());
    }

    #[test]
    fn baseline_advance_makes_repeat_snapshots_quiet() {
        let d = detector();
        let mut state = ConvictionState::first_observation(dec!(0.50), at(0));

        let change = d.evaluate(Some(&state), &sub(), &snapshot(dec!(0.65)), at(60));
        assert!(change.is_some());

        state.observe(dec!(0.65), at(60));
        state.mark_emitted(dec!(0.65), at(60));

        // Same price again: delta vs the advanced baseline is zero.
        assert!(d
            .evaluate(Some(&state), &sub(), &snapshot(dec!(0.65)), at(120))
            .is_none());
    }

    #[test]
    fn cooldown_suppresses_marginal_moves() {
        let d = detector();
        let mut state = ConvictionState::first_observation(dec!(0.50), at(0));
        state.mark_emitted(dec!(0.50), at(0));

        // 0.12 clears the plain threshold but not 0.10 * 1.5 = 0.15.
        assert!(d
            .evaluate(Some(&state), &sub(), &snapshot(dec!(0.62)), at(60))
            .is_none());

        // 0.16 breaks through the margin even inside the window.
        assert!(d
            .evaluate(Some(&state), &sub(), &snapshot(dec!(0.66)), at(60))
            .is_some());

        // After the window the plain threshold applies again.
        assert!(d
            .evaluate(Some(&state), &sub(), &snapshot(dec!(0.62)), at(600))
            .is_some());
    }

    #[test]
    fn subscription_overrides_take_precedence() {
        let d = detector();
        let state = ConvictionState::first_observation(dec!(0.50), at(0));
        let mut sub = sub();
        sub.conviction_threshold = Some(dec!(0.02));
        sub.conviction_threshold_pct = Some(dec!(0.03));

        let change = d
            .evaluate(Some(&state), &sub, &snapshot(dec!(0.53)), at(60))
            .expect("tightened threshold should fire");
        assert_eq!(change.magnitude, dec!(0.03));
    }

    #[test]
    fn out_of_range_price_is_clamped() {
        let d = detector();
        let state = ConvictionState::first_observation(dec!(0.50), at(0));
        let change = d
            .evaluate(Some(&state), &sub(), &snapshot(dec!(1.7)), at(60))
            .expect("clamped to 1.0, still a 0.50 move");
        assert_eq!(change.new_yes_price, Decimal::ONE);
        assert_eq!(change.magnitude, dec!(0.50));
    }
}
