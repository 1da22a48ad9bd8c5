//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`fetcher`]: [`ScriptedFetcher`](fetcher::ScriptedFetcher), a
//!   per-market queue of scripted fetch results.
//! - [`publisher`]: [`RecordingPublisher`](publisher::RecordingPublisher),
//!   which records published events and counts flushes.
//! - [`subscriptions`]: [`StaticSubscriptions`](subscriptions::StaticSubscriptions)
//!   with failure injection.

pub mod fetcher;
pub mod publisher;
pub mod subscriptions;

use chrono::Utc;
use rust_decimal::Decimal;

use crate::domain::MarketSnapshot;

/// Build a plain active snapshot for the given market and YES price.
#[must_use]
pub fn snapshot(market_id: &str, yes_price: Decimal) -> MarketSnapshot {
    MarketSnapshot {
        market_id: market_id.into(),
        question: format!("Question for {market_id}?"),
        yes_price,
        no_price: Decimal::ONE - yes_price,
        volume: Some(Decimal::from(1000)),
        liquidity: Some(Decimal::from(500)),
        active: true,
        closed: false,
        fetched_at: Utc::now(),
    }
}
