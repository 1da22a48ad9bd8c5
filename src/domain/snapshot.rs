//! Point-in-time market observations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::id::MarketId;

/// One observation of a market at one instant, as returned by a fetcher.
///
/// The YES/NO prices are probability-like values in `[0, 1]`. Their sum is
/// not assumed to be exactly 1; market friction routinely leaves a gap.
/// Snapshots are produced fresh on every poll and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSnapshot {
    pub market_id: MarketId,
    pub question: String,
    pub yes_price: Decimal,
    pub no_price: Decimal,
    pub volume: Option<Decimal>,
    pub liquidity: Option<Decimal>,
    pub active: bool,
    pub closed: bool,
    pub fetched_at: DateTime<Utc>,
}

impl MarketSnapshot {
    /// Whether this market is currently tradeable.
    ///
    /// A resolved or paused market's price is no longer a belief signal.
    #[must_use]
    pub fn is_tradeable(&self) -> bool {
        self.active && !self.closed
    }
}
