//! Subscription records from the external subscription store.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::MarketId;

/// A monitored market, reference-counted by downstream consumers.
///
/// The `ref_count` field implements activation counting: the market is
/// monitored only while the count is positive. Multiple consumers can hold
/// a reference to the same feed; the store increments/decrements atomically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub market_id: MarketId,

    /// Market slug for Gamma API lookups when the condition id misses.
    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub ref_count: i64,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    /// Per-subscription absolute threshold override (price points, 0..=1).
    #[serde(default)]
    pub conviction_threshold: Option<Decimal>,

    /// Per-subscription relative threshold override (fraction of baseline).
    #[serde(default)]
    pub conviction_threshold_pct: Option<Decimal>,
}

impl Subscription {
    /// Create a subscription with a single active reference and no overrides.
    pub fn new(market_id: impl Into<MarketId>) -> Self {
        Self {
            market_id: market_id.into(),
            slug: None,
            ref_count: 1,
            created_at: None,
            updated_at: None,
            conviction_threshold: None,
            conviction_threshold_pct: None,
        }
    }

    /// Whether this subscription is active (`ref_count > 0`).
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.ref_count > 0
    }
}
