//! The externally-published conviction event record.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::change::{ConvictionChange, Direction};
use super::id::MarketId;
use super::snapshot::MarketSnapshot;

/// A conviction-change event, serialized as a flat JSON record.
///
/// Never mutated after construction, with one exception: `published_at` is
/// stamped exactly once via [`ConvictionEvent::with_published_at`] immediately
/// before the publish call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvictionEvent {
    /// Unique event identifier.
    pub event_id: Uuid,

    /// Observation timestamp (when the snapshot was fetched).
    pub timestamp: DateTime<Utc>,

    pub market_id: MarketId,
    pub question: String,
    pub yes_price: Decimal,
    pub no_price: Decimal,

    /// Fixed producer label.
    pub source: String,

    /// When the event was handed to the publisher. `None` until then.
    pub published_at: Option<DateTime<Utc>>,

    pub conviction_direction: Direction,
    pub conviction_magnitude: Decimal,
    pub conviction_magnitude_pct: Option<Decimal>,
    pub previous_yes_price: Decimal,

    pub volume: Option<Decimal>,
    pub liquidity: Option<Decimal>,
}

impl ConvictionEvent {
    /// Build an event from a snapshot and the conviction change it triggered.
    #[must_use]
    pub fn from_detection(
        snapshot: &MarketSnapshot,
        change: &ConvictionChange,
        source: impl Into<String>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            timestamp: snapshot.fetched_at,
            market_id: snapshot.market_id.clone(),
            question: snapshot.question.clone(),
            yes_price: snapshot.yes_price,
            no_price: snapshot.no_price,
            source: source.into(),
            published_at: None,
            conviction_direction: change.direction,
            conviction_magnitude: change.magnitude,
            conviction_magnitude_pct: change.magnitude_pct,
            previous_yes_price: change.previous_yes_price,
            volume: snapshot.volume,
            liquidity: snapshot.liquidity,
        }
    }

    /// Stamp the publish timestamp. Called once, right before publishing.
    #[must_use]
    pub fn with_published_at(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = Some(at);
        self
    }

    /// Partition key for per-market ordered delivery.
    #[must_use]
    pub fn partition_key(&self) -> &str {
        self.market_id.as_str()
    }
}
