//! Event publisher port.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::ConvictionEvent;
use crate::error::Result;

/// Durable, per-key-ordered delivery of conviction events.
///
/// Implementations must preserve ordering for events sharing a partition key
/// ([`ConvictionEvent::partition_key`], the market id). Cross-key ordering is
/// not required. Delivery is at-least-once: the caller re-detects and
/// re-publishes on failure, so duplicate suppression beyond the detection
/// baseline is a consumer concern.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish one event, keyed by its market id.
    async fn publish(&self, event: &ConvictionEvent) -> Result<()>;

    /// Flush buffered events, waiting at most `timeout`.
    async fn flush(&self, timeout: Duration) -> Result<()>;
}
