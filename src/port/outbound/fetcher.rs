//! Market snapshot fetcher port.

use async_trait::async_trait;

use crate::domain::{MarketSnapshot, Subscription};
use crate::error::Result;

/// Fetch one current snapshot for one market.
///
/// Implementations own their timeout, retry, and rate-limit policy; by the
/// time an error surfaces here the core treats it uniformly (skip the market
/// this cycle). Returned snapshots must already have passed range validation
/// on prices, volume, and liquidity.
#[async_trait]
pub trait SnapshotFetcher: Send + Sync {
    /// Fetch the current snapshot for the subscribed market.
    async fn fetch(&self, subscription: &Subscription) -> Result<MarketSnapshot>;
}
