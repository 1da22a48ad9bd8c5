//! Subscription store port.

use async_trait::async_trait;

use crate::domain::Subscription;
use crate::error::Result;

/// Read access to the external subscription store.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the runner holds them behind an
/// `Arc<dyn SubscriptionStore>`.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// List every stored subscription. The runner filters on
    /// [`Subscription::is_active`]; stores may pre-filter if cheaper.
    ///
    /// A failure here aborts the current poll cycle (not the process); the
    /// call is retried on the next cycle.
    async fn list_active(&self) -> Result<Vec<Subscription>>;
}
