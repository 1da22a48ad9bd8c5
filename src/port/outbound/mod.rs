//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the three infrastructure dependencies of the
//! polling core: the subscription store, the market snapshot fetcher, and
//! the event publisher.

mod fetcher;
mod publisher;
mod subscriptions;

pub use fetcher::SnapshotFetcher;
pub use publisher::EventPublisher;
pub use subscriptions::SubscriptionStore;
