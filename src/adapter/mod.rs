//! Outbound adapters: concrete implementations of the outbound ports.

pub mod polymarket;
mod publisher;
mod subscriptions;

pub use polymarket::GammaFetcher;
pub use publisher::JsonlPublisher;
pub use subscriptions::FileSubscriptionStore;
