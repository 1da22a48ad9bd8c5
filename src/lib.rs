//! Convictor - prediction market conviction-change event producer.
//!
//! This crate polls prediction-market prices for a set of subscribed
//! markets, decides when a price move represents a meaningful shift in
//! crowd belief, and publishes one structured event per shift: a sparse,
//! de-duplicated signal stream for algorithmic-trading consumers, instead
//! of raw tick data.
//!
//! # Architecture
//!
//! Hexagonal: a pure detection core behind port traits, driven by a single
//! polling loop.
//!
//! - [`detector`] - The conviction-change decision function. Pure, no I/O:
//!   dual absolute/relative thresholds measured against a baseline that
//!   advances only when an event is emitted, with a cool-down margin that
//!   damps oscillation around the threshold.
//! - [`app`] - Configuration and the [`Runner`](app::Runner) polling loop,
//!   which owns all per-market state, isolates per-market failures, and
//!   drains cleanly on shutdown.
//! - [`port`] - Trait contracts for the three collaborators: subscription
//!   store, snapshot fetcher, event publisher.
//! - [`adapter`] - Concrete collaborators: Polymarket Gamma API fetcher,
//!   JSON-file subscription store, JSON-lines event sink.
//! - [`domain`] - Immutable value types shared by all of the above.
//! - [`error`] - Error types for the crate.
//!
//! # Delivery contract
//!
//! At-least-once, ordered per market: the detection baseline advances only
//! after a successful publish, so a failed publish is re-detected and
//! re-emitted on the next cycle. Detection state is in-memory only; a
//! restart costs one quiet "first observation" poll per market.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use convictor::adapter::{FileSubscriptionStore, GammaFetcher, JsonlPublisher};
//! use convictor::app::{Config, Runner};
//! use convictor::detector::Detector;
//! use tokio::sync::watch;
//!
//! # async fn run() -> convictor::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! let mut runner = Runner::new(
//!     (&config).into(),
//!     Detector::new(config.detector.clone()),
//!     Arc::new(FileSubscriptionStore::new(&config.subscriptions.path)),
//!     Arc::new(GammaFetcher::new(&config.network, config.rate_limit_delay())?),
//!     Arc::new(JsonlPublisher::create(&config.publisher.path)?),
//! );
//!
//! let (_shutdown_tx, shutdown_rx) = watch::channel(false);
//! runner.run(shutdown_rx).await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod app;
pub mod detector;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
