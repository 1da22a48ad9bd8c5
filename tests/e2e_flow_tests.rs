//! End-to-end flow: subscribe, poll, detect, publish.

use std::sync::Arc;

use convictor::app::{Runner, RunnerConfig};
use convictor::detector::{Detector, DetectorConfig};
use convictor::domain::{Direction, Subscription};
use convictor::testkit::fetcher::ScriptedFetcher;
use convictor::testkit::publisher::RecordingPublisher;
use convictor::testkit::subscriptions::StaticSubscriptions;
use rust_decimal_macros::dec;
use tokio::sync::watch;

#[tokio::test]
async fn quiet_polls_then_one_event_with_the_original_baseline() {
    let subscriptions = Arc::new(StaticSubscriptions::new(vec![Subscription::new("M1")]));
    let fetcher = Arc::new(ScriptedFetcher::new());
    let publisher = Arc::new(RecordingPublisher::new());

    let config = RunnerConfig {
        rate_limit_delay: std::time::Duration::ZERO,
        source: "convictor".into(),
        ..Default::default()
    };
    let mut runner = Runner::new(
        config,
        Detector::new(DetectorConfig::default()),
        subscriptions,
        fetcher.clone(),
        publisher.clone(),
    );
    let (_tx, rx) = watch::channel(false);

    // Poll 1: 0.50, baseline established, nothing emitted.
    fetcher.push_price("M1", dec!(0.50));
    assert_eq!(runner.run_cycle(&rx).await, 0);

    // Poll 2: 0.51 is a tick, not a signal.
    fetcher.push_price("M1", dec!(0.51));
    assert_eq!(runner.run_cycle(&rx).await, 0);

    // Poll 3: 0.68, measured against the 0.50 baseline, not the 0.51 tick.
    fetcher.push_price("M1", dec!(0.68));
    assert_eq!(runner.run_cycle(&rx).await, 1);

    let events = publisher.events();
    assert_eq!(events.len(), 1);

    let event = &events[0];
    assert_eq!(event.partition_key(), "M1");
    assert_eq!(event.previous_yes_price, dec!(0.50));
    assert_eq!(event.yes_price, dec!(0.68));
    assert_eq!(event.conviction_direction, Direction::Yes);
    assert_eq!(event.conviction_magnitude, dec!(0.18));
    assert_eq!(event.conviction_magnitude_pct, Some(dec!(0.36)));
    assert_eq!(event.source, "convictor");
    assert!(event.published_at.is_some());

    // The record round-trips as flat JSON with the expected field names.
    let json = serde_json::to_value(event).unwrap();
    assert_eq!(json["market_id"], "M1");
    assert_eq!(json["conviction_direction"], "yes");
    assert!(json["event_id"].is_string());
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn repeated_snapshots_after_an_event_stay_quiet() {
    let subscriptions = Arc::new(StaticSubscriptions::new(vec![Subscription::new("M1")]));
    let fetcher = Arc::new(ScriptedFetcher::new());
    let publisher = Arc::new(RecordingPublisher::new());

    let mut runner = Runner::new(
        RunnerConfig {
            rate_limit_delay: std::time::Duration::ZERO,
            ..Default::default()
        },
        Detector::new(DetectorConfig::default()),
        subscriptions,
        fetcher.clone(),
        publisher.clone(),
    );
    let (_tx, rx) = watch::channel(false);

    fetcher.push_price("M1", dec!(0.50));
    runner.run_cycle(&rx).await;
    fetcher.push_price("M1", dec!(0.68));
    runner.run_cycle(&rx).await;

    // The same price over and over: the baseline has advanced past it.
    for _ in 0..5 {
        fetcher.push_price("M1", dec!(0.68));
        assert_eq!(runner.run_cycle(&rx).await, 0);
    }

    assert_eq!(publisher.events().len(), 1);
}
