//! JSON-lines event publisher.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::domain::ConvictionEvent;
use crate::error::{PublishError, Result};
use crate::port::outbound::EventPublisher;

/// Appends each event as one JSON line to a local file.
///
/// A single appending writer behind a mutex gives total order across all
/// events, which trivially preserves per-key order. Stands in for a message
/// bus in local and test deployments.
pub struct JsonlPublisher {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl JsonlPublisher {
    /// Open (or create) the sink file in append mode.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(PublishError::Write)?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl EventPublisher for JsonlPublisher {
    async fn publish(&self, event: &ConvictionEvent) -> Result<()> {
        let line = serde_json::to_string(event).map_err(PublishError::Serialize)?;

        let mut writer = self.writer.lock();
        writer
            .write_all(line.as_bytes())
            .and_then(|()| writer.write_all(b"\n"))
            .map_err(PublishError::Write)?;

        debug!(
            event_id = %event.event_id,
            key = event.partition_key(),
            "event appended"
        );
        Ok(())
    }

    async fn flush(&self, _timeout: Duration) -> Result<()> {
        // Local file flush is effectively instant; the timeout matters for
        // networked implementations of this port.
        self.writer.lock().flush().map_err(PublishError::Write)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConvictionChange, Direction, MarketSnapshot};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn event(id: &str) -> ConvictionEvent {
        let snapshot = MarketSnapshot {
            market_id: id.into(),
            question: "?".into(),
            yes_price: dec!(0.65),
            no_price: dec!(0.35),
            volume: None,
            liquidity: None,
            active: true,
            closed: false,
            fetched_at: Utc::now(),
        };
        let change = ConvictionChange {
            direction: Direction::Yes,
            magnitude: dec!(0.15),
            magnitude_pct: Some(dec!(0.30)),
            previous_yes_price: dec!(0.50),
            new_yes_price: dec!(0.65),
        };
        ConvictionEvent::from_detection(&snapshot, &change, "test")
            .with_published_at(Utc::now())
    }

    #[tokio::test]
    async fn appends_one_json_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");

        let publisher = JsonlPublisher::create(&path).unwrap();
        publisher.publish(&event("m1")).await.unwrap();
        publisher.publish(&event("m2")).await.unwrap();
        publisher.flush(Duration::from_secs(1)).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: ConvictionEvent = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.partition_key(), "m1");
        assert_eq!(first.yes_price, Decimal::new(65, 2));
        assert!(first.published_at.is_some());
    }
}
