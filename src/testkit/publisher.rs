//! Recording event publisher.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::ConvictionEvent;
use crate::error::{Error, PublishError, Result};
use crate::port::outbound::EventPublisher;

/// Records published events in order and counts flushes.
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<ConvictionEvent>>,
    flushes: AtomicU32,
    failures: AtomicU32,
}

impl RecordingPublisher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` publishes fail.
    pub fn fail_next(&self, n: u32) {
        self.failures.store(n, Ordering::SeqCst);
    }

    /// All recorded events, in publish order.
    #[must_use]
    pub fn events(&self) -> Vec<ConvictionEvent> {
        self.events.lock().clone()
    }

    /// Partition keys of recorded events, in publish order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .map(|e| e.partition_key().to_string())
            .collect()
    }

    #[must_use]
    pub fn flush_count(&self) -> u32 {
        self.flushes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: &ConvictionEvent) -> Result<()> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(Error::Publish(PublishError::Rejected(
                "injected publish failure".into(),
            )));
        }

        self.events.lock().push(event.clone());
        Ok(())
    }

    async fn flush(&self, _timeout: Duration) -> Result<()> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
