//! Subscription store fake with failure injection.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::Subscription;
use crate::error::{Error, Result};
use crate::port::outbound::SubscriptionStore;

/// In-memory subscription store returning a fixed list.
///
/// `fail_next(n)` makes the next `n` calls fail, for exercising the
/// skip-cycle path.
#[derive(Default)]
pub struct StaticSubscriptions {
    subscriptions: Mutex<Vec<Subscription>>,
    failures: AtomicU32,
    calls: AtomicU32,
}

impl StaticSubscriptions {
    #[must_use]
    pub fn new(subscriptions: Vec<Subscription>) -> Self {
        Self {
            subscriptions: Mutex::new(subscriptions),
            failures: AtomicU32::new(0),
            calls: AtomicU32::new(0),
        }
    }

    /// Replace the stored subscription list.
    pub fn set(&self, subscriptions: Vec<Subscription>) {
        *self.subscriptions.lock() = subscriptions;
    }

    /// Make the next `n` `list_active` calls fail.
    pub fn fail_next(&self, n: u32) {
        self.failures.store(n, Ordering::SeqCst);
    }

    #[must_use]
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubscriptionStore for StaticSubscriptions {
    async fn list_active(&self) -> Result<Vec<Subscription>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(Error::Subscriptions("injected store failure".into()));
        }

        Ok(self.subscriptions.lock().clone())
    }
}
