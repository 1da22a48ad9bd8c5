//! File-backed subscription store.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::Subscription;
use crate::error::{Error, Result};
use crate::port::outbound::SubscriptionStore;

/// Reads subscriptions from a JSON file (an array of subscription records).
///
/// The file is re-read on every cycle, so edits are picked up without a
/// restart. Stands in for a shared database in deployments that don't need
/// one; the reference-count semantics are the same.
pub struct FileSubscriptionStore {
    path: PathBuf,
}

impl FileSubscriptionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SubscriptionStore for FileSubscriptionStore {
    async fn list_active(&self) -> Result<Vec<Subscription>> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            Error::Subscriptions(format!("failed to read {}: {e}", self.path.display()))
        })?;

        let subscriptions: Vec<Subscription> = serde_json::from_str(&content).map_err(|e| {
            Error::Subscriptions(format!("failed to parse {}: {e}", self.path.display()))
        })?;

        debug!(
            total = subscriptions.len(),
            path = %self.path.display(),
            "loaded subscriptions"
        );
        Ok(subscriptions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn reads_subscription_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{ "market_id": "0xaaa", "ref_count": 2, "conviction_threshold": 0.05 }},
                {{ "market_id": "0xbbb", "ref_count": 0 }}
            ]"#
        )
        .unwrap();

        let store = FileSubscriptionStore::new(file.path());
        let subs = store.list_active().await.unwrap();

        assert_eq!(subs.len(), 2);
        assert!(subs[0].is_active());
        assert!(!subs[1].is_active());
        assert!(subs[0].conviction_threshold.is_some());
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let store = FileSubscriptionStore::new("/nonexistent/subscriptions.json");
        assert!(store.list_active().await.is_err());
    }
}
