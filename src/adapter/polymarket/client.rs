//! Polymarket Gamma REST API fetcher.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::app::NetworkConfig;
use crate::domain::{MarketSnapshot, Subscription};
use crate::error::{FetchError, Result};
use crate::port::outbound::SnapshotFetcher;

use super::parse::parse_market;

/// HTTP fetcher for single-market snapshots from the Gamma API.
///
/// Looks markets up by condition id, falling back to the subscription's slug
/// when the id query returns nothing. Applies a rate-limit delay between
/// requests and retries transient failures (5xx, timeouts) with exponential
/// backoff; 4xx responses are terminal.
pub struct GammaFetcher {
    client: Client,
    base_url: String,
    max_retries: u32,
    rate_limit_delay: Duration,
    last_request: tokio::sync::Mutex<Option<Instant>>,
}

impl GammaFetcher {
    pub fn new(network: &NetworkConfig, rate_limit_delay: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(network.request_timeout_secs))
            .build()
            .map_err(FetchError::Http)?;

        Ok(Self {
            client,
            base_url: network.api_url.trim_end_matches('/').to_string(),
            max_retries: network.max_retries.max(1),
            rate_limit_delay,
            last_request: tokio::sync::Mutex::new(None),
        })
    }

    async fn rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.rate_limit_delay {
                tokio::time::sleep(self.rate_limit_delay - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn get_with_retries(&self, url: &str) -> std::result::Result<Value, FetchError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            self.rate_limit().await;

            let err = match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.json().await.map_err(FetchError::Http);
                    }
                    let body = response.text().await.unwrap_or_default();
                    let err = FetchError::Status {
                        status: status.as_u16(),
                        body,
                    };
                    if !status.is_server_error() {
                        return Err(err);
                    }
                    err
                }
                Err(e) => FetchError::Http(e),
            };

            if attempt >= self.max_retries {
                return Err(err);
            }

            let backoff = Duration::from_millis(500 * 2u64.pow(attempt - 1));
            warn!(
                url,
                attempt,
                backoff_ms = backoff.as_millis() as u64,
                error = %err,
                "Gamma request failed; retrying"
            );
            tokio::time::sleep(backoff).await;
        }
    }

    async fn query_first(&self, query: &str) -> std::result::Result<Option<Value>, FetchError> {
        let url = format!("{}/markets?{}", self.base_url, query);
        debug!(url = %url, "fetching market");
        let value = self.get_with_retries(&url).await?;
        Ok(first_market(value))
    }
}

#[async_trait]
impl SnapshotFetcher for GammaFetcher {
    async fn fetch(&self, subscription: &Subscription) -> Result<MarketSnapshot> {
        let id = &subscription.market_id;

        let mut raw = self
            .query_first(&format!("condition_ids={}", id.as_str()))
            .await?;

        if raw.is_none() {
            if let Some(slug) = &subscription.slug {
                raw = self.query_first(&format!("slug={slug}")).await?;
            }
        }

        let raw = raw.ok_or_else(|| FetchError::NotFound {
            market_id: id.to_string(),
        })?;

        Ok(parse_market(&raw, Utc::now())?)
    }
}

/// Unwrap the first market object from the varied response envelopes the
/// API serves: a bare array, an object with a `data` array, or a bare object.
fn first_market(value: Value) -> Option<Value> {
    match value {
        Value::Array(mut items) => {
            if items.is_empty() {
                None
            } else {
                Some(items.remove(0))
            }
        }
        Value::Object(mut map) => match map.remove("data") {
            Some(inner) => first_market(inner),
            None => Some(Value::Object(map)),
        },
        _ => None,
    }
}
