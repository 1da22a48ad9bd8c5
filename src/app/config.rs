//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with serde-level defaults for
//! every field, so a partial file (or none at all) still yields a runnable
//! setup pointed at the public Gamma API.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

use crate::detector::DetectorConfig;
use crate::error::{ConfigError, Result};

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Deployment environment label, used only for logging context.
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Seconds between poll cycles.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Milliseconds to wait between consecutive market fetches in a cycle.
    #[serde(default = "default_rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,

    /// Upper bound on how long an in-flight cycle may run after a shutdown
    /// request before the loop gives up on it.
    #[serde(default = "default_drain_timeout_secs")]
    pub drain_timeout_secs: u64,

    /// Upper bound on the publisher flush during shutdown.
    #[serde(default = "default_flush_timeout_secs")]
    pub flush_timeout_secs: u64,

    /// Source label stamped on every published event.
    #[serde(default = "default_source")]
    pub source: String,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub subscriptions: SubscriptionsConfig,

    #[serde(default)]
    pub publisher: PublisherConfig,

    #[serde(default)]
    pub detector: DetectorConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_environment() -> String {
    "dev".into()
}

const fn default_poll_interval_secs() -> u64 {
    30
}

const fn default_rate_limit_delay_ms() -> u64 {
    200
}

const fn default_drain_timeout_secs() -> u64 {
    10
}

const fn default_flush_timeout_secs() -> u64 {
    5
}

fn default_source() -> String {
    "convictor".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// Base URL of the Gamma markets API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum attempts per fetch (1 = no retries).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_api_url() -> String {
    "https://gamma-api.polymarket.com".into()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_max_retries() -> u32 {
    3
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionsConfig {
    /// Path to the JSON subscription file, re-read every cycle.
    #[serde(default = "default_subscriptions_path")]
    pub path: PathBuf,
}

fn default_subscriptions_path() -> PathBuf {
    PathBuf::from("subscriptions.json")
}

impl Default for SubscriptionsConfig {
    fn default() -> Self {
        Self {
            path: default_subscriptions_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublisherConfig {
    /// Path of the JSON-lines event sink.
    #[serde(default = "default_events_path")]
    pub path: PathBuf,
}

fn default_events_path() -> PathBuf {
    PathBuf::from("events.jsonl")
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            path: default_events_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;

        let config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.network.api_url.is_empty() {
            return Err(ConfigError::MissingField { field: "api_url" }.into());
        }
        Url::parse(&self.network.api_url)?;

        if self.poll_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval_secs",
                reason: "must be positive".into(),
            }
            .into());
        }
        if self.network.max_retries == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_retries",
                reason: "must allow at least one attempt".into(),
            }
            .into());
        }
        if self.detector.cooldown_margin < rust_decimal::Decimal::ONE {
            return Err(ConfigError::InvalidValue {
                field: "cooldown_margin",
                reason: "must be >= 1".into(),
            }
            .into());
        }
        Ok(())
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    #[must_use]
    pub fn rate_limit_delay(&self) -> Duration {
        Duration::from_millis(self.rate_limit_delay_ms)
    }

    #[must_use]
    pub fn drain_timeout(&self) -> Duration {
        Duration::from_secs(self.drain_timeout_secs)
    }

    #[must_use]
    pub fn flush_timeout(&self) -> Duration {
        Duration::from_secs(self.flush_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            poll_interval_secs: default_poll_interval_secs(),
            rate_limit_delay_ms: default_rate_limit_delay_ms(),
            drain_timeout_secs: default_drain_timeout_secs(),
            flush_timeout_secs: default_flush_timeout_secs(),
            source: default_source(),
            network: NetworkConfig::default(),
            subscriptions: SubscriptionsConfig::default(),
            publisher: PublisherConfig::default(),
            detector: DetectorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
