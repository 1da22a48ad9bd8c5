use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Snapshot-fetch errors surfaced by fetcher adapters.
///
/// The runner treats every variant uniformly: log with market context and
/// skip the market until the next cycle.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("market {market_id} not found upstream")]
    NotFound { market_id: String },

    #[error("malformed market data for {market_id}: {reason}")]
    Malformed { market_id: String, reason: String },

    #[error("data quality check failed for {market_id}: {field} {reason}")]
    DataQuality {
        market_id: String,
        field: &'static str,
        reason: String,
    },
}

/// Event-publish errors surfaced by publisher adapters.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("failed to serialize event: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write event: {0}")]
    Write(#[source] std::io::Error),

    #[error("flush failed: {0}")]
    Flush(String),

    #[error("publisher rejected event: {0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error("subscription store error: {0}")]
    Subscriptions(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
