//! Detector thresholds and cool-down configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// Global detection thresholds. Per-subscription overrides take precedence
/// over the absolute/relative thresholds configured here.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectorConfig {
    /// Minimum absolute YES-price move to report (price points).
    #[serde(default = "default_abs_threshold")]
    pub abs_threshold: Decimal,

    /// Minimum relative YES-price move to report (fraction of baseline).
    #[serde(default = "default_pct_threshold")]
    pub pct_threshold: Decimal,

    /// Minimum seconds between consecutive events for the same market.
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,

    /// Threshold multiplier applied while the cool-down window is open.
    /// A move can still break through the cool-down if it clears the
    /// thresholds scaled by this factor.
    #[serde(default = "default_cooldown_margin")]
    pub cooldown_margin: Decimal,
}

fn default_abs_threshold() -> Decimal {
    dec!(0.10) // 10 percentage points absolute move
}

fn default_pct_threshold() -> Decimal {
    dec!(0.20) // 20% relative move
}

const fn default_cooldown_secs() -> u64 {
    300
}

fn default_cooldown_margin() -> Decimal {
    dec!(1.5)
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            abs_threshold: default_abs_threshold(),
            pct_threshold: default_pct_threshold(),
            cooldown_secs: default_cooldown_secs(),
            cooldown_margin: default_cooldown_margin(),
        }
    }
}
