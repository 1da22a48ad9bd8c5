//! Detected conviction shifts.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which outcome the crowd moved toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Price moved toward the YES outcome (current > baseline).
    Yes,
    /// Price moved toward the NO outcome (current < baseline).
    No,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Yes => write!(f, "yes"),
            Direction::No => write!(f, "no"),
        }
    }
}

/// Result of a positive conviction-change detection.
///
/// Transient value object: produced by the detector, consumed immediately by
/// event building, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvictionChange {
    pub direction: Direction,

    /// Absolute price move, `|current - baseline|`.
    pub magnitude: Decimal,

    /// Relative move, `magnitude / baseline`. `None` when the baseline was
    /// zero and the ratio is undefined.
    pub magnitude_pct: Option<Decimal>,

    /// The baseline YES price the move was measured against.
    pub previous_yes_price: Decimal,

    /// The YES price that triggered the detection.
    pub new_yes_price: Decimal,
}
