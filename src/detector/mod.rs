//! The conviction-change detection core.

mod config;
mod conviction;
mod state;

pub use config::DetectorConfig;
pub use conviction::Detector;
pub use state::ConvictionState;
