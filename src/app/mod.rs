//! Application layer - orchestration, configuration, and detection state.

mod config;
mod runner;
mod state;

pub use config::{
    Config, LoggingConfig, NetworkConfig, PublisherConfig, SubscriptionsConfig,
};
pub use runner::{LoopPhase, Runner, RunnerConfig};
pub use state::StateStore;
