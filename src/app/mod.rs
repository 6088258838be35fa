//! Application layer - orchestration, configuration, and shared state.

mod config;
mod orchestrator;

pub use config::{Config, LoggingConfig, PolymarketConfig, StrategiesConfig, ThresholdsConfig};
pub use orchestrator::{App, ScanReport};
