//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with environment variable
//! overrides for API keys, never stored in the file itself.

use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

mod llm;
mod logging;
mod polymarket;
mod scan;
mod thresholds;

pub use llm::{AnthropicConfig, EmbeddingConfig, LlmConfig, LlmProvider, OpenAiConfig};
pub use logging::LoggingConfig;
pub use polymarket::{PolymarketConfig, PolymarketHttpConfig};
pub use scan::{ConcurrencyConfig, RateConfig, ScanConfig};
pub use thresholds::{StrategiesConfig, ThresholdsConfig};

/// Root application configuration, assembled from one TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub concurrency: ConcurrencyConfig,
    pub rate: RateConfig,
    pub thresholds: ThresholdsConfig,
    pub strategies: StrategiesConfig,
    pub llm: LlmConfig,
    pub polymarket: PolymarketConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Loads and validates configuration from a TOML file. API keys are
    /// never read from the file — only from the environment, so they never
    /// land in a config that might be checked into version control.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the default configuration, used by commands that don't need
    /// file-based overrides (e.g. `edgelord check config` against defaults).
    #[must_use]
    pub fn default_validated() -> Self {
        Self::default()
    }

    fn validate(&self) -> Result<()> {
        use rust_decimal::Decimal;

        if self.polymarket.api_url.is_empty() {
            return Err(ConfigError::MissingField { field: "polymarket.api_url" }.into());
        }
        if self.scan.similarity_threshold < 0.0 || self.scan.similarity_threshold > 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "scan.similarity_threshold",
                reason: "must be between 0 and 1".to_string(),
            }
            .into());
        }
        if self.scan.min_liquidity_usd < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "scan.min_liquidity_usd",
                reason: "must be non-negative".to_string(),
            }
            .into());
        }
        if self.scan.max_llm_calls == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scan.max_llm_calls",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.scan.plan_max_age_seconds <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "scan.plan_max_age_seconds",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.concurrency.n_source == 0
            || self.concurrency.n_embed == 0
            || self.concurrency.n_llm == 0
            || self.concurrency.n_book == 0
        {
            return Err(ConfigError::InvalidValue {
                field: "concurrency",
                reason: "all pool sizes must be greater than 0".to_string(),
            }
            .into());
        }
        if self.rate.requests_per_second <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "rate.requests_per_second",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.scan.enable_full_fetch && self.scan.fetch_max_per_tag == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scan.fetch_max_per_tag",
                reason: "must be greater than 0 when enable_full_fetch is set".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Initializes the global tracing subscriber from `self.logging`.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// The Anthropic API key, read from the environment so it never lives
    /// in the TOML file.
    #[must_use]
    pub fn anthropic_api_key() -> Option<String> {
        std::env::var("ANTHROPIC_API_KEY").ok()
    }

    #[must_use]
    pub fn openai_api_key() -> Option<String> {
        std::env::var("OPENAI_API_KEY").ok()
    }
}
