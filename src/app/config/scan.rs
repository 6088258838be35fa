//! Scan-scoped knobs: what to fetch and what counts as worth reporting.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Only markets carrying one of these tags are considered; empty means
    /// no tag filter.
    pub tags: Vec<String>,
    /// Upper bound on markets fetched per scan.
    pub market_limit: usize,
    pub min_liquidity_usd: Decimal,
    pub min_profit_pct: Decimal,
    pub min_apy: Decimal,
    /// Cosine-similarity threshold above which the Semantic Clusterer
    /// forwards a pair of markets to the LLM Analyzer.
    pub similarity_threshold: f64,
    pub max_llm_calls: u32,
    pub plan_max_age_seconds: i64,
    pub target_notional_usd: Decimal,
    pub min_depth_usd: Decimal,
    /// How far apart two markets' `end_time` may be and still be treated as
    /// resolving at "the same time" by the Temporal strategy.
    pub time_tolerance_seconds: i64,
    /// Whether the Market Source pages through the full catalog for a tag
    /// instead of stopping at `fetch_max_per_tag`.
    pub enable_full_fetch: bool,
    pub fetch_max_per_tag: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            tags: Vec::new(),
            market_limit: 2000,
            min_liquidity_usd: dec!(500),
            min_profit_pct: dec!(1.0),
            min_apy: dec!(5.0),
            similarity_threshold: 0.82,
            max_llm_calls: 500,
            plan_max_age_seconds: 30,
            target_notional_usd: dec!(100),
            min_depth_usd: dec!(50),
            time_tolerance_seconds: 3600,
            enable_full_fetch: false,
            fetch_max_per_tag: 500,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ConcurrencyConfig {
    pub n_source: usize,
    pub n_embed: usize,
    pub n_llm: usize,
    pub n_book: usize,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            n_source: 8,
            n_embed: 4,
            n_llm: 4,
            n_book: 16,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RateConfig {
    pub requests_per_second: f64,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 10.0,
        }
    }
}
