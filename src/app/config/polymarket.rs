//! Market Source (Polymarket) connection configuration.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolymarketConfig {
    pub api_url: String,
    pub gamma_url: String,
    pub http: PolymarketHttpConfig,
    /// Max age a listed-markets snapshot may be served from the
    /// `SnapshotCache` seam before a fresh fetch is required.
    pub snapshot_cache_ttl_secs: u64,
}

impl Default for PolymarketConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            gamma_url: default_gamma_url(),
            http: PolymarketHttpConfig::default(),
            snapshot_cache_ttl_secs: 30,
        }
    }
}

fn default_api_url() -> String {
    "https://clob.polymarket.com".into()
}

fn default_gamma_url() -> String {
    "https://gamma-api.polymarket.com".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolymarketHttpConfig {
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub retry_max_attempts: u32,
    pub retry_backoff_ms: u64,
}

impl Default for PolymarketHttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            connect_timeout_ms: 2000,
            retry_max_attempts: 3,
            retry_backoff_ms: 500,
        }
    }
}
