//! Wire DTOs for the Polymarket Gamma API.
//!
//! The venue serializes several array/number fields as JSON strings rather
//! than native JSON arrays/numbers (`outcomePrices`, `clobTokenIds`) — these
//! types absorb that quirk at the deserialization boundary so nothing
//! downstream has to think about it again.

use serde::{Deserialize, Deserializer};

fn string_encoded_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    serde_json::from_str(&raw).map_err(serde::de::Error::custom)
}

fn string_encoded_f64_vec<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let strings: Vec<String> = serde_json::from_str(&raw).map_err(serde::de::Error::custom)?;
    strings
        .into_iter()
        .map(|s| s.parse::<f64>().map_err(serde::de::Error::custom))
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct GammaMarketsResponse {
    #[serde(default)]
    pub data: Vec<GammaMarket>,
}

/// One market as returned by `GET /markets`. Field names match the venue's
/// camelCase wire format; Rust-side consumers use `core::exchange::convert`.
#[derive(Debug, Deserialize)]
pub struct GammaMarket {
    pub condition_id: String,
    pub question: String,
    #[serde(default)]
    pub description: String,
    pub active: bool,
    pub closed: bool,
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(deserialize_with = "string_encoded_vec")]
    pub clob_token_ids: Vec<String>,
    #[serde(deserialize_with = "string_encoded_f64_vec")]
    pub outcome_prices: Vec<f64>,

    #[serde(default)]
    pub liquidity_num: f64,
    #[serde(default)]
    pub volume_num: f64,

    pub end_date: String,
    #[serde(default)]
    pub created_at: Option<String>,

    pub event_slug: String,
    #[serde(default)]
    pub event_title: String,

    #[serde(default)]
    pub resolution_source: String,
}

#[derive(Debug, Deserialize)]
pub struct ClobBookResponse {
    #[serde(default)]
    pub bids: Vec<ClobLevel>,
    #[serde(default)]
    pub asks: Vec<ClobLevel>,
}

#[derive(Debug, Deserialize)]
pub struct ClobLevel {
    pub price: String,
    pub size: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gamma_market_decodes_string_encoded_arrays() {
        let json = r#"{
            "condition_id": "0xabc",
            "question": "Will BTC exceed $110k by 2026-01-01?",
            "active": true,
            "closed": false,
            "tags": ["crypto"],
            "clob_token_ids": "[\"111\", \"222\"]",
            "outcome_prices": "[\"0.3\", \"0.7\"]",
            "liquidity_num": 50000.0,
            "volume_num": 100000.0,
            "end_date": "2026-01-01T00:00:00Z",
            "event_slug": "btc-price",
            "resolution_source": "CoinDesk"
        }"#;
        let market: GammaMarket = serde_json::from_str(json).unwrap();
        assert_eq!(market.clob_token_ids, vec!["111", "222"]);
        assert_eq!(market.outcome_prices, vec![0.3, 0.7]);
    }
}
