//! Converts wire DTOs to domain types, isolating venue quirks from the rest
//! of the pipeline.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::core::domain::{EventId, Market, MarketFields, MarketId, Price, TokenId};
use crate::error::{Error, Result};

use super::dto::GammaMarket;

pub fn market_from_gamma(raw: GammaMarket) -> Result<Market> {
    if raw.clob_token_ids.len() != 2 || raw.outcome_prices.len() != 2 {
        return Err(Error::SourceFormat(format!(
            "market {} is not binary: {} tokens, {} prices",
            raw.condition_id,
            raw.clob_token_ids.len(),
            raw.outcome_prices.len()
        )));
    }

    let end_time: DateTime<Utc> = raw
        .end_date
        .parse()
        .map_err(|e| Error::SourceFormat(format!("bad end_date for {}: {e}", raw.condition_id)))?;
    let created_at = raw
        .created_at
        .as_deref()
        .and_then(|s| s.parse::<DateTime<Utc>>().ok())
        .unwrap_or_else(Utc::now);

    let yes_mid = Decimal::try_from(raw.outcome_prices[0])
        .map_err(|e| Error::SourceFormat(format!("bad price for {}: {e}", raw.condition_id)))?;
    let no_mid = Decimal::try_from(raw.outcome_prices[1])
        .map_err(|e| Error::SourceFormat(format!("bad price for {}: {e}", raw.condition_id)))?;

    Ok(Market::new(MarketFields {
        market_id: MarketId::from(raw.condition_id.as_str()),
        condition_id: raw.condition_id,
        token_id_yes: TokenId::from(raw.clob_token_ids[0].as_str()),
        token_id_no: TokenId::from(raw.clob_token_ids[1].as_str()),
        question: raw.question,
        market_description: raw.description,
        event_description: String::new(),
        event_id: EventId::from(raw.event_slug.as_str()),
        event_title: raw.event_title,
        tags: raw.tags.into_iter().collect::<HashSet<_>>(),
        yes_mid: Price::new(yes_mid),
        no_mid: Price::new(no_mid),
        liquidity_usd: Decimal::try_from(raw.liquidity_num).unwrap_or(Decimal::ZERO),
        volume_usd: Decimal::try_from(raw.volume_num).unwrap_or(Decimal::ZERO),
        end_time,
        created_at,
        resolution_source: raw.resolution_source,
    }))
}
