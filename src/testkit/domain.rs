//! Builders for domain primitives used across tests.
//!
//! Concise factory functions so tests focus on assertions rather than
//! construction boilerplate — every field `Market::new` requires gets a
//! sensible default that a test can override by hand afterward.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::core::domain::{EventId, Market, MarketFields, MarketId, Price, TokenId};

/// Builds a market with the given id and YES/NO mid prices, resolving at
/// `end_time`, sharing `event_id` with any other market built against the
/// same id.
#[must_use]
pub fn market(id: &str, question: &str, event_id: &str, yes_mid: Decimal, no_mid: Decimal, end_time: DateTime<Utc>) -> Market {
    Market::new(MarketFields {
        market_id: MarketId::from(id),
        condition_id: format!("0x{id}"),
        token_id_yes: TokenId::from(format!("{id}-yes")),
        token_id_no: TokenId::from(format!("{id}-no")),
        question: question.to_string(),
        market_description: String::new(),
        event_description: String::new(),
        event_id: EventId::from(event_id),
        event_title: event_id.to_string(),
        tags: HashSet::new(),
        yes_mid: Price::new(yes_mid),
        no_mid: Price::new(no_mid),
        liquidity_usd: dec!(50000),
        volume_usd: dec!(100000),
        end_time,
        created_at: Utc::now(),
        resolution_source: "testkit".into(),
    })
}
