//! Market and Event domain types.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::id::{EventId, MarketId, TokenId};
use super::money::Price;
use super::order_book::OrderBook;

/// Which side of a binary market a leg buys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Yes,
    No,
}

impl Side {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }
}

/// A binary prediction-market question with a YES/NO token pair.
///
/// Produced once per scan by the Market Source and shared read-only by all
/// later stages (see `SPEC_FULL.md` §3, Ownership & Lifecycle).
#[derive(Debug, Clone)]
pub struct Market {
    market_id: MarketId,
    condition_id: String,
    token_id_yes: TokenId,
    token_id_no: TokenId,

    question: String,
    market_description: String,
    event_description: String,

    event_id: EventId,
    event_title: String,
    tags: HashSet<String>,

    yes_mid: Price,
    no_mid: Price,

    liquidity_usd: Decimal,
    volume_usd: Decimal,

    end_time: DateTime<Utc>,
    created_at: DateTime<Utc>,

    resolution_source: String,
}

/// Fields required to construct a [`Market`]; grouped so call sites (mostly
/// the Polymarket DTO conversion) don't pass a dozen positional arguments.
pub struct MarketFields {
    pub market_id: MarketId,
    pub condition_id: String,
    pub token_id_yes: TokenId,
    pub token_id_no: TokenId,
    pub question: String,
    pub market_description: String,
    pub event_description: String,
    pub event_id: EventId,
    pub event_title: String,
    pub tags: HashSet<String>,
    pub yes_mid: Price,
    pub no_mid: Price,
    pub liquidity_usd: Decimal,
    pub volume_usd: Decimal,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub resolution_source: String,
}

impl Market {
    #[must_use]
    pub fn new(fields: MarketFields) -> Self {
        Self {
            market_id: fields.market_id,
            condition_id: fields.condition_id,
            token_id_yes: fields.token_id_yes,
            token_id_no: fields.token_id_no,
            question: fields.question,
            market_description: fields.market_description,
            event_description: fields.event_description,
            event_id: fields.event_id,
            event_title: fields.event_title,
            tags: fields.tags,
            yes_mid: fields.yes_mid,
            no_mid: fields.no_mid,
            liquidity_usd: fields.liquidity_usd,
            volume_usd: fields.volume_usd,
            end_time: fields.end_time,
            created_at: fields.created_at,
            resolution_source: fields.resolution_source,
        }
    }

    #[must_use]
    pub const fn market_id(&self) -> &MarketId {
        &self.market_id
    }

    #[must_use]
    pub fn condition_id(&self) -> &str {
        &self.condition_id
    }

    #[must_use]
    pub const fn token_id(&self, side: Side) -> &TokenId {
        match side {
            Side::Yes => &self.token_id_yes,
            Side::No => &self.token_id_no,
        }
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn market_description(&self) -> &str {
        &self.market_description
    }

    #[must_use]
    pub fn event_description(&self) -> &str {
        &self.event_description
    }

    #[must_use]
    pub const fn event_id(&self) -> &EventId {
        &self.event_id
    }

    #[must_use]
    pub fn event_title(&self) -> &str {
        &self.event_title
    }

    #[must_use]
    pub const fn tags(&self) -> &HashSet<String> {
        &self.tags
    }

    #[must_use]
    pub const fn mid(&self, side: Side) -> Price {
        match side {
            Side::Yes => self.yes_mid,
            Side::No => self.no_mid,
        }
    }

    #[must_use]
    pub const fn liquidity_usd(&self) -> Decimal {
        self.liquidity_usd
    }

    #[must_use]
    pub const fn volume_usd(&self) -> Decimal {
        self.volume_usd
    }

    #[must_use]
    pub const fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn resolution_source(&self) -> &str {
        &self.resolution_source
    }

    /// `0 ≤ yes_mid + no_mid ≤ 1 + ε_round`, and when an order book is
    /// present `best_bid ≤ mid ≤ best_ask` on both sides.
    #[must_use]
    pub fn prices_are_sane(&self, epsilon_round: Decimal) -> bool {
        let sum = self.yes_mid + self.no_mid;
        sum >= Decimal::ZERO && sum <= Decimal::ONE + epsilon_round
    }

    /// The price actually paid to buy one unit of `side`: the best ask from
    /// `book` if present, otherwise the catalog mid. Executable computations
    /// (Validation Layer 3 onward) MUST go through this, never through
    /// `mid()` directly.
    #[must_use]
    pub fn effective_buy_price(&self, side: Side, book: Option<&OrderBook>) -> Price {
        match book.and_then(OrderBook::best_ask) {
            Some(level) => Price::new(level.price()),
            None => self.mid(side),
        }
    }
}

/// A group of markets sharing `event_id`, carrying the shared rules text.
#[derive(Debug, Clone)]
pub struct Event {
    event_id: EventId,
    title: String,
    description: String,
    market_ids: Vec<MarketId>,
}

impl Event {
    #[must_use]
    pub fn new(
        event_id: EventId,
        title: impl Into<String>,
        description: impl Into<String>,
        market_ids: Vec<MarketId>,
    ) -> Self {
        Self {
            event_id,
            title: title.into(),
            description: description.into(),
            market_ids,
        }
    }

    #[must_use]
    pub const fn event_id(&self) -> &EventId {
        &self.event_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn market_ids(&self) -> &[MarketId] {
        &self.market_ids
    }
}
