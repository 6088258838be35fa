//! Read-only, shared view over the markets and events fetched for one scan.
//!
//! Built once by the orchestrator after the Market Source finishes paging
//! and handed to every strategy and validation layer as `Arc<MarketGraph>`
//! — see `SPEC_FULL.md` §3, Ownership & Lifecycle.

use std::collections::HashMap;

use super::id::{EventId, MarketId};
use super::market::{Event, Market};

#[derive(Debug, Default)]
pub struct MarketGraph {
    markets: HashMap<MarketId, Market>,
    events: HashMap<EventId, Event>,
}

impl MarketGraph {
    #[must_use]
    pub fn build(markets: Vec<Market>, events: Vec<Event>) -> Self {
        Self {
            markets: markets.into_iter().map(|m| (m.market_id().clone(), m)).collect(),
            events: events.into_iter().map(|e| (e.event_id().clone(), e)).collect(),
        }
    }

    #[must_use]
    pub fn market(&self, id: &MarketId) -> Option<&Market> {
        self.markets.get(id)
    }

    #[must_use]
    pub fn event(&self, id: &EventId) -> Option<&Event> {
        self.events.get(id)
    }

    #[must_use]
    pub fn markets(&self) -> impl Iterator<Item = &Market> {
        self.markets.values()
    }

    #[must_use]
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }

    #[must_use]
    pub fn market_count(&self) -> usize {
        self.markets.len()
    }

    /// All markets sharing `event.market_ids()`, i.e. the siblings of a
    /// market within its event — what the Exhaustive strategy partitions.
    #[must_use]
    pub fn siblings(&self, event_id: &EventId) -> Vec<&Market> {
        self.events
            .get(event_id)
            .map(|event| {
                event
                    .market_ids()
                    .iter()
                    .filter_map(|id| self.markets.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::market::MarketFields;
    use crate::core::domain::money::Price;
    use crate::core::domain::id::TokenId;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;

    fn market(id: &str, event_id: &str) -> Market {
        Market::new(MarketFields {
            market_id: MarketId::from(id),
            condition_id: format!("0x{id}"),
            token_id_yes: TokenId::from(format!("{id}-yes")),
            token_id_no: TokenId::from(format!("{id}-no")),
            question: "placeholder".into(),
            market_description: String::new(),
            event_description: String::new(),
            event_id: EventId::from(event_id),
            event_title: "event".into(),
            tags: HashSet::new(),
            yes_mid: Price::new(dec!(0.5)),
            no_mid: Price::new(dec!(0.5)),
            liquidity_usd: dec!(1000),
            volume_usd: dec!(1000),
            end_time: Utc::now(),
            created_at: Utc::now(),
            resolution_source: String::new(),
        })
    }

    #[test]
    fn siblings_returns_all_markets_in_the_same_event() {
        let m1 = market("m1", "ev1");
        let m2 = market("m2", "ev1");
        let event = Event::new(EventId::from("ev1"), "t", "d", vec![m1.market_id().clone(), m2.market_id().clone()]);
        let graph = MarketGraph::build(vec![m1, m2], vec![event]);
        let sibs = graph.siblings(&EventId::from("ev1"));
        assert_eq!(sibs.len(), 2);
    }

    #[test]
    fn unknown_event_id_yields_empty_siblings() {
        let graph = MarketGraph::build(vec![], vec![]);
        assert!(graph.siblings(&EventId::from("missing")).is_empty());
    }
}
