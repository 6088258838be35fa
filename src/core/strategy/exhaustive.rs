//! EXHAUSTIVE: when an event's sibling markets form a mutually exclusive,
//! collectively exhaustive outcome set (exactly one resolves YES), buying
//! YES on every sibling for less than $1 combined is a risk-free position —
//! one of them is guaranteed to pay out $1.

use chrono::Utc;
use rust_decimal::Decimal;

use crate::core::domain::{Opportunity, OpportunityId, OpportunityLeg, RequiredInputs, Side};

use super::{Strategy, StrategyInput};

pub struct ExhaustiveStrategy {
    min_gap: Decimal,
}

impl ExhaustiveStrategy {
    #[must_use]
    pub fn new(min_gap: Decimal) -> Self {
        Self { min_gap }
    }
}

impl Strategy for ExhaustiveStrategy {
    fn name(&self) -> crate::core::domain::Strategy {
        crate::core::domain::Strategy::Exhaustive
    }

    fn required_inputs(&self) -> RequiredInputs {
        RequiredInputs {
            llm: true,
            order_book: true,
            ..RequiredInputs::none()
        }
    }

    fn detect(&self, input: &StrategyInput) -> Vec<Opportunity> {
        let Some(graph) = &input.graph else { return Vec::new() };
        let mut ordinal = 0u64;
        let mut opportunities = Vec::new();

        for event in graph.events() {
            if !input.exhaustive_events.contains(event.event_id()) {
                continue;
            }
            let siblings = graph.siblings(event.event_id());
            if siblings.len() < 2 {
                continue;
            }

            let mut legs = Vec::with_capacity(siblings.len());
            let mut total_cost = Decimal::ZERO;
            for market in &siblings {
                let book = input.order_book(market.token_id(Side::Yes));
                let price = market.effective_buy_price(Side::Yes, book);
                total_cost += price.value();
                legs.push(OpportunityLeg::new(
                    market.market_id().clone(),
                    market.token_id(Side::Yes).clone(),
                    Side::Yes,
                    Decimal::from(100u32),
                    price.value(),
                ));
            }

            let profit = Decimal::ONE - total_cost;
            if profit <= self.min_gap {
                continue;
            }

            ordinal += 1;
            let profit_pct = profit / total_cost * Decimal::from(100u32);
            opportunities.push(Opportunity::new(
                OpportunityId::new(self.name().as_str(), ordinal),
                self.name(),
                legs,
                profit_pct,
                Utc::now(),
            ));
        }
        opportunities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{Event, EventId, Market, MarketFields, MarketGraph, Price, TokenId};
    use rust_decimal_macros::dec;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn market(id: &str, yes_mid: Decimal) -> Market {
        Market::new(MarketFields {
            market_id: MarketId::from(id),
            condition_id: format!("0x{id}"),
            token_id_yes: TokenId::from(format!("{id}-yes")),
            token_id_no: TokenId::from(format!("{id}-no")),
            question: String::new(),
            market_description: String::new(),
            event_description: String::new(),
            event_id: EventId::from("ev1"),
            event_title: String::new(),
            tags: HashSet::new(),
            yes_mid: Price::new(yes_mid),
            no_mid: Price::new(Decimal::ONE - yes_mid),
            liquidity_usd: dec!(10000),
            volume_usd: dec!(10000),
            end_time: Utc::now(),
            created_at: Utc::now(),
            resolution_source: String::new(),
        })
    }

    fn graph_with_outcomes(prices: &[Decimal]) -> MarketGraph {
        let markets: Vec<Market> = prices
            .iter()
            .enumerate()
            .map(|(i, p)| market(&format!("m{i}"), *p))
            .collect();
        let ids: Vec<MarketId> = markets.iter().map(|m| m.market_id().clone()).collect();
        let event = Event::new(EventId::from("ev1"), "winner", "who wins", ids);
        MarketGraph::build(markets, vec![event])
    }

    #[test]
    fn underpriced_outcome_set_is_an_opportunity() {
        let graph = graph_with_outcomes(&[dec!(0.25), dec!(0.25), dec!(0.25), dec!(0.15)]);
        let mut input = StrategyInput::default();
        input.graph = Some(Arc::new(graph));
        input.exhaustive_events.insert(EventId::from("ev1"));

        let strategy = ExhaustiveStrategy::new(dec!(0.01));
        let opps = strategy.detect(&input);
        assert_eq!(opps.len(), 1);
        assert_eq!(opps[0].legs().len(), 4);
    }

    #[test]
    fn fairly_priced_outcome_set_yields_no_opportunity() {
        let graph = graph_with_outcomes(&[dec!(0.30), dec!(0.30), dec!(0.40)]);
        let mut input = StrategyInput::default();
        input.graph = Some(Arc::new(graph));
        input.exhaustive_events.insert(EventId::from("ev1"));

        let strategy = ExhaustiveStrategy::new(dec!(0.01));
        assert!(strategy.detect(&input).is_empty());
    }

    #[test]
    fn single_market_events_are_skipped() {
        let graph = graph_with_outcomes(&[dec!(0.10)]);
        let mut input = StrategyInput::default();
        input.graph = Some(Arc::new(graph));
        input.exhaustive_events.insert(EventId::from("ev1"));

        let strategy = ExhaustiveStrategy::new(dec!(0.01));
        assert!(strategy.detect(&input).is_empty());
    }

    #[test]
    fn events_never_confirmed_exhaustive_by_the_analyzer_are_skipped() {
        let graph = graph_with_outcomes(&[dec!(0.25), dec!(0.25), dec!(0.25), dec!(0.15)]);
        let mut input = StrategyInput::default();
        input.graph = Some(Arc::new(graph));

        let strategy = ExhaustiveStrategy::new(dec!(0.01));
        assert!(strategy.detect(&input).is_empty());
    }
}
