//! TEMPORAL: the same monotonicity argument as MONOTONICITY, but across
//! nested time windows on one underlying threshold rather than across
//! threshold levels — "BTC > $100k by March" resolving YES guarantees
//! "BTC > $100k by April" resolves YES too, since the later deadline only
//! adds opportunities for the threshold to be crossed.

use chrono::Utc;
use rust_decimal::Decimal;

use crate::core::domain::{MarketId, Opportunity, OpportunityId, OpportunityLeg, RequiredInputs, Side, ThresholdInfo};

use super::{Strategy, StrategyInput};

pub struct TemporalStrategy {
    min_gap: Decimal,
}

impl TemporalStrategy {
    #[must_use]
    pub fn new(min_gap: Decimal) -> Self {
        Self { min_gap }
    }

    fn leg(&self, graph: &crate::core::domain::MarketGraph, input: &StrategyInput, id: &MarketId, side: Side, notional: Decimal) -> Option<OpportunityLeg> {
        let market = graph.market(id)?;
        let book = input.order_book(market.token_id(side));
        let price = market.effective_buy_price(side, book);
        Some(OpportunityLeg::new(id.clone(), market.token_id(side).clone(), side, notional, price.value()))
    }
}

/// Two threshold questions are the same nested-window pair when they share
/// a subject, direction and level — the only thing distinguishing them is
/// how far out their deadline (`end_time`) sits.
fn same_ladder(a: &ThresholdInfo, b: &ThresholdInfo) -> bool {
    a.same_subject(b) && a.direction() == b.direction() && a.value() == b.value()
}

impl Strategy for TemporalStrategy {
    fn name(&self) -> crate::core::domain::Strategy {
        crate::core::domain::Strategy::Temporal
    }

    fn required_inputs(&self) -> RequiredInputs {
        RequiredInputs {
            thresholds: true,
            order_book: true,
            ..RequiredInputs::none()
        }
    }

    fn detect(&self, input: &StrategyInput) -> Vec<Opportunity> {
        let Some(graph) = &input.graph else { return Vec::new() };
        let mut entries: Vec<(&MarketId, &ThresholdInfo)> = input.thresholds.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        let mut ordinal = 0u64;
        let mut opportunities = Vec::new();

        for i in 0..entries.len() {
            for j in 0..entries.len() {
                if i == j {
                    continue;
                }
                let (id_early, thresh_early) = entries[i];
                let (id_late, thresh_late) = entries[j];
                if !same_ladder(thresh_early, thresh_late) {
                    continue;
                }

                let Some(market_early) = graph.market(id_early) else { continue };
                let Some(market_late) = graph.market(id_late) else { continue };
                // "early" must genuinely precede "late" beyond the window the
                // scan treats as simultaneous, or this isn't a temporal
                // nesting at all -- it's the same deadline twice.
                if market_early.end_time() + chrono::Duration::seconds(input.time_tolerance_seconds) >= market_late.end_time() {
                    continue;
                }

                // Later deadline only adds opportunities for the threshold
                // to be crossed (ABOVE) or to stay uncrossed (BELOW), so
                // yes(late) >= yes(early) in both cases. A cheaper late-YES
                // than early-YES is the violation this strategy trades.
                let notional = Decimal::from(100u32);
                let Some(leg_late) = self.leg(graph, input, id_late, Side::Yes, notional) else { continue };
                let Some(leg_early) = self.leg(graph, input, id_early, Side::No, notional) else { continue };

                let total_cost = leg_late.effective_price() + leg_early.effective_price();
                let profit = Decimal::ONE - total_cost;
                if profit <= self.min_gap {
                    continue;
                }

                ordinal += 1;
                let profit_pct = profit / total_cost * Decimal::from(100u32);
                opportunities.push(Opportunity::new(
                    OpportunityId::new(self.name().as_str(), ordinal),
                    self.name(),
                    vec![leg_late, leg_early],
                    profit_pct,
                    Utc::now(),
                ));
            }
        }
        opportunities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{Boundary, Direction, EventId, Market, MarketFields, MarketGraph, Price, Subject, TokenId};
    use chrono::Duration;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn market(id: &str, yes_mid: Decimal, end_time: chrono::DateTime<Utc>) -> Market {
        Market::new(MarketFields {
            market_id: MarketId::from(id),
            condition_id: format!("0x{id}"),
            token_id_yes: TokenId::from(format!("{id}-yes")),
            token_id_no: TokenId::from(format!("{id}-no")),
            question: String::new(),
            market_description: String::new(),
            event_description: String::new(),
            event_id: EventId::from("ev"),
            event_title: String::new(),
            tags: HashSet::new(),
            yes_mid: Price::new(yes_mid),
            no_mid: Price::new(Decimal::ONE - yes_mid),
            liquidity_usd: dec!(10000),
            volume_usd: dec!(10000),
            end_time,
            created_at: Utc::now(),
            resolution_source: String::new(),
        })
    }

    #[test]
    fn later_deadline_priced_below_earlier_deadline_is_a_violation() {
        let now = Utc::now();
        let early = market("march", dec!(0.50), now + Duration::days(30));
        let late = market("april", dec!(0.40), now + Duration::days(60));
        let graph = MarketGraph::build(vec![early, late], vec![]);

        let mut input = StrategyInput::default();
        input.graph = Some(Arc::new(graph));
        input.time_tolerance_seconds = 3600;
        input.thresholds.insert(
            MarketId::from("march"),
            ThresholdInfo::new(Subject::new("BTC"), dec!(100000), Direction::Above, Boundary::Exclusive, now + Duration::days(30), 0.9),
        );
        input.thresholds.insert(
            MarketId::from("april"),
            ThresholdInfo::new(Subject::new("BTC"), dec!(100000), Direction::Above, Boundary::Exclusive, now + Duration::days(60), 0.9),
        );

        let strategy = TemporalStrategy::new(dec!(0.01));
        let opps = strategy.detect(&input);
        assert_eq!(opps.len(), 1);
    }

    #[test]
    fn monotone_pricing_across_deadlines_yields_no_opportunity() {
        let now = Utc::now();
        let early = market("march", dec!(0.40), now + Duration::days(30));
        let late = market("april", dec!(0.55), now + Duration::days(60));
        let graph = MarketGraph::build(vec![early, late], vec![]);

        let mut input = StrategyInput::default();
        input.graph = Some(Arc::new(graph));
        input.time_tolerance_seconds = 3600;
        input.thresholds.insert(
            MarketId::from("march"),
            ThresholdInfo::new(Subject::new("BTC"), dec!(100000), Direction::Above, Boundary::Exclusive, now + Duration::days(30), 0.9),
        );
        input.thresholds.insert(
            MarketId::from("april"),
            ThresholdInfo::new(Subject::new("BTC"), dec!(100000), Direction::Above, Boundary::Exclusive, now + Duration::days(60), 0.9),
        );

        let strategy = TemporalStrategy::new(dec!(0.01));
        assert!(strategy.detect(&input).is_empty());
    }

    #[test]
    fn different_levels_are_not_the_same_ladder() {
        let now = Utc::now();
        let early = market("march", dec!(0.50), now + Duration::days(30));
        let late = market("april", dec!(0.10), now + Duration::days(60));
        let graph = MarketGraph::build(vec![early, late], vec![]);

        let mut input = StrategyInput::default();
        input.graph = Some(Arc::new(graph));
        input.time_tolerance_seconds = 3600;
        input.thresholds.insert(
            MarketId::from("march"),
            ThresholdInfo::new(Subject::new("BTC"), dec!(100000), Direction::Above, Boundary::Exclusive, now + Duration::days(30), 0.9),
        );
        input.thresholds.insert(
            MarketId::from("april"),
            ThresholdInfo::new(Subject::new("BTC"), dec!(120000), Direction::Above, Boundary::Exclusive, now + Duration::days(60), 0.9),
        );

        let strategy = TemporalStrategy::new(dec!(0.01));
        assert!(strategy.detect(&input).is_empty());
    }
}
