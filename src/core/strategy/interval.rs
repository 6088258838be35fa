//! INTERVAL: when a parsed interval A is strictly nested inside interval B
//! on the same subject, A resolving YES guarantees B resolves YES too — the
//! same implication shape as MONOTONICITY but over ranges instead of a
//! single crossing point.

use chrono::Utc;
use rust_decimal::Decimal;
use std::cmp::Ordering;

use crate::core::domain::{Endpoint, IntervalInfo, Market, MarketId, Opportunity, OpportunityId, OpportunityLeg, RequiredInputs, Side};

use super::{Strategy, StrategyInput};

fn endpoint_value(e: Endpoint) -> Option<Decimal> {
    match e {
        Endpoint::Value(v) => Some(v),
        Endpoint::NegInfinity | Endpoint::PosInfinity => None,
    }
}

/// Orders endpoints for containment checks, treating `NegInfinity` as the
/// smallest possible value and `PosInfinity` as the largest.
fn cmp_lower(a: Endpoint, b: Endpoint) -> Ordering {
    match (a, b) {
        (Endpoint::NegInfinity, Endpoint::NegInfinity) => Ordering::Equal,
        (Endpoint::NegInfinity, _) => Ordering::Less,
        (_, Endpoint::NegInfinity) => Ordering::Greater,
        _ => endpoint_value(a).unwrap_or(Decimal::MIN).cmp(&endpoint_value(b).unwrap_or(Decimal::MIN)),
    }
}

fn cmp_upper(a: Endpoint, b: Endpoint) -> Ordering {
    match (a, b) {
        (Endpoint::PosInfinity, Endpoint::PosInfinity) => Ordering::Equal,
        (Endpoint::PosInfinity, _) => Ordering::Greater,
        (_, Endpoint::PosInfinity) => Ordering::Less,
        _ => endpoint_value(a).unwrap_or(Decimal::MAX).cmp(&endpoint_value(b).unwrap_or(Decimal::MAX)),
    }
}

/// Whether `inner` is strictly contained within `outer` (not equal to it) —
/// `outer.lower <= inner.lower` and `inner.upper <= outer.upper`, with at
/// least one side strict.
fn strictly_contains(outer: &IntervalInfo, inner: &IntervalInfo) -> bool {
    let lower_ok = cmp_lower(outer.lower().endpoint(), inner.lower().endpoint()) != Ordering::Greater;
    let upper_ok = cmp_upper(inner.upper().endpoint(), outer.upper().endpoint()) != Ordering::Greater;
    if !lower_ok || !upper_ok {
        return false;
    }
    let lower_strict = cmp_lower(outer.lower().endpoint(), inner.lower().endpoint()) == Ordering::Less;
    let upper_strict = cmp_upper(inner.upper().endpoint(), outer.upper().endpoint()) == Ordering::Less;
    lower_strict || upper_strict
}

pub struct IntervalStrategy {
    min_gap: Decimal,
}

impl IntervalStrategy {
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

impl Strategy for IntervalStrategy {
    fn name(&self) -> crate::core::domain::Strategy {
        crate::core::domain::Strategy::Interval
    }

    fn required_inputs(&self) -> RequiredInputs {
        RequiredInputs {
            intervals: true,
            order_book: true,
            ..RequiredInputs::none()
        }
    }

    fn detect(&self, input: &StrategyInput) -> Vec<Opportunity> {
        let Some(graph) = &input.graph else { return Vec::new() };
        let mut entries: Vec<(&MarketId, &IntervalInfo)> = input.intervals.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        let mut ordinal = 0u64;
        let mut opportunities = Vec::new();

        for (id_inner, inner) in &entries {
            for (id_outer, outer) in &entries {
                if id_inner == id_outer || !inner.same_subject(outer) {
                    continue;
                }
                if !strictly_contains(outer, inner) {
                    continue;
                }

                let notional = Decimal::from(100u32);
                let Some(leg_inner) = self.leg(graph, input, id_inner, Side::Yes, notional) else { continue };
                let Some(leg_outer) = self.leg(graph, input, id_outer, Side::No, notional) else { continue };

                let total_cost = leg_inner.effective_price() + leg_outer.effective_price();
                let profit = Decimal::ONE - total_cost;
                if profit <= self.min_gap {
                    continue;
                }

                ordinal += 1;
                let profit_pct = profit / total_cost * Decimal::from(100u32);
                opportunities.push(Opportunity::new(
                    OpportunityId::new(self.name().as_str(), ordinal),
                    self.name(),
                    vec![leg_inner, leg_outer],
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
    use crate::core::domain::{Bound, EventId, MarketFields, MarketGraph, Price, Subject, TokenId};
    use rust_decimal_macros::dec;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn market(id: &str, yes_mid: Decimal, no_mid: Decimal) -> Market {
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
            no_mid: Price::new(no_mid),
            liquidity_usd: dec!(10000),
            volume_usd: dec!(10000),
            end_time: Utc::now(),
            created_at: Utc::now(),
            resolution_source: String::new(),
        })
    }

    #[test]
    fn nested_interval_mispricing_is_detected() {
        // inner: BTC in [105k, 108k], outer: BTC in [100k, 110k]
        let inner = market("inner", dec!(0.45), dec!(0.55));
        let outer = market("outer", dec!(0.40), dec!(0.50));
        let graph = MarketGraph::build(vec![inner, outer], vec![]);

        let mut input = StrategyInput::default();
        input.graph = Some(Arc::new(graph));
        input.intervals.insert(
            MarketId::from("inner"),
            IntervalInfo::new(
                Subject::new("BTC"),
                Bound::new(Endpoint::Value(dec!(105000)), true),
                Bound::new(Endpoint::Value(dec!(108000)), true),
                0.9,
            ),
        );
        input.intervals.insert(
            MarketId::from("outer"),
            IntervalInfo::new(
                Subject::new("BTC"),
                Bound::new(Endpoint::Value(dec!(100000)), true),
                Bound::new(Endpoint::Value(dec!(110000)), true),
                0.9,
            ),
        );

        let strategy = IntervalStrategy::new(dec!(0.01));
        let opps = strategy.detect(&input);
        assert_eq!(opps.len(), 1);
    }

    #[test]
    fn non_nested_intervals_yield_no_opportunity() {
        let a = market("a", dec!(0.40), dec!(0.60));
        let b = market("b", dec!(0.40), dec!(0.60));
        let graph = MarketGraph::build(vec![a, b], vec![]);

        let mut input = StrategyInput::default();
        input.graph = Some(Arc::new(graph));
        input.intervals.insert(
            MarketId::from("a"),
            IntervalInfo::new(
                Subject::new("BTC"),
                Bound::new(Endpoint::Value(dec!(100000)), true),
                Bound::new(Endpoint::Value(dec!(105000)), true),
                0.9,
            ),
        );
        input.intervals.insert(
            MarketId::from("b"),
            IntervalInfo::new(
                Subject::new("BTC"),
                Bound::new(Endpoint::Value(dec!(105000)), false),
                Bound::new(Endpoint::Value(dec!(110000)), true),
                0.9,
            ),
        );

        let strategy = IntervalStrategy::new(dec!(0.01));
        assert!(strategy.detect(&input).is_empty());
    }

    #[test]
    fn identical_intervals_are_not_strictly_nested() {
        let a = market("a", dec!(0.50), dec!(0.50));
        let b = market("b", dec!(0.50), dec!(0.50));
        let graph = MarketGraph::build(vec![a, b], vec![]);

        let mut input = StrategyInput::default();
        input.graph = Some(Arc::new(graph));
        let interval = IntervalInfo::new(
            Subject::new("BTC"),
            Bound::new(Endpoint::Value(dec!(100000)), true),
            Bound::new(Endpoint::Value(dec!(110000)), true),
            0.9,
        );
        input.intervals.insert(MarketId::from("a"), interval.clone());
        input.intervals.insert(MarketId::from("b"), interval);

        let strategy = IntervalStrategy::new(dec!(0.01));
        assert!(strategy.detect(&input).is_empty());
    }
}
