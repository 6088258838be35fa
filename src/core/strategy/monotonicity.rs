//! MONOTONICITY: for thresholds T1 < T2 on the same subject and direction,
//! the probability of crossing the stricter threshold can never exceed the
//! probability of crossing the looser one. A violation is a risk-free pair.

use chrono::Utc;
use rust_decimal::Decimal;

use crate::core::domain::{Direction, MarketId, Opportunity, OpportunityId, OpportunityLeg, RequiredInputs, Side};

use super::{Strategy, StrategyInput};

pub struct MonotonicityStrategy {
    min_gap: Decimal,
}

impl MonotonicityStrategy {
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

impl Strategy for MonotonicityStrategy {
    fn name(&self) -> crate::core::domain::Strategy {
        crate::core::domain::Strategy::Monotonicity
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
        let mut entries: Vec<(&MarketId, &crate::core::domain::ThresholdInfo)> = input.thresholds.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        let mut ordinal = 0u64;
        let mut opportunities = Vec::new();

        for i in 0..entries.len() {
            for j in 0..entries.len() {
                if i == j {
                    continue;
                }
                let (id_a, thresh_a) = entries[i];
                let (id_b, thresh_b) = entries[j];
                if !thresh_a.same_subject(thresh_b) || thresh_a.direction() != thresh_b.direction() {
                    continue;
                }
                let deadline_tolerance = chrono::Duration::seconds(input.time_tolerance_seconds);
                if !thresh_a.same_deadline(thresh_b, deadline_tolerance) {
                    continue;
                }
                // want thresh_a strictly looser (a < b for ABOVE, a > b for BELOW)
                let a_is_looser = match thresh_a.direction() {
                    Direction::Above => thresh_a.value() < thresh_b.value(),
                    Direction::Below => thresh_a.value() > thresh_b.value(),
                };
                if !a_is_looser {
                    continue;
                }

                // B_yes implies A_yes, so A_yes OR B_no is always true.
                let notional = Decimal::from(100u32);
                let Some(leg_a) = self.leg(graph, input, id_a, Side::Yes, notional) else { continue };
                let Some(leg_b) = self.leg(graph, input, id_b, Side::No, notional) else { continue };

                let total_cost = leg_a.effective_price() + leg_b.effective_price();
                let profit = Decimal::ONE - total_cost;
                if profit <= self.min_gap {
                    continue;
                }

                ordinal += 1;
                let profit_pct = profit / total_cost * Decimal::from(100u32);
                opportunities.push(Opportunity::new(
                    OpportunityId::new(self.name().as_str(), ordinal),
                    self.name(),
                    vec![leg_a, leg_b],
                    profit_pct,
                    Utc::now(),
                ));
            }
        }
        opportunities
    }
}
