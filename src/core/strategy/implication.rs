//! IMPLICATION: when the LLM Analyzer judges that market A resolving YES
//! guarantees market B resolves YES, buying B YES and A NO for less than $1
//! combined is a risk-free position — either A is NO (the A-NO leg pays) or
//! A is YES, which by the implication forces B YES (the B-YES leg pays).

use chrono::Utc;
use rust_decimal::Decimal;

use crate::core::domain::{Direction, MarketGraph, Opportunity, OpportunityId, OpportunityLeg, RelationType, RequiredInputs, Side};

use super::{Strategy, StrategyInput};

/// Minimum LLM confidence required before an IMPLIES judgment is acted on,
/// independent of the strategy's own profit gap (`SPEC_FULL.md` §4.5.4).
const TAU_IMPL: f64 = 0.90;

pub struct ImplicationStrategy {
    min_gap: Decimal,
}

impl ImplicationStrategy {
    #[must_use]
    pub fn new(min_gap: Decimal) -> Self {
        Self { min_gap }
    }

    /// When both markets parsed as thresholds on the same subject, the
    /// claimed implication direction must match the parsed ordering —
    /// a stricter threshold (higher level, ABOVE) implies a looser one,
    /// never the reverse. Mismatch rejects regardless of LLM confidence.
    fn threshold_direction_consistent(&self, input: &StrategyInput, implies_id: &crate::core::domain::MarketId, implied_id: &crate::core::domain::MarketId) -> bool {
        let (Some(a), Some(b)) = (input.thresholds.get(implies_id), input.thresholds.get(implied_id)) else {
            return true;
        };
        if !a.same_subject(b) || a.direction() != b.direction() {
            return true;
        }
        match a.direction() {
            Direction::Above => a.value() >= b.value(),
            Direction::Below => a.value() <= b.value(),
        }
    }
}

impl Strategy for ImplicationStrategy {
    fn name(&self) -> crate::core::domain::Strategy {
        crate::core::domain::Strategy::Implication
    }

    fn required_inputs(&self) -> RequiredInputs {
        RequiredInputs {
            clusters: true,
            llm: true,
            order_book: true,
            ..RequiredInputs::none()
        }
    }

    fn detect(&self, input: &StrategyInput) -> Vec<Opportunity> {
        let Some(graph) = &input.graph else { return Vec::new() };
        let mut ordinal = 0u64;
        let mut opportunities = Vec::new();

        for analysis in &input.relations {
            if analysis.is_downgraded() {
                continue;
            }
            // The analyzer stores only the forward relation for each
            // unordered pair -- IMPLIED_BY carries the same arbitrage with
            // subject/target roles reversed, so both are handled here rather
            // than discarding half of every judged pair.
            let (implies_id, implied_id) = match analysis.relation() {
                RelationType::Implies => (analysis.subject(), analysis.target()),
                RelationType::ImpliedBy => (analysis.target(), analysis.subject()),
                _ => continue,
            };
            if analysis.confidence() < TAU_IMPL || !analysis.resolution_compatible() {
                continue;
            }

            if !self.threshold_direction_consistent(input, implies_id, implied_id) {
                continue;
            }

            let Some(market_implies) = graph.market(implies_id) else { continue };
            let Some(market_implied) = graph.market(implied_id) else { continue };
            if market_implied.end_time() + chrono::Duration::seconds(input.time_tolerance_seconds) < market_implies.end_time() {
                continue;
            }

            let notional = Decimal::from(100u32);
            let Some(leg_implied) = leg(graph, input, implied_id, Side::Yes, notional) else { continue };
            let Some(leg_implies) = leg(graph, input, implies_id, Side::No, notional) else { continue };

            let total_cost = leg_implied.effective_price() + leg_implies.effective_price();
            let profit = Decimal::ONE - total_cost;
            if profit <= self.min_gap {
                continue;
            }

            ordinal += 1;
            let profit_pct = profit / total_cost * Decimal::from(100u32);
            opportunities.push(
                Opportunity::new(
                    OpportunityId::new(self.name().as_str(), ordinal),
                    self.name(),
                    vec![leg_implied, leg_implies],
                    profit_pct,
                    Utc::now(),
                )
                .with_relationship_analysis(analysis.clone()),
            );
        }
        opportunities
    }
}

fn leg(graph: &MarketGraph, input: &StrategyInput, id: &crate::core::domain::MarketId, side: Side, notional: Decimal) -> Option<OpportunityLeg> {
    let market = graph.market(id)?;
    let book = input.order_book(market.token_id(side));
    let price = market.effective_buy_price(side, book);
    Some(OpportunityLeg::new(id.clone(), market.token_id(side).clone(), side, notional, price.value()))
}
