//! EQUIVALENT: when the LLM Analyzer judges two markets always resolve the
//! same way, buying the cheaper one's YES and the more expensive one's NO
//! for less than $1 combined is risk-free — whichever way the pair
//! resolves, exactly one leg pays out $1.

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::core::domain::{Market, MarketGraph, Opportunity, OpportunityId, OpportunityLeg, RelationType, RequiredInputs, Side};

use super::{Strategy, StrategyInput};

/// Minimum LLM confidence required before an EQUIVALENT judgment is acted
/// on (`SPEC_FULL.md` §4.5.5).
const TAU_EQUIV: f64 = 0.90;

/// Minimum mid-price gap between two judged-equivalent markets before the
/// mispricing is worth trading (`ε_equiv`, `SPEC_FULL.md` §4.5.5).
const EPSILON_EQUIV: Decimal = dec!(0.03);

/// Crude negation/antonym markers. A question containing one of these that
/// its claimed-equivalent counterpart does not is treated as a logical
/// negation rather than a true equivalence, regardless of what the model
/// said — two markets phrased as negations of each other anti-correlate,
/// they don't co-move.
const NEGATION_MARKERS: &[&str] = &["not ", "won't", "will not", "fails to", "failure to", "no longer", "never "];

fn negation_markers(text: &str) -> usize {
    let lower = text.to_ascii_lowercase();
    NEGATION_MARKERS.iter().filter(|m| lower.contains(*m)).count()
}

/// True when exactly one of the two questions carries a negation marker the
/// other doesn't — the sign of a disguised antonym pair slipping through as
/// "equivalent".
fn looks_like_negation_pair(a: &Market, b: &Market) -> bool {
    (negation_markers(a.question()) > 0) != (negation_markers(b.question()) > 0)
}

pub struct EquivalentStrategy {
    min_gap: Decimal,
}

impl EquivalentStrategy {
    #[must_use]
    pub fn new(min_gap: Decimal) -> Self {
        Self { min_gap }
    }
}

impl Strategy for EquivalentStrategy {
    fn name(&self) -> crate::core::domain::Strategy {
        crate::core::domain::Strategy::Equivalent
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
            if analysis.relation() != RelationType::Equivalent || analysis.is_downgraded() {
                continue;
            }
            if analysis.confidence() < TAU_EQUIV || !analysis.resolution_compatible() {
                continue;
            }

            let Some(market_a) = graph.market(analysis.subject()) else { continue };
            let Some(market_b) = graph.market(analysis.target()) else { continue };
            if looks_like_negation_pair(market_a, market_b) {
                continue;
            }

            let (cheaper, expensive) = if market_a.mid(Side::Yes).value() <= market_b.mid(Side::Yes).value() {
                (market_a, market_b)
            } else {
                (market_b, market_a)
            };
            let gap = expensive.mid(Side::Yes).value() - cheaper.mid(Side::Yes).value();
            if gap <= EPSILON_EQUIV {
                continue;
            }

            let notional = Decimal::from(100u32);
            let Some(leg_cheap) = leg(graph, input, cheaper.market_id(), Side::Yes, notional) else { continue };
            let Some(leg_expensive) = leg(graph, input, expensive.market_id(), Side::No, notional) else { continue };

            let total_cost = leg_cheap.effective_price() + leg_expensive.effective_price();
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
                    vec![leg_cheap, leg_expensive],
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
