//! Layer 1 — Semantic: re-check that strategies requiring an LLM judgment
//! actually carry one, that it wasn't downgraded by the analyzer's own
//! consistency check, and that it isn't `INDEPENDENT`.

use crate::core::domain::{Opportunity, RelationType, Strategy, ValidationLayer};

fn requires_relationship_analysis(strategy: Strategy) -> bool {
    matches!(strategy, Strategy::Implication | Strategy::Equivalent)
}

pub fn check(opp: &mut Opportunity) -> bool {
    if !requires_relationship_analysis(opp.strategy()) {
        opp.record_pass(ValidationLayer::Semantic);
        return true;
    }

    match opp.relationship_analysis() {
        None => {
            opp.record_rejection(ValidationLayer::Semantic, "strategy requires a relationship analysis but none is attached");
            false
        }
        Some(analysis) if analysis.is_downgraded() => {
            opp.record_rejection(ValidationLayer::Semantic, "relationship analysis was downgraded by a contradiction check");
            false
        }
        Some(analysis) if analysis.relation() == RelationType::Independent => {
            opp.record_rejection(ValidationLayer::Semantic, "relationship analysis resolved to INDEPENDENT");
            false
        }
        Some(_) => {
            opp.record_pass(ValidationLayer::Semantic);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{MarketId, OpportunityId, OpportunityLeg, RelationshipAnalysis, Side, TokenId};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn opp_with_strategy(strategy: Strategy) -> Opportunity {
        Opportunity::new(
            OpportunityId::new(strategy.as_str(), 1),
            strategy,
            vec![OpportunityLeg::new(MarketId::from("a"), TokenId::from("a-yes"), Side::Yes, dec!(100), dec!(0.4))],
            dec!(5.0),
            Utc::now(),
        )
    }

    #[test]
    fn strategies_without_llm_input_pass_trivially() {
        let mut opp = opp_with_strategy(Strategy::Monotonicity);
        assert!(check(&mut opp));
    }

    #[test]
    fn missing_analysis_on_llm_strategy_is_rejected() {
        let mut opp = opp_with_strategy(Strategy::Implication);
        assert!(!check(&mut opp));
    }

    #[test]
    fn downgraded_analysis_is_rejected() {
        let mut opp = opp_with_strategy(Strategy::Equivalent).with_relationship_analysis(
            RelationshipAnalysis::new(MarketId::from("a"), MarketId::from("b"), RelationType::Equivalent, "r").downgrade("contradiction"),
        );
        assert!(!check(&mut opp));
    }

    #[test]
    fn healthy_analysis_passes() {
        let mut opp = opp_with_strategy(Strategy::Implication).with_relationship_analysis(RelationshipAnalysis::new(
            MarketId::from("a"),
            MarketId::from("b"),
            RelationType::Implies,
            "r",
        ));
        assert!(check(&mut opp));
    }
}
