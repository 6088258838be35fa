//! Layer 4 — APY: annualizes the strategy's expected profit over the
//! soonest leg deadline and bands the result into a human-facing rating.

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::core::domain::{ApyRating, MarketGraph, Opportunity, ValidationLayer};

const DAYS_PER_YEAR: Decimal = dec!(365);
const SECONDS_PER_DAY: Decimal = dec!(86400);

/// Bands assigned to `apy` once it clears `apy_min`, expressed in the same
/// percent units as `expected_profit_pct`/`scan.min_apy`.
pub struct ApyBands {
    pub excellent: Decimal,
    pub good: Decimal,
}

impl Default for ApyBands {
    fn default() -> Self {
        Self { excellent: dec!(100), good: dec!(30) }
    }
}

pub fn check(opp: &mut Opportunity, graph: &MarketGraph, apy_min: Decimal, bands: &ApyBands) -> bool {
    let now = Utc::now();
    let mut min_days: Option<Decimal> = None;
    let mut any_already_resolved = false;

    for leg in opp.legs() {
        let Some(market) = graph.market(leg.market_id()) else {
            opp.record_rejection(ValidationLayer::Apy, "missing leg market");
            return false;
        };
        if market.end_time() <= now {
            any_already_resolved = true;
        }
        let seconds = (market.end_time() - now).num_seconds().max(0);
        let days = Decimal::from(seconds) / SECONDS_PER_DAY;
        min_days = Some(min_days.map_or(days, |current: Decimal| current.min(days)));
    }

    let days_clamped = min_days.unwrap_or(Decimal::ZERO).max(Decimal::ONE);
    let apy = opp.expected_profit_pct() * (DAYS_PER_YEAR / days_clamped);
    opp.set_expected_apy(apy);

    let rating = if any_already_resolved {
        ApyRating::Reject
    } else if apy >= bands.excellent {
        ApyRating::Excellent
    } else if apy >= bands.good {
        ApyRating::Good
    } else if apy >= apy_min {
        ApyRating::Acceptable
    } else {
        ApyRating::Reject
    };
    opp.set_apy_rating(rating);

    if any_already_resolved {
        opp.record_rejection(ValidationLayer::Apy, "a leg's end_time has already passed");
        return false;
    }
    if apy < apy_min {
        opp.record_rejection(ValidationLayer::Apy, format!("apy {apy} below minimum {apy_min}"));
        return false;
    }

    opp.record_pass(ValidationLayer::Apy);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{EventId, Market, MarketFields, MarketId, OpportunityId, OpportunityLeg, Price, Side, Strategy, TokenId};
    use chrono::Duration;
    use std::collections::HashSet;

    fn market(id: &str, end_time: chrono::DateTime<Utc>) -> Market {
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
            yes_mid: Price::new(dec!(0.5)),
            no_mid: Price::new(dec!(0.5)),
            liquidity_usd: dec!(10000),
            volume_usd: dec!(10000),
            end_time,
            created_at: Utc::now(),
            resolution_source: String::new(),
        })
    }

    fn opp(profit_pct: Decimal) -> Opportunity {
        Opportunity::new(
            OpportunityId::new("MONOTONICITY", 1),
            Strategy::Monotonicity,
            vec![OpportunityLeg::new(MarketId::from("m"), TokenId::from("m-yes"), Side::Yes, dec!(100), dec!(0.4))],
            profit_pct,
            Utc::now(),
        )
    }

    #[test]
    fn short_dated_high_profit_rates_excellent() {
        let graph = MarketGraph::build(vec![market("m", Utc::now() + Duration::days(3))], vec![]);
        let mut candidate = opp(dec!(5.0));
        assert!(check(&mut candidate, &graph, dec!(5.0), &ApyBands::default()));
        assert_eq!(candidate.apy_rating(), Some(ApyRating::Excellent));
    }

    #[test]
    fn far_dated_low_profit_is_rejected() {
        let graph = MarketGraph::build(vec![market("m", Utc::now() + Duration::days(300))], vec![]);
        let mut candidate = opp(dec!(0.5));
        assert!(!check(&mut candidate, &graph, dec!(5.0), &ApyBands::default()));
        assert_eq!(candidate.apy_rating(), Some(ApyRating::Reject));
    }

    #[test]
    fn already_resolved_leg_is_always_rejected() {
        let graph = MarketGraph::build(vec![market("m", Utc::now() - Duration::days(1))], vec![]);
        let mut candidate = opp(dec!(50.0));
        assert!(!check(&mut candidate, &graph, dec!(5.0), &ApyBands::default()));
        assert_eq!(candidate.apy_rating(), Some(ApyRating::Reject));
    }
}
