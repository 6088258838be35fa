//! Layer 3 — Math & execution: recompute cost from `effective_buy_price`,
//! walk each leg's order book for slippage, and enforce a minimum liquidity
//! depth. Also reused by Layer 6 to recheck the same math against freshly
//! fetched books.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::core::domain::{OrderBook, Opportunity, TokenId, ValidationLayer};

/// Minimum margin between `cost` and `guaranteed_return` before a candidate
/// is worth pursuing at all (`ε_profit`, `SPEC_FULL.md` §4.6 Layer 3).
const EPSILON_PROFIT: Decimal = dec!(0.005);

/// Minimum executable profit remaining after slippage is subtracted
/// (`ε_exec`). Not named in the configuration surface; a conservative fixed
/// floor, smaller than `ε_profit` since slippage already erodes margin.
const EPSILON_EXEC: Decimal = dec!(0.001);

/// Price band around `best_ask` used to measure cumulative ask depth.
const DEPTH_BAND: Decimal = dec!(0.05);

pub fn check(opp: &mut Opportunity, books: &HashMap<TokenId, OrderBook>, target_notional: Decimal, min_liquidity_usd: Decimal) -> bool {
    let cost = opp.cost();
    if cost >= opp.guaranteed_return() - EPSILON_PROFIT {
        opp.record_rejection(ValidationLayer::MathExecution, format!("cost {cost} too close to guaranteed return {}", opp.guaranteed_return()));
        return false;
    }

    let mut slippage_cost = Decimal::ZERO;
    let mut min_depth: Option<Decimal> = None;
    for leg in opp.legs() {
        let Some(book) = books.get(leg.token_id()) else {
            opp.record_rejection(ValidationLayer::MathExecution, "missing order book for a leg");
            return false;
        };
        let Some(best_ask) = book.best_ask() else {
            opp.record_rejection(ValidationLayer::MathExecution, "leg book has no ask side");
            return false;
        };
        let Some(vwap) = book.vwap_buy(target_notional) else {
            opp.record_rejection(ValidationLayer::MathExecution, "insufficient ask depth to fill target notional");
            return false;
        };
        slippage_cost += vwap - best_ask.price();
        let depth = book.ask_depth_usd(DEPTH_BAND);
        min_depth = Some(min_depth.map_or(depth, |current: Decimal| current.min(depth)));
    }
    let min_depth = min_depth.unwrap_or(Decimal::ZERO);

    opp.set_slippage_cost(slippage_cost);
    opp.set_min_leg_liquidity_usd(min_depth);

    let executable_profit = opp.guaranteed_return() - cost - slippage_cost;
    if executable_profit < EPSILON_EXEC {
        opp.record_rejection(ValidationLayer::MathExecution, format!("executable profit {executable_profit} below epsilon_exec after slippage"));
        return false;
    }

    if min_depth < min_liquidity_usd {
        opp.record_rejection(ValidationLayer::MathExecution, format!("INSUFFICIENT_LIQUIDITY: {min_depth} below required {min_liquidity_usd}"));
        return false;
    }

    opp.record_pass(ValidationLayer::MathExecution);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{MarketId, OpportunityId, OpportunityLeg, PriceLevel, Side, Strategy};
    use chrono::Utc;

    fn opp(leg_prices: &[Decimal]) -> Opportunity {
        let legs: Vec<_> = leg_prices
            .iter()
            .enumerate()
            .map(|(i, price)| {
                OpportunityLeg::new(
                    MarketId::from(format!("m{i}")),
                    TokenId::from(format!("m{i}-yes")),
                    Side::Yes,
                    dec!(100),
                    *price,
                )
            })
            .collect();
        Opportunity::new(OpportunityId::new("EXHAUSTIVE", 1), Strategy::Exhaustive, legs, dec!(5.0), Utc::now())
    }

    fn deep_book(token: &str, best_ask: Decimal) -> OrderBook {
        OrderBook::with_levels(TokenId::from(token), vec![], vec![PriceLevel::new(best_ask, dec!(1_000_000))])
    }

    #[test]
    fn healthy_candidate_passes_and_records_slippage() {
        let mut candidate = opp(&[dec!(0.40), dec!(0.50)]);
        let mut books = HashMap::new();
        books.insert(TokenId::from("m0-yes"), deep_book("m0-yes", dec!(0.40)));
        books.insert(TokenId::from("m1-yes"), deep_book("m1-yes", dec!(0.50)));

        assert!(check(&mut candidate, &books, dec!(100), dec!(10000)));
        assert_eq!(candidate.slippage_cost(), Some(Decimal::ZERO));
    }

    #[test]
    fn cost_too_close_to_guaranteed_return_is_rejected() {
        let mut candidate = opp(&[dec!(0.50), dec!(0.499)]);
        let books = HashMap::new();
        assert!(!check(&mut candidate, &books, dec!(100), dec!(10000)));
    }

    #[test]
    fn thin_book_fails_the_liquidity_check() {
        let mut candidate = opp(&[dec!(0.40), dec!(0.50)]);
        let mut books = HashMap::new();
        books.insert(TokenId::from("m0-yes"), OrderBook::with_levels(TokenId::from("m0-yes"), vec![], vec![PriceLevel::new(dec!(0.40), dec!(10))]));
        books.insert(TokenId::from("m1-yes"), deep_book("m1-yes", dec!(0.50)));

        assert!(!check(&mut candidate, &books, dec!(100), dec!(10000)));
    }

    #[test]
    fn missing_book_for_a_leg_is_rejected() {
        let mut candidate = opp(&[dec!(0.40), dec!(0.50)]);
        let mut books = HashMap::new();
        books.insert(TokenId::from("m0-yes"), deep_book("m0-yes", dec!(0.40)));
        assert!(!check(&mut candidate, &books, dec!(100), dec!(10000)));
    }
}
