//! Layer 6 — Pre-flight: re-fetches each leg's order book immediately
//! before acceptance, re-prices the plan against the fresh quotes, and
//! recomputes Layer 3's math. A plan that degraded below threshold is
//! marked `STALE` and discarded rather than accepted on stale prices.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;

use crate::core::domain::{OrderBook, Opportunity, ValidationLayer};
use crate::core::exchange::BookFetcher;

use super::math_execution;

pub async fn run(opp: &mut Opportunity, fetcher: &BookFetcher, target_notional: Decimal, min_liquidity_usd: Decimal) -> bool {
    let mut fresh_books: HashMap<_, OrderBook> = HashMap::with_capacity(opp.legs().len());
    for leg in opp.legs() {
        let book = fetcher.fetch(leg.token_id()).await.unwrap_or_else(|_| OrderBook::empty());
        fresh_books.insert(leg.token_id().clone(), book);
    }

    let fresh_prices: Vec<Decimal> = opp
        .legs()
        .iter()
        .map(|leg| {
            fresh_books
                .get(leg.token_id())
                .and_then(OrderBook::best_ask)
                .map_or_else(|| leg.effective_price(), |level| level.price())
        })
        .collect();
    opp.reprice_legs(&fresh_prices);

    if !math_execution::check(opp, &fresh_books, target_notional, min_liquidity_usd) {
        opp.mark_stale();
        return false;
    }

    opp.set_plan_snapshot_at(Utc::now());
    opp.record_pass(ValidationLayer::Preflight);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{MarketId, OpportunityId, OpportunityLeg, PriceLevel, Side, Strategy, TokenId};
    use crate::core::exchange::MarketSource;
    use crate::error::Result;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    struct FixedSource {
        price: Decimal,
    }

    #[async_trait]
    impl MarketSource for FixedSource {
        async fn list_markets(&self, _tags: &[String], _limit: usize) -> Result<Vec<crate::core::domain::Market>> {
            Ok(Vec::new())
        }

        async fn fetch_order_book(&self, token_id: &TokenId) -> Result<OrderBook> {
            Ok(OrderBook::with_levels(token_id.clone(), vec![], vec![PriceLevel::new(self.price, dec!(1_000_000))]))
        }
    }

    fn opp() -> Opportunity {
        Opportunity::new(
            OpportunityId::new("EXHAUSTIVE", 1),
            Strategy::Exhaustive,
            vec![
                OpportunityLeg::new(MarketId::from("a"), TokenId::from("a-yes"), Side::Yes, dec!(100), dec!(0.40)),
                OpportunityLeg::new(MarketId::from("b"), TokenId::from("b-yes"), Side::Yes, dec!(100), dec!(0.30)),
            ],
            dec!(10.0),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn unchanged_prices_pass_and_set_snapshot_time() {
        let fetcher = BookFetcher::new(Arc::new(FixedSource { price: dec!(0.30) }), 4);
        let mut candidate = opp();
        candidate.reprice_legs(&[dec!(0.30), dec!(0.30)]);
        assert!(run(&mut candidate, &fetcher, dec!(100), dec!(10000)).await);
        assert!(candidate.is_accepted());
        assert!(candidate.plan_snapshot_at().is_some());
    }

    #[tokio::test]
    async fn prices_moved_against_the_plan_mark_it_stale() {
        let fetcher = BookFetcher::new(Arc::new(FixedSource { price: dec!(0.60) }), 4);
        let mut candidate = opp();
        assert!(!run(&mut candidate, &fetcher, dec!(100), dec!(10000)).await);
        assert!(!candidate.is_accepted());
    }
}
