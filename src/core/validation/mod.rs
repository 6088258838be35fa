//! Validation Engine: six ordered layers that turn a candidate `Opportunity`
//! from a strategy into either an accepted, execution-ready plan or a
//! recorded rejection. Each layer's verdict is appended to the opportunity's
//! `validation_trail` regardless of outcome, and a layer never runs once an
//! earlier one has rejected the candidate.

mod apy;
mod checklist;
mod math_execution;
mod preflight;
mod rule_oracle;
mod semantic;

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::app::config::ScanConfig;
use crate::core::domain::{MarketGraph, Opportunity, OrderBook, TokenId};
use crate::core::exchange::BookFetcher;

pub use apy::ApyBands;
pub use rule_oracle::AuthorityDirectory;

/// Drives candidates through Layers 1-6. Layers 1-5 are pure computation
/// over a single snapshot of order books; Layer 6 performs its own I/O to
/// re-fetch books immediately before acceptance.
pub struct ValidationEngine {
    scan: ScanConfig,
    authorities: AuthorityDirectory,
    apy_bands: ApyBands,
}

impl ValidationEngine {
    #[must_use]
    pub fn new(scan: ScanConfig) -> Self {
        Self {
            scan,
            authorities: AuthorityDirectory::default(),
            apy_bands: ApyBands::default(),
        }
    }

    /// Runs Layers 1 through 5 in strict order against one snapshot of
    /// order books, attaching the checklist on success. Returns `true` if
    /// the candidate survived to Layer 6.
    #[must_use]
    pub fn run_discovery_layers(&self, opp: &mut Opportunity, graph: &MarketGraph, books: &HashMap<TokenId, OrderBook>) -> bool {
        if !semantic::check(opp) {
            return false;
        }
        if !rule_oracle::check(opp, graph, &self.authorities, self.scan.time_tolerance_seconds) {
            return false;
        }
        if !math_execution::check(opp, books, self.scan.target_notional_usd, self.scan.min_depth_usd) {
            return false;
        }
        let apy_min = self.scan.min_apy;
        if !apy::check(opp, graph, apy_min, &self.apy_bands) {
            return false;
        }
        checklist::attach(opp);
        true
    }

    /// Layer 6: re-fetches each leg's order book and recomputes Layer 3's
    /// math against fresh quotes. Marks the candidate `STALE` and returns
    /// `false` if executable profit degraded below threshold in the time
    /// between discovery and this call.
    pub async fn run_preflight(&self, opp: &mut Opportunity, fetcher: &BookFetcher) -> bool {
        preflight::run(opp, fetcher, self.scan.target_notional_usd, self.scan.min_depth_usd).await
    }

    /// Runs the full six-layer pipeline for one candidate: Layers 1-5
    /// against `books`, then Layer 6 against freshly fetched quotes. The
    /// opportunity is left in its terminal `Status` (`Accepted`,
    /// `Rejected`, or `Stale`) regardless of outcome.
    pub async fn validate(&self, opp: &mut Opportunity, graph: &MarketGraph, books: &HashMap<TokenId, OrderBook>, fetcher: &BookFetcher) -> bool {
        if !self.run_discovery_layers(opp, graph, books) {
            return false;
        }
        self.run_preflight(opp, fetcher).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{EventId, Market, MarketFields, MarketId, OpportunityId, OpportunityLeg, Price, PriceLevel, Side, Strategy, TokenId};
    use crate::core::exchange::MarketSource;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;
    use std::collections::HashSet;
    use std::sync::Arc;

    struct FixedSource {
        price: Decimal,
    }

    #[async_trait]
    impl MarketSource for FixedSource {
        async fn list_markets(&self, _tags: &[String], _limit: usize) -> crate::error::Result<Vec<Market>> {
            Ok(Vec::new())
        }

        async fn fetch_order_book(&self, token_id: &TokenId) -> crate::error::Result<OrderBook> {
            Ok(OrderBook::with_levels(token_id.clone(), vec![], vec![PriceLevel::new(self.price, dec!(1_000_000))]))
        }
    }

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
            yes_mid: Price::new(dec!(0.3)),
            no_mid: Price::new(dec!(0.7)),
            liquidity_usd: dec!(10000),
            volume_usd: dec!(10000),
            end_time,
            created_at: Utc::now(),
            resolution_source: "CoinDesk".into(),
        })
    }

    #[tokio::test]
    async fn a_healthy_candidate_survives_all_six_layers() {
        let end_time = Utc::now() + Duration::days(5);
        let graph = MarketGraph::build(vec![market("a", end_time), market("b", end_time)], vec![]);

        let mut candidate = Opportunity::new(
            OpportunityId::new("EXHAUSTIVE", 1),
            Strategy::Exhaustive,
            vec![
                OpportunityLeg::new(MarketId::from("a"), TokenId::from("a-yes"), Side::Yes, dec!(100), dec!(0.30)),
                OpportunityLeg::new(MarketId::from("b"), TokenId::from("b-yes"), Side::Yes, dec!(100), dec!(0.30)),
            ],
            dec!(40.0),
            Utc::now(),
        );

        let mut books = HashMap::new();
        books.insert(TokenId::from("a-yes"), OrderBook::with_levels(TokenId::from("a-yes"), vec![], vec![PriceLevel::new(dec!(0.30), dec!(1_000_000))]));
        books.insert(TokenId::from("b-yes"), OrderBook::with_levels(TokenId::from("b-yes"), vec![], vec![PriceLevel::new(dec!(0.30), dec!(1_000_000))]));

        let engine = ValidationEngine::new(ScanConfig::default());
        let fetcher = BookFetcher::new(Arc::new(FixedSource { price: dec!(0.30) }), 4);

        assert!(engine.validate(&mut candidate, &graph, &books, &fetcher).await);
        assert!(candidate.is_accepted());
        assert_eq!(candidate.validation_trail().len(), 6);
    }
}
