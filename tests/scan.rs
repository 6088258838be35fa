//! End-to-end pipeline test: drives `App::run_scan` against a scripted,
//! network-free `MarketSource` and checks a MONOTONICITY violation survives
//! every validation layer and lands in the report.

use std::sync::Arc;

use chrono::{Duration, Utc};
use edgelord::app::{App, Config};
use edgelord::core::domain::{OrderBook, PriceLevel, TokenId};
use edgelord::testkit::domain::market;
use edgelord::testkit::source::ScriptedSource;
use rust_decimal_macros::dec;
use tokio_util::sync::CancellationToken;

fn deep_book(token: &str, best_ask: rust_decimal::Decimal) -> OrderBook {
    OrderBook::with_levels(TokenId::from(token), vec![], vec![PriceLevel::new(best_ask, dec!(1_000_000))])
}

#[tokio::test]
async fn monotonicity_violation_is_discovered_and_validated() {
    let end_time = Utc::now() + Duration::days(30);

    let market_a = market("a", "Will BTC exceed $100,000 by 2026-12-31?", "ev", dec!(0.40), dec!(0.60), end_time);
    let market_b = market("b", "Will BTC exceed $110,000 by 2026-12-31?", "ev", dec!(0.50), dec!(0.45), end_time);

    let source = ScriptedSource::new(vec![market_a, market_b])
        .with_book(TokenId::from("a-yes"), deep_book("a-yes", dec!(0.40)))
        .with_book(TokenId::from("b-no"), deep_book("b-no", dec!(0.45)));

    let app = App::with_source(Config::default(), Arc::new(source));
    let report = app.run_scan(CancellationToken::new()).await.expect("scan succeeds");

    assert_eq!(report.markets_considered, 2);
    assert!(
        report.opportunities.iter().any(|o| o.strategy() == edgelord::core::domain::Strategy::Monotonicity),
        "expected a MONOTONICITY opportunity in {:?}",
        report.opportunities
    );
}

#[tokio::test]
async fn cancellation_before_detection_short_circuits_the_scan() {
    let end_time = Utc::now() + Duration::days(30);
    let market_a = market("a", "Will BTC exceed $100,000 by 2026-12-31?", "ev", dec!(0.40), dec!(0.60), end_time);
    let source = ScriptedSource::new(vec![market_a]);

    let cancel = CancellationToken::new();
    cancel.cancel();

    let app = App::with_source(Config::default(), Arc::new(source));
    let result = app.run_scan(cancel).await;

    assert!(matches!(result, Err(edgelord::error::Error::Canceled)));
}

#[tokio::test]
async fn empty_catalog_yields_an_empty_report() {
    let source = ScriptedSource::new(Vec::new());
    let app = App::with_source(Config::default(), Arc::new(source));
    let report = app.run_scan(CancellationToken::new()).await.expect("scan succeeds");

    assert_eq!(report.markets_considered, 0);
    assert!(report.opportunities.is_empty());
}
