//! Layer 5 — Checklist: attaches a deterministic human-review summary of
//! every earlier layer's findings. Never rejects.

use crate::core::domain::{ApyRating, Opportunity, OracleAlignment, ValidationLayer};

pub fn attach(opp: &mut Opportunity) {
    let oracle = opp.oracle_alignment().map_or("UNKNOWN", OracleAlignment::as_str);
    let apy_rating = opp.apy_rating().map_or("UNKNOWN", ApyRating::as_str);
    let liquidity = opp.min_leg_liquidity_usd().unwrap_or_default();
    let slippage = opp.slippage_cost().unwrap_or_default();

    let items = vec![
        format!("logic: {} legs, cost={}, guaranteed_return={}, profit={}", opp.legs().len(), opp.cost(), opp.guaranteed_return(), opp.effective_profit()),
        format!("rules: strategy={}", opp.strategy().as_str()),
        format!("oracle: {oracle}"),
        "time: end_times within tolerance at Layer 2".to_string(),
        format!("liquidity: min_leg_liquidity_usd={liquidity}, slippage_cost={slippage}"),
        format!("apy: expected_apy={}, rating={apy_rating}", opp.expected_apy().unwrap_or_default()),
    ];

    opp.set_checklist(items);
    opp.record_pass(ValidationLayer::Checklist);
}
