//! Layer 2 — Rule & Oracle alignment: time-ordering checks appropriate to
//! each strategy's leg shape, plus a resolution-source authority
//! classification. `MISALIGNED` rejects regardless of how profitable the
//! candidate looks.

use chrono::Duration;

use crate::core::domain::{MarketGraph, Opportunity, OracleAlignment, Strategy, ValidationLayer};

/// Hand-maintained groups of resolution-source authorities that are
/// considered interchangeable for oracle-alignment purposes (e.g. two major
/// wire services reporting the same underlying fact). Matching is
/// substring/case-insensitive against `Market::resolution_source`.
///
/// `SPEC_FULL.md` §9 leaves the precedence/class list unspecified beyond
/// "configured"; this is the Open Question decision recorded in DESIGN.md.
pub struct AuthorityDirectory {
    groups: Vec<Vec<&'static str>>,
}

impl Default for AuthorityDirectory {
    fn default() -> Self {
        Self {
            groups: vec![
                vec!["associated press", "reuters", "ap news"],
                vec!["coindesk", "coinmarketcap", "coingecko", "kaiko"],
                vec!["federal reserve", "bureau of labor statistics", "bls", "fomc"],
                vec!["espn", "official league box score", "nfl.com", "nba.com"],
                vec!["cdc", "world health organization", "who"],
            ],
        }
    }
}

impl AuthorityDirectory {
    fn group_of(&self, source: &str) -> Option<usize> {
        self.groups.iter().position(|group| group.iter().any(|name| source.contains(name)))
    }

    #[must_use]
    pub fn classify(&self, a: &str, b: &str) -> OracleAlignment {
        let a = a.trim().to_ascii_lowercase();
        let b = b.trim().to_ascii_lowercase();
        if a.is_empty() || b.is_empty() {
            return OracleAlignment::Misaligned;
        }
        if a == b {
            return OracleAlignment::Aligned;
        }
        match (self.group_of(&a), self.group_of(&b)) {
            (Some(ga), Some(gb)) if ga == gb => OracleAlignment::Compatible,
            _ => OracleAlignment::Misaligned,
        }
    }
}

fn severity(alignment: OracleAlignment) -> u8 {
    match alignment {
        OracleAlignment::Aligned => 0,
        OracleAlignment::Compatible => 1,
        OracleAlignment::Misaligned => 2,
    }
}

fn worst(a: OracleAlignment, b: OracleAlignment) -> OracleAlignment {
    if severity(b) > severity(a) {
        b
    } else {
        a
    }
}

fn time_ordering_ok(opp: &Opportunity, graph: &MarketGraph, tolerance: Duration) -> Result<(), &'static str> {
    match opp.strategy() {
        Strategy::Implication | Strategy::Temporal => {
            // Legs are built as [(implied/later, YES), (implies/earlier, NO)]
            // by both strategies -- see implication.rs/temporal.rs.
            let [later, earlier] = opp.legs() else { return Ok(()) };
            let (Some(market_later), Some(market_earlier)) = (graph.market(later.market_id()), graph.market(earlier.market_id())) else {
                return Err("leg market missing from graph");
            };
            if market_later.end_time() + tolerance < market_earlier.end_time() {
                return Err("implied/later market's end_time precedes the implying/earlier one beyond tolerance");
            }
            Ok(())
        }
        Strategy::Exhaustive | Strategy::Interval | Strategy::Monotonicity => {
            // MONOTONICITY's guaranteed-return=1 argument only holds when both
            // legs resolve at (approximately) the same deadline, same as
            // EXHAUSTIVE/INTERVAL's partition legs.
            let end_times: Vec<_> = opp.legs().iter().filter_map(|leg| graph.market(leg.market_id())).map(crate::core::domain::Market::end_time).collect();
            if end_times.len() != opp.legs().len() {
                return Err("leg market missing from graph");
            }
            let (Some(min), Some(max)) = (end_times.iter().min(), end_times.iter().max()) else {
                return Ok(());
            };
            if *max - *min > tolerance {
                return Err("leg end_times diverge beyond tolerance");
            }
            Ok(())
        }
        Strategy::Equivalent => Ok(()),
    }
}

pub fn check(opp: &mut Opportunity, graph: &MarketGraph, authorities: &AuthorityDirectory, time_tolerance_seconds: i64) -> bool {
    let tolerance = Duration::seconds(time_tolerance_seconds);
    if let Err(reason) = time_ordering_ok(opp, graph, tolerance) {
        opp.record_rejection(ValidationLayer::RuleOracle, reason);
        return false;
    }

    let sources: Vec<&str> = opp.legs().iter().filter_map(|leg| graph.market(leg.market_id())).map(crate::core::domain::Market::resolution_source).collect();
    if sources.len() != opp.legs().len() {
        opp.record_rejection(ValidationLayer::RuleOracle, "leg market missing from graph");
        return false;
    }

    let mut alignment = OracleAlignment::Aligned;
    for i in 0..sources.len() {
        for j in (i + 1)..sources.len() {
            alignment = worst(alignment, authorities.classify(sources[i], sources[j]));
        }
    }
    opp.set_oracle_alignment(alignment);

    if alignment == OracleAlignment::Misaligned {
        opp.record_rejection(ValidationLayer::RuleOracle, "resolution sources misaligned");
        return false;
    }

    opp.record_pass(ValidationLayer::RuleOracle);
    true
}
