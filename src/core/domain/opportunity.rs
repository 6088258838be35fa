//! Opportunities: the candidate arbitrage plans produced by strategies and
//! carried through the Validation Engine to acceptance or rejection.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use super::id::{MarketId, OpportunityId, TokenId};
use super::market::Side;
use super::relation::RelationshipAnalysis;

/// The six detection algorithms, fixed by `SPEC_FULL.md` §4.5 — this is a
/// closed set, not an extension point for ad hoc strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Monotonicity,
    Interval,
    Exhaustive,
    Implication,
    Equivalent,
    Temporal,
}

impl Strategy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monotonicity => "MONOTONICITY",
            Self::Interval => "INTERVAL",
            Self::Exhaustive => "EXHAUSTIVE",
            Self::Implication => "IMPLICATION",
            Self::Equivalent => "EQUIVALENT",
            Self::Temporal => "TEMPORAL",
        }
    }

    pub const ALL: [Self; 6] = [
        Self::Monotonicity,
        Self::Interval,
        Self::Exhaustive,
        Self::Implication,
        Self::Equivalent,
        Self::Temporal,
    ];
}

impl Serialize for Strategy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Declares which upstream artifacts a strategy consumes, so the
/// orchestrator can compute the union once per scan instead of running
/// every enrichment stage unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredInputs {
    pub thresholds: bool,
    pub intervals: bool,
    pub clusters: bool,
    pub llm: bool,
    pub order_book: bool,
}

impl RequiredInputs {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            thresholds: false,
            intervals: false,
            clusters: false,
            llm: false,
            order_book: false,
        }
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            thresholds: self.thresholds || other.thresholds,
            intervals: self.intervals || other.intervals,
            clusters: self.clusters || other.clusters,
            llm: self.llm || other.llm,
            order_book: self.order_book || other.order_book,
        }
    }
}

/// One buy instruction within an opportunity: buy `side` of `market` up to
/// `notional_usd`.
#[derive(Debug, Clone, Serialize)]
pub struct OpportunityLeg {
    market_id: MarketId,
    token_id: TokenId,
    side: Side,
    notional_usd: Decimal,
    effective_price: Decimal,
}

impl OpportunityLeg {
    #[must_use]
    pub const fn new(market_id: MarketId, token_id: TokenId, side: Side, notional_usd: Decimal, effective_price: Decimal) -> Self {
        Self {
            market_id,
            token_id,
            side,
            notional_usd,
            effective_price,
        }
    }

    #[must_use]
    pub const fn market_id(&self) -> &MarketId {
        &self.market_id
    }

    #[must_use]
    pub const fn token_id(&self) -> &TokenId {
        &self.token_id
    }

    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub const fn notional_usd(&self) -> Decimal {
        self.notional_usd
    }

    #[must_use]
    pub const fn effective_price(&self) -> Decimal {
        self.effective_price
    }
}

/// The six ordered validation layers. Strict ordering: a layer never runs
/// on a plan already rejected by an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValidationLayer {
    Semantic = 1,
    RuleOracle = 2,
    MathExecution = 3,
    Apy = 4,
    Checklist = 5,
    Preflight = 6,
}

impl ValidationLayer {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Semantic => "SEMANTIC",
            Self::RuleOracle => "RULE_ORACLE",
            Self::MathExecution => "MATH_EXECUTION",
            Self::Apy => "APY",
            Self::Checklist => "CHECKLIST",
            Self::Preflight => "PREFLIGHT",
        }
    }
}

impl Serialize for ValidationLayer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Record of one layer's verdict, appended to `Opportunity::validation_trail`
/// regardless of pass/fail so the full audit trail survives to the report.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationRecord {
    pub layer: ValidationLayer,
    pub passed: bool,
    pub reason: Option<String>,
}

impl ValidationRecord {
    #[must_use]
    pub const fn pass(layer: ValidationLayer) -> Self {
        Self {
            layer,
            passed: true,
            reason: None,
        }
    }

    #[must_use]
    pub fn fail(layer: ValidationLayer, reason: impl Into<String>) -> Self {
        Self {
            layer,
            passed: false,
            reason: Some(reason.into()),
        }
    }
}

/// Where an opportunity sits in its lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Pending,
    Validating,
    Accepted,
    Rejected { layer: ValidationLayer, reason: String },
    /// A plan that aged past `plan_max_age_seconds` between discovery and
    /// the Pre-flight Auditor's final check.
    Stale,
}

/// Layer 2's classification of how trustworthy an opportunity's resolution
/// sources are, from a configured authority list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleAlignment {
    /// Every leg resolves from the same recognized authority.
    Aligned,
    /// Legs resolve from different, but individually recognized, authorities.
    Compatible,
    /// At least one leg's resolution source is unrecognized or in conflict.
    Misaligned,
}

impl OracleAlignment {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aligned => "ALIGNED",
            Self::Compatible => "COMPATIBLE",
            Self::Misaligned => "MISALIGNED",
        }
    }
}

impl Serialize for OracleAlignment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Layer 4's banding of an opportunity's annualized return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApyRating {
    Excellent,
    Good,
    Acceptable,
    Reject,
}

impl ApyRating {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "EXCELLENT",
            Self::Good => "GOOD",
            Self::Acceptable => "ACCEPTABLE",
            Self::Reject => "REJECT",
        }
    }
}

impl Serialize for ApyRating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A candidate arbitrage opportunity, flowing from a strategy's detection
/// through the Validation Engine to a terminal `Status`.
#[derive(Debug, Clone)]
pub struct Opportunity {
    id: OpportunityId,
    strategy: Strategy,
    legs: Vec<OpportunityLeg>,
    expected_profit_pct: Decimal,
    expected_apy: Option<Decimal>,
    discovered_at: DateTime<Utc>,
    status: Status,
    validation_trail: Vec<ValidationRecord>,
    relationship_analysis: Option<RelationshipAnalysis>,
    oracle_alignment: Option<OracleAlignment>,
    apy_rating: Option<ApyRating>,
    slippage_cost: Option<Decimal>,
    min_leg_liquidity_usd: Option<Decimal>,
    checklist: Vec<String>,
    /// Set by Validation Layer 6 when the executable plan is re-priced
    /// immediately before acceptance.
    plan_snapshot_at: Option<DateTime<Utc>>,
}

impl Opportunity {
    #[must_use]
    pub fn new(
        id: OpportunityId,
        strategy: Strategy,
        legs: Vec<OpportunityLeg>,
        expected_profit_pct: Decimal,
        discovered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            strategy,
            legs,
            expected_profit_pct,
            expected_apy: None,
            discovered_at,
            status: Status::Pending,
            validation_trail: Vec::new(),
            relationship_analysis: None,
            oracle_alignment: None,
            apy_rating: None,
            slippage_cost: None,
            min_leg_liquidity_usd: None,
            checklist: Vec::new(),
            plan_snapshot_at: None,
        }
    }

    #[must_use]
    pub fn with_relationship_analysis(mut self, analysis: RelationshipAnalysis) -> Self {
        self.relationship_analysis = Some(analysis);
        self
    }

    #[must_use]
    pub const fn relationship_analysis(&self) -> Option<&RelationshipAnalysis> {
        self.relationship_analysis.as_ref()
    }

    #[must_use]
    pub const fn id(&self) -> &OpportunityId {
        &self.id
    }

    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    #[must_use]
    pub fn legs(&self) -> &[OpportunityLeg] {
        &self.legs
    }

    #[must_use]
    pub const fn expected_profit_pct(&self) -> Decimal {
        self.expected_profit_pct
    }

    #[must_use]
    pub const fn expected_apy(&self) -> Option<Decimal> {
        self.expected_apy
    }

    pub fn set_expected_apy(&mut self, apy: Decimal) {
        self.expected_apy = Some(apy);
    }

    #[must_use]
    pub const fn discovered_at(&self) -> DateTime<Utc> {
        self.discovered_at
    }

    #[must_use]
    pub const fn status(&self) -> &Status {
        &self.status
    }

    #[must_use]
    pub fn validation_trail(&self) -> &[ValidationRecord] {
        &self.validation_trail
    }

    #[must_use]
    pub fn total_notional_usd(&self) -> Decimal {
        self.legs.iter().map(OpportunityLeg::notional_usd).sum()
    }

    /// The cost of buying one unit of every leg at its recorded
    /// `effective_price` — every strategy's legs are constructed so that
    /// exactly one side of the set pays out `guaranteed_return` regardless
    /// of outcome, so the plan's economics don't depend on `notional_usd`.
    #[must_use]
    pub fn cost(&self) -> Decimal {
        self.legs.iter().map(OpportunityLeg::effective_price).sum()
    }

    /// The worst-case payoff of the leg set: by construction, every
    /// strategy here builds a set where exactly one leg pays out exactly
    /// $1, so this is always `1`.
    #[must_use]
    pub fn guaranteed_return(&self) -> Decimal {
        Decimal::ONE
    }

    #[must_use]
    pub fn effective_profit(&self) -> Decimal {
        self.guaranteed_return() - self.cost()
    }

    #[must_use]
    pub const fn oracle_alignment(&self) -> Option<OracleAlignment> {
        self.oracle_alignment
    }

    pub fn set_oracle_alignment(&mut self, alignment: OracleAlignment) {
        self.oracle_alignment = Some(alignment);
    }

    #[must_use]
    pub const fn apy_rating(&self) -> Option<ApyRating> {
        self.apy_rating
    }

    pub fn set_apy_rating(&mut self, rating: ApyRating) {
        self.apy_rating = Some(rating);
    }

    #[must_use]
    pub const fn slippage_cost(&self) -> Option<Decimal> {
        self.slippage_cost
    }

    pub fn set_slippage_cost(&mut self, cost: Decimal) {
        self.slippage_cost = Some(cost);
    }

    #[must_use]
    pub const fn min_leg_liquidity_usd(&self) -> Option<Decimal> {
        self.min_leg_liquidity_usd
    }

    pub fn set_min_leg_liquidity_usd(&mut self, liquidity: Decimal) {
        self.min_leg_liquidity_usd = Some(liquidity);
    }

    #[must_use]
    pub fn checklist(&self) -> &[String] {
        &self.checklist
    }

    pub fn set_checklist(&mut self, checklist: Vec<String>) {
        self.checklist = checklist;
    }

    #[must_use]
    pub const fn plan_snapshot_at(&self) -> Option<DateTime<Utc>> {
        self.plan_snapshot_at
    }

    pub fn set_plan_snapshot_at(&mut self, at: DateTime<Utc>) {
        self.plan_snapshot_at = Some(at);
    }

    /// Replaces each leg's `effective_price` with a freshly quoted one, in
    /// the same order — used by the Pre-flight Auditor to re-price a plan
    /// immediately before acceptance without discarding the original leg
    /// identities.
    pub fn reprice_legs(&mut self, fresh_prices: &[Decimal]) {
        for (leg, price) in self.legs.iter_mut().zip(fresh_prices) {
            leg.effective_price = *price;
        }
    }

    /// Records a layer passing and, if it was the final layer, accepts.
    pub fn record_pass(&mut self, layer: ValidationLayer) {
        self.validation_trail.push(ValidationRecord::pass(layer));
        self.status = if layer == ValidationLayer::Preflight {
            Status::Accepted
        } else {
            Status::Validating
        };
    }

    /// Records a layer failing; rejection short-circuits all later layers.
    pub fn record_rejection(&mut self, layer: ValidationLayer, reason: impl Into<String>) {
        let reason = reason.into();
        self.validation_trail.push(ValidationRecord::fail(layer, reason.clone()));
        self.status = Status::Rejected { layer, reason };
    }

    pub fn mark_stale(&mut self) {
        self.status = Status::Stale;
    }

    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self.status, Status::Accepted)
    }
}

/// Written by hand rather than derived: the report needs `cost`,
/// `guaranteed_return` and `effective_profit`, which are computed from
/// `legs` rather than stored fields (`SPEC_FULL.md` §3, Opportunity
/// Economics).
impl Serialize for Opportunity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Opportunity", 17)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("strategy", &self.strategy)?;
        state.serialize_field("legs", &self.legs)?;
        state.serialize_field("cost", &self.cost())?;
        state.serialize_field("guaranteed_return", &self.guaranteed_return())?;
        state.serialize_field("effective_profit", &self.effective_profit())?;
        state.serialize_field("expected_profit_pct", &self.expected_profit_pct)?;
        state.serialize_field("expected_apy", &self.expected_apy)?;
        state.serialize_field("discovered_at", &self.discovered_at)?;
        state.serialize_field("status", &self.status)?;
        state.serialize_field("validation_trail", &self.validation_trail)?;
        state.serialize_field("relationship_analysis", &self.relationship_analysis)?;
        state.serialize_field("oracle_alignment", &self.oracle_alignment)?;
        state.serialize_field("apy_rating", &self.apy_rating)?;
        state.serialize_field("slippage_cost", &self.slippage_cost)?;
        state.serialize_field("min_leg_liquidity_usd", &self.min_leg_liquidity_usd)?;
        state.serialize_field("checklist", &self.checklist)?;
        state.serialize_field("plan_snapshot_at", &self.plan_snapshot_at)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn sample_opportunity() -> Opportunity {
        Opportunity::new(
            OpportunityId::new("MONOTONICITY", 1),
            Strategy::Monotonicity,
            vec![OpportunityLeg::new(
                MarketId::from("m1"),
                TokenId::from("yes-1"),
                Side::Yes,
                dec!(100),
                dec!(0.3),
            )],
            dec!(5.0),
            Utc::now(),
        )
    }

    #[test]
    fn passing_all_layers_in_order_accepts() {
        let mut opp = sample_opportunity();
        for layer in [
            ValidationLayer::Semantic,
            ValidationLayer::RuleOracle,
            ValidationLayer::MathExecution,
            ValidationLayer::Apy,
            ValidationLayer::Checklist,
            ValidationLayer::Preflight,
        ] {
            opp.record_pass(layer);
        }
        assert!(opp.is_accepted());
        assert_eq!(opp.validation_trail().len(), 6);
    }

    #[test]
    fn rejection_short_circuits_and_records_layer_and_reason() {
        let mut opp = sample_opportunity();
        opp.record_pass(ValidationLayer::Semantic);
        opp.record_rejection(ValidationLayer::RuleOracle, "direction mismatch");
        assert!(!opp.is_accepted());
        match opp.status() {
            Status::Rejected { layer, reason } => {
                assert_eq!(*layer, ValidationLayer::RuleOracle);
                assert_eq!(reason, "direction mismatch");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn required_inputs_union_combines_flags() {
        let a = RequiredInputs {
            thresholds: true,
            ..RequiredInputs::none()
        };
        let b = RequiredInputs {
            llm: true,
            ..RequiredInputs::none()
        };
        let u = a.union(b);
        assert!(u.thresholds && u.llm && !u.clusters);
    }

    #[test]
    fn total_notional_sums_legs() {
        let opp = sample_opportunity();
        assert_eq!(opp.total_notional_usd(), dec!(100));
    }

    #[test]
    fn cost_sums_effective_leg_prices_and_guaranteed_return_is_one() {
        let opp = Opportunity::new(
            OpportunityId::new("EXHAUSTIVE", 1),
            Strategy::Exhaustive,
            vec![
                OpportunityLeg::new(MarketId::from("a"), TokenId::from("a-yes"), Side::Yes, dec!(100), dec!(0.30)),
                OpportunityLeg::new(MarketId::from("b"), TokenId::from("b-yes"), Side::Yes, dec!(100), dec!(0.25)),
                OpportunityLeg::new(MarketId::from("c"), TokenId::from("c-yes"), Side::Yes, dec!(100), dec!(0.35)),
            ],
            dec!(10.0),
            Utc::now(),
        );
        assert_eq!(opp.cost(), dec!(0.90));
        assert_eq!(opp.guaranteed_return(), Decimal::ONE);
        assert_eq!(opp.effective_profit(), dec!(0.10));
    }

    #[test]
    fn reprice_legs_replaces_effective_prices_in_order() {
        let mut opp = sample_opportunity();
        opp.reprice_legs(&[dec!(0.35)]);
        assert_eq!(opp.legs()[0].effective_price(), dec!(0.35));
    }

    #[test]
    fn setters_round_trip_through_accessors() {
        let mut opp = sample_opportunity();
        opp.set_oracle_alignment(OracleAlignment::Aligned);
        opp.set_apy_rating(ApyRating::Good);
        opp.set_slippage_cost(dec!(0.002));
        opp.set_min_leg_liquidity_usd(dec!(15000));
        opp.set_checklist(vec!["logic".into(), "liquidity".into()]);
        let now = Utc::now();
        opp.set_plan_snapshot_at(now);

        assert_eq!(opp.oracle_alignment(), Some(OracleAlignment::Aligned));
        assert_eq!(opp.apy_rating(), Some(ApyRating::Good));
        assert_eq!(opp.slippage_cost(), Some(dec!(0.002)));
        assert_eq!(opp.min_leg_liquidity_usd(), Some(dec!(15000)));
        assert_eq!(opp.checklist(), &["logic".to_string(), "liquidity".to_string()]);
        assert_eq!(opp.plan_snapshot_at(), Some(now));
    }
}
