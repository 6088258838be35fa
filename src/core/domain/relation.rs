//! Semantic relationship types produced by the Clusterer and LLM Analyzer.

use serde::{Serialize, Serializer};

use super::id::{ClusterId, MarketId};

/// The closed set of relationships the LLM Analyzer is allowed to report.
/// Any other label returned by the model is a parse failure, not a new
/// variant — see `SPEC_FULL.md` §4.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationType {
    Equivalent,
    Implies,
    ImpliedBy,
    Exclusive,
    Independent,
}

impl RelationType {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "EQUIVALENT" => Some(Self::Equivalent),
            "IMPLIES" => Some(Self::Implies),
            "IMPLIED_BY" => Some(Self::ImpliedBy),
            "EXCLUSIVE" => Some(Self::Exclusive),
            "INDEPENDENT" => Some(Self::Independent),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equivalent => "EQUIVALENT",
            Self::Implies => "IMPLIES",
            Self::ImpliedBy => "IMPLIED_BY",
            Self::Exclusive => "EXCLUSIVE",
            Self::Independent => "INDEPENDENT",
        }
    }
}

impl Serialize for RelationType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One pairwise judgment from the LLM Analyzer, between a `subject` market
/// and a `target` market.
#[derive(Debug, Clone, Serialize)]
pub struct RelationshipAnalysis {
    subject: MarketId,
    target: MarketId,
    relation: RelationType,
    /// Model-reported confidence in `relation`, in `[0, 1]`. Strategies gate
    /// acceptance on this against their own `tau_*` thresholds.
    confidence: f64,
    rationale: String,
    /// Caveats or boundary cases the model flagged in its own reasoning
    /// (e.g. "resolves early if delisted") — carried through to the
    /// opportunity's audit trail, never silently dropped.
    edge_cases: Vec<String>,
    /// The analyzer's own opinion on whether the two markets' resolution
    /// sources are compatible. Informational only — Layer 2 performs the
    /// authoritative classification independently (see `core::validation`).
    resolution_compatible: bool,
    /// True if a second, independent pass contradicted the first and this
    /// relation was downgraded to `Independent` as a result (see
    /// `SPEC_FULL.md` §4.4, contradiction handling).
    downgraded: bool,
}

impl RelationshipAnalysis {
    #[must_use]
    pub fn new(subject: MarketId, target: MarketId, relation: RelationType, rationale: impl Into<String>) -> Self {
        Self {
            subject,
            target,
            relation,
            confidence: 1.0,
            rationale: rationale.into(),
            edge_cases: Vec::new(),
            resolution_compatible: true,
            downgraded: false,
        }
    }

    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    #[must_use]
    pub fn with_edge_cases(mut self, edge_cases: Vec<String>) -> Self {
        self.edge_cases = edge_cases;
        self
    }

    #[must_use]
    pub fn with_resolution_compatible(mut self, compatible: bool) -> Self {
        self.resolution_compatible = compatible;
        self
    }

    #[must_use]
    pub const fn subject(&self) -> &MarketId {
        &self.subject
    }

    #[must_use]
    pub const fn target(&self) -> &MarketId {
        &self.target
    }

    #[must_use]
    pub const fn relation(&self) -> RelationType {
        self.relation
    }

    #[must_use]
    pub const fn confidence(&self) -> f64 {
        self.confidence
    }

    #[must_use]
    pub fn rationale(&self) -> &str {
        &self.rationale
    }

    #[must_use]
    pub fn edge_cases(&self) -> &[String] {
        &self.edge_cases
    }

    #[must_use]
    pub const fn resolution_compatible(&self) -> bool {
        self.resolution_compatible
    }

    #[must_use]
    pub const fn is_downgraded(&self) -> bool {
        self.downgraded
    }

    /// Consistency check failed: replace the relation with `Independent`,
    /// zero the confidence, and record why, rather than silently trusting
    /// either answer.
    #[must_use]
    pub fn downgrade(mut self, reason: impl Into<String>) -> Self {
        self.relation = RelationType::Independent;
        self.confidence = 0.0;
        self.downgraded = true;
        self.edge_cases.push(reason.into());
        self
    }
}

/// Keyword/polarity contradiction check over a single response's own
/// `reasoning` text, independent of the reverse-pass consistency check:
/// catches a model that declares `relation` but argues for something else
/// in its prose (`SPEC_FULL.md` §4.4, §8 "Analyzer contradiction
/// downgrade").
#[must_use]
pub fn reasoning_contradicts_relation(relation: RelationType, rationale: &str) -> bool {
    let lower = rationale.to_ascii_lowercase();
    let asserts = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    let asserts_exclusive = asserts(&["mutually exclusive", "cannot both", "can't both", "never both"]);
    let asserts_equivalent = asserts(&["equivalent", "always resolve the same", "identical outcome"]);
    let asserts_independent = asserts(&["unrelated", "no logical connection", "independent of"]);
    let asserts_implication = asserts(&["implies", "guarantees", "if a resolves yes"]);

    match relation {
        RelationType::Exclusive => asserts_equivalent || asserts_implication,
        RelationType::Equivalent => asserts_exclusive || asserts_independent,
        RelationType::Implies | RelationType::ImpliedBy => asserts_exclusive,
        RelationType::Independent => false,
    }
}

/// A group of markets the Semantic Clusterer judged similar enough to send
/// to the LLM Analyzer as candidates, ordered deterministically by
/// `MarketId` so downstream strategies see stable input.
#[derive(Debug, Clone)]
pub struct Cluster {
    cluster_id: ClusterId,
    members: Vec<MarketId>,
}

impl Cluster {
    #[must_use]
    pub fn new(cluster_id: ClusterId, mut members: Vec<MarketId>) -> Self {
        members.sort();
        members.dedup();
        Self { cluster_id, members }
    }

    #[must_use]
    pub const fn cluster_id(&self) -> &ClusterId {
        &self.cluster_id
    }

    #[must_use]
    pub fn members(&self) -> &[MarketId] {
        &self.members
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_type_parse_is_case_insensitive_and_rejects_unknown() {
        assert_eq!(RelationType::parse("equivalent"), Some(RelationType::Equivalent));
        assert_eq!(RelationType::parse("IMPLIED_BY"), Some(RelationType::ImpliedBy));
        assert_eq!(RelationType::parse("MAYBE"), None);
    }

    #[test]
    fn downgrade_replaces_relation_and_sets_flag() {
        let analysis = RelationshipAnalysis::new(
            MarketId::from("a"),
            MarketId::from("b"),
            RelationType::Equivalent,
            "initial",
        )
        .downgrade("second pass disagreed");
        assert_eq!(analysis.relation(), RelationType::Independent);
        assert!(analysis.is_downgraded());
        assert_eq!(analysis.confidence(), 0.0);
        assert_eq!(analysis.edge_cases(), &["second pass disagreed".to_string()]);
    }

    #[test]
    fn cluster_members_are_sorted_and_deduped() {
        let c = Cluster::new(
            ClusterId::from("c1"),
            vec![MarketId::from("b"), MarketId::from("a"), MarketId::from("a")],
        );
        assert_eq!(c.members(), &[MarketId::from("a"), MarketId::from("b")]);
    }

    #[test]
    fn reasoning_contradicting_declared_implication_is_flagged() {
        let rationale = "These two markets are mutually exclusive outcomes of the same event.";
        assert!(reasoning_contradicts_relation(RelationType::Implies, rationale));
    }

    #[test]
    fn reasoning_consistent_with_declared_relation_is_not_flagged() {
        let rationale = "If A resolves YES, B is guaranteed to resolve YES as well.";
        assert!(!reasoning_contradicts_relation(RelationType::Implies, rationale));
    }

    #[test]
    fn independent_relation_is_never_flagged_as_contradictory() {
        assert!(!reasoning_contradicts_relation(RelationType::Independent, "anything at all, mutually exclusive or not"));
    }
}
