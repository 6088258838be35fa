//! Turns a pair (or small group) of market questions into a
//! [`RelationshipAnalysis`], recovering JSON from prose-wrapped model
//! output and downgrading contradictory judgments to `INDEPENDENT`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use dashmap::DashMap;
use serde::Deserialize;

use crate::core::domain::relation::reasoning_contradicts_relation;
use crate::core::domain::{Market, MarketId, RelationType, RelationshipAnalysis};
use crate::error::{Error, Result};

use super::Llm;

/// Bumped whenever the prompt or scoring rubric changes, so a stale
/// memoized entry from a prior analyzer version is never served.
const ANALYZER_VERSION: u32 = 1;

#[derive(Deserialize)]
struct RawVerdict {
    relation: String,
    rationale: String,
    #[serde(default = "default_confidence")]
    confidence: f64,
    #[serde(default)]
    edge_cases: Vec<String>,
    #[serde(default = "default_true")]
    resolution_compatible: bool,
}

fn default_confidence() -> f64 {
    0.5
}

fn default_true() -> bool {
    true
}

/// Extracts the first balanced `{...}` span from `text` and parses it. The
/// model is asked to answer in pure JSON but sometimes wraps it in prose
/// ("Here is my analysis: { ... }") — this recovers that case instead of
/// failing the whole call.
fn recover_json(text: &str) -> Result<RawVerdict> {
    if let Ok(verdict) = serde_json::from_str::<RawVerdict>(text) {
        return Ok(verdict);
    }
    let start = text.find('{').ok_or_else(|| Error::AnalyzerParseFailure(text.to_string()))?;
    let end = text.rfind('}').ok_or_else(|| Error::AnalyzerParseFailure(text.to_string()))?;
    if end < start {
        return Err(Error::AnalyzerParseFailure(text.to_string()));
    }
    serde_json::from_str(&text[start..=end]).map_err(|_| Error::AnalyzerParseFailure(text.to_string()))
}

fn prompt_for(subject: &Market, target: &Market) -> String {
    format!(
        "Two prediction-market questions:\n\
         A: {}\n\
         B: {}\n\n\
         Classify the logical relationship of A to B as exactly one of: \
         EQUIVALENT, IMPLIES, IMPLIED_BY, EXCLUSIVE, INDEPENDENT.\n\
         EQUIVALENT: A and B always resolve the same way.\n\
         IMPLIES: A resolving YES guarantees B resolves YES.\n\
         IMPLIED_BY: B resolving YES guarantees A resolves YES.\n\
         EXCLUSIVE: A and B cannot both resolve YES.\n\
         INDEPENDENT: none of the above hold with confidence.\n\n\
         Resolution rules for A: {}\n\
         Resolution rules for B: {}\n\
         Prices: A.yes = {}, B.yes = {}\n\n\
         Respond with only a JSON object: {{\"relation\": \"...\", \"rationale\": \"...\", \
         \"confidence\": 0.0-1.0, \"edge_cases\": [\"...\"], \"resolution_compatible\": true|false}}",
        subject.question(),
        target.question(),
        subject.event_description(),
        target.event_description(),
        subject.mid(crate::core::domain::Side::Yes),
        target.mid(crate::core::domain::Side::Yes),
    )
}

/// Swaps the expected relation when subject/target are reversed, for the
/// consistency check: if A IMPLIES B, asking about B relative to A should
/// answer IMPLIED_BY, not IMPLIES.
fn expected_reversed(relation: RelationType) -> RelationType {
    match relation {
        RelationType::Implies => RelationType::ImpliedBy,
        RelationType::ImpliedBy => RelationType::Implies,
        other => other,
    }
}

/// Drives the LLM Analyzer: one call per direction, with a consistency
/// check and a call budget shared across the whole scan.
///
/// `cache` is the scan's single shared-mutable structure (`SPEC_FULL.md`
/// §5): keyed by the ordered market-id pair plus `ANALYZER_VERSION`, it
/// is compute-once-insert — concurrent callers racing on the same pair
/// both run `judge`, but only the result of whichever finishes first is
/// kept, so it never blocks a reader behind a writer.
pub struct Analyzer {
    llm: Arc<dyn Llm>,
    calls_made: AtomicU32,
    max_calls: u32,
    cache: DashMap<(MarketId, MarketId, u32), RelationshipAnalysis>,
}

impl Analyzer {
    #[must_use]
    pub fn new(llm: Arc<dyn Llm>, max_calls: u32) -> Self {
        Self {
            llm,
            calls_made: AtomicU32::new(0),
            max_calls,
            cache: DashMap::new(),
        }
    }

    #[must_use]
    pub fn calls_made(&self) -> u32 {
        self.calls_made.load(Ordering::SeqCst)
    }

    fn reserve_call(&self) -> Result<()> {
        let reserved = self
            .calls_made
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| (n < self.max_calls).then_some(n + 1));
        match reserved {
            Ok(_) => Ok(()),
            Err(_) => Err(Error::AnalyzerBudgetExhausted { max_calls: self.max_calls }),
        }
    }

    async fn judge(&self, subject: &Market, target: &Market) -> Result<RelationshipAnalysis> {
        self.reserve_call()?;
        let raw = match self.llm.complete(&prompt_for(subject, target)).await {
            Ok(raw) => raw,
            Err(_) => return Ok(Self::parse_failure(subject, target, "parse_failure")),
        };
        let Ok(verdict) = recover_json(&raw) else {
            return Ok(Self::parse_failure(subject, target, "parse_failure"));
        };
        let Some(relation) = RelationType::parse(&verdict.relation) else {
            return Ok(Self::parse_failure(subject, target, format!("unknown relation: {}", verdict.relation)));
        };

        let analysis = RelationshipAnalysis::new(subject.market_id().clone(), target.market_id().clone(), relation, verdict.rationale.clone())
            .with_confidence(verdict.confidence.clamp(0.0, 1.0))
            .with_edge_cases(verdict.edge_cases)
            .with_resolution_compatible(verdict.resolution_compatible);

        // Keyword/polarity self-consistency check: a response whose own
        // prose contradicts the relation it declared is never trusted,
        // regardless of confidence.
        if reasoning_contradicts_relation(relation, &verdict.rationale) {
            return Ok(analysis.downgrade("reasoning contradicts declared relation"));
        }
        Ok(analysis)
    }

    /// `ANALYZER_PARSE_FAILURE`: downgraded to `(INDEPENDENT, 0.0)` rather
    /// than propagated as a scan-fatal error — one pair is skipped, the
    /// scan continues (`SPEC_FULL.md` §7).
    fn parse_failure(subject: &Market, target: &Market, reason: impl Into<String>) -> RelationshipAnalysis {
        RelationshipAnalysis::new(subject.market_id().clone(), target.market_id().clone(), RelationType::Independent, reason.into())
            .with_confidence(0.0)
    }

    /// Analyzes the relationship from `subject` to `target`, then runs a
    /// second pass in the reverse direction to check consistency. A
    /// contradictory second pass downgrades the result to `INDEPENDENT`
    /// rather than trusting either answer.
    pub async fn analyze(&self, subject: &Market, target: &Market) -> Result<RelationshipAnalysis> {
        let cache_key = (subject.market_id().clone(), target.market_id().clone(), ANALYZER_VERSION);
        if let Some(cached) = self.cache.get(&cache_key) {
            return Ok(cached.clone());
        }

        let forward = self.judge(subject, target).await?;
        let result = if forward.relation() == RelationType::Independent {
            forward
        } else {
            let reverse = self.judge(target, subject).await?;
            let expected = expected_reversed(forward.relation());
            if reverse.relation() != expected {
                forward.downgrade(format!(
                    "reverse pass returned {} but {} was expected for consistency",
                    reverse.relation().as_str(),
                    expected.as_str()
                ))
            } else {
                forward
            }
        };

        // Compute-once-insert: a concurrent racer may have already filled
        // this slot. Keep whichever landed first rather than overwrite.
        self.cache.entry(cache_key).or_insert_with(|| result.clone());
        Ok(result)
    }

    /// Asks whether a candidate set of sibling markets is collectively
    /// exhaustive and mutually exclusive — used by the Exhaustive strategy
    /// when rule-based interval partitioning can't settle it alone.
    pub async fn verify_exhaustive_set(&self, markets: &[Market]) -> Result<bool> {
        self.reserve_call()?;
        let questions: Vec<String> = markets.iter().map(|m| format!("- {}", m.question())).collect();
        let prompt = format!(
            "The following prediction-market questions are proposed as a collectively \
             exhaustive and mutually exclusive set (exactly one resolves YES):\n{}\n\n\
             Respond with only a JSON object: {{\"relation\": \"EQUIVALENT\" if true else \"INDEPENDENT\", \"rationale\": \"...\"}}",
            questions.join("\n")
        );
        let raw = self.llm.complete(&prompt).await?;
        let verdict = recover_json(&raw)?;
        Ok(verdict.relation.eq_ignore_ascii_case("EQUIVALENT"))
    }
}
