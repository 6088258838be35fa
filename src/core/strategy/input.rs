//! The artifacts a strategy may read, assembled once per scan by the
//! orchestrator according to the union of `required_inputs()` across
//! enabled strategies.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::app::config::ThresholdsConfig;
use crate::core::domain::{
    Cluster, EventId, IntervalInfo, MarketGraph, MarketId, OrderBook, RelationshipAnalysis, ThresholdInfo, TokenId,
};

#[derive(Default)]
pub struct StrategyInput {
    pub graph: Option<Arc<MarketGraph>>,
    pub thresholds: HashMap<MarketId, ThresholdInfo>,
    pub intervals: HashMap<MarketId, IntervalInfo>,
    pub clusters: Vec<Cluster>,
    pub relations: Vec<RelationshipAnalysis>,
    pub order_books: HashMap<TokenId, OrderBook>,
    pub thresholds_config: ThresholdsConfig,
    /// `scan.time_tolerance_seconds` — how close two end times must be to be
    /// treated as simultaneous rather than temporally ordered.
    pub time_tolerance_seconds: i64,
    /// Events the LLM Analyzer confirmed as a collectively exhaustive,
    /// mutually exclusive sibling set (`Analyzer::verify_exhaustive_set`).
    /// EXHAUSTIVE only emits for events in this set.
    pub exhaustive_events: HashSet<EventId>,
}

impl StrategyInput {
    #[must_use]
    pub fn order_book(&self, token_id: &TokenId) -> Option<&OrderBook> {
        self.order_books.get(token_id)
    }
}
