//! The ambient application layer: owns process-wide shared state — the
//! HTTP client, the token-bucket limiter, the strategy registry and the
//! validation engine — and drives one scan end to end.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::core::cluster::{cluster, Embedder, OpenAiEmbedder};
use crate::core::domain::{
    Event, EventId, Market, MarketGraph, MarketId, Opportunity, OrderBook, RelationshipAnalysis, Strategy as StrategyKind,
    TokenId, ValidationLayer,
};
use crate::core::exchange::{BookFetcher, MarketSource, PolymarketSource, RateLimiter};
use crate::core::llm::{Analyzer, AnthropicLlm, Llm, OpenAiLlm};
use crate::core::parser::{parse_interval, parse_threshold};
use crate::core::strategy::{
    EquivalentStrategy, ExhaustiveStrategy, ImplicationStrategy, IntervalStrategy, MonotonicityStrategy,
    StrategyInput, StrategyRegistry, TemporalStrategy,
};
use crate::core::validation::ValidationEngine;
use crate::error::{Error, Result};

use super::config::{Config, LlmProvider};

/// The full result of one scan, in the exact shape a caller (the CLI, or
/// any future dashboard) serializes straight to JSON.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub scan_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub strategies_run: Vec<String>,
    pub markets_considered: usize,
    pub llm_calls_used: u32,
    pub opportunities: Vec<Opportunity>,
    pub rejections_summary: HashMap<ValidationLayer, u32>,
    pub warnings: Vec<String>,
}

fn build_events(markets: &[Market]) -> Vec<Event> {
    let mut grouped: HashMap<EventId, (String, Vec<MarketId>)> = HashMap::new();
    for market in markets {
        let entry = grouped
            .entry(market.event_id().clone())
            .or_insert_with(|| (market.event_title().to_string(), Vec::new()));
        entry.1.push(market.market_id().clone());
    }
    grouped
        .into_iter()
        .map(|(event_id, (title, market_ids))| Event::new(event_id, title, "", market_ids))
        .collect()
}

fn canonical_key(opp: &Opportunity) -> (StrategyKind, Vec<(MarketId, crate::core::domain::Side)>) {
    let mut legs: Vec<(MarketId, crate::core::domain::Side)> =
        opp.legs().iter().map(|leg| (leg.market_id().clone(), leg.side())).collect();
    legs.sort();
    (opp.strategy(), legs)
}

/// Owns everything shared across the lifetime of the process and exposes
/// one `run_scan` per invocation.
pub struct App {
    config: Config,
    source: Arc<dyn MarketSource>,
    book_fetcher: Arc<BookFetcher>,
    embedder: Option<Arc<dyn Embedder>>,
    analyzer: Option<Arc<Analyzer>>,
    registry: StrategyRegistry,
    validation: ValidationEngine,
}

impl App {
    /// Builds the process-wide shared state from `config`. API keys are
    /// read from the environment, never from `config` itself.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let limiter = Arc::new(RateLimiter::new(config.rate.requests_per_second));
        let source: Arc<dyn MarketSource> = Arc::new(PolymarketSource::new(config.polymarket.clone(), limiter.clone()));
        Self::build(config, source, limiter)
    }

    /// Builds the application with a caller-supplied [`MarketSource`]
    /// instead of the default Polymarket adapter. Used by integration tests
    /// to drive `run_scan` against a scripted catalog without any network
    /// access.
    #[must_use]
    pub fn with_source(config: Config, source: Arc<dyn MarketSource>) -> Self {
        let limiter = Arc::new(RateLimiter::new(config.rate.requests_per_second));
        Self::build(config, source, limiter)
    }

    fn build(config: Config, source: Arc<dyn MarketSource>, limiter: Arc<RateLimiter>) -> Self {
        let book_fetcher = Arc::new(BookFetcher::new(source.clone(), config.concurrency.n_book));

        let embedder: Option<Arc<dyn Embedder>> = Config::openai_api_key().map(|key| {
            Arc::new(OpenAiEmbedder::new(key, config.llm.embedding.model.clone(), limiter.clone())) as Arc<dyn Embedder>
        });

        let llm: Option<Arc<dyn Llm>> = match config.llm.provider {
            LlmProvider::Anthropic => Config::anthropic_api_key().map(|key| {
                Arc::new(AnthropicLlm::new(
                    key,
                    config.llm.anthropic.model.clone(),
                    config.llm.anthropic.max_tokens,
                    config.llm.anthropic.temperature,
                    limiter.clone(),
                )) as Arc<dyn Llm>
            }),
            LlmProvider::OpenAi => Config::openai_api_key().map(|key| {
                Arc::new(OpenAiLlm::new(
                    key,
                    config.llm.openai.model.clone(),
                    config.llm.openai.max_tokens,
                    config.llm.openai.temperature,
                    limiter.clone(),
                )) as Arc<dyn Llm>
            }),
        };
        let analyzer = llm.map(|llm| Arc::new(Analyzer::new(llm, config.scan.max_llm_calls)));

        let mut registry = StrategyRegistry::new();
        if config.strategies.monotonicity {
            registry.register(Box::new(MonotonicityStrategy::new(config.thresholds.monotonicity_min_gap)));
        }
        if config.strategies.interval {
            registry.register(Box::new(IntervalStrategy::new(config.thresholds.implication_min_gap)));
        }
        if config.strategies.exhaustive {
            registry.register(Box::new(ExhaustiveStrategy::new(config.thresholds.exhaustive_min_gap)));
        }
        if config.strategies.implication {
            registry.register(Box::new(ImplicationStrategy::new(config.thresholds.implication_min_gap)));
        }
        if config.strategies.equivalent {
            registry.register(Box::new(EquivalentStrategy::new(config.thresholds.equivalent_min_gap)));
        }
        if config.strategies.temporal {
            registry.register(Box::new(TemporalStrategy::new(config.thresholds.monotonicity_min_gap)));
        }

        let validation = ValidationEngine::new(config.scan.clone());

        Self {
            config,
            source,
            book_fetcher,
            embedder,
            analyzer,
            registry,
            validation,
        }
    }

    /// Runs exactly one scan: fetch, enrich, detect, validate, report.
    /// Cancellation is checked between every major stage and between
    /// per-candidate validations, so a canceled scan returns promptly
    /// with whatever it had already accepted.
    pub async fn run_scan(&self, cancel: CancellationToken) -> Result<ScanReport> {
        let started_at = Utc::now();
        let scan_id = uuid::Uuid::new_v4().to_string();
        let mut warnings = Vec::new();

        let markets = self.source.list_markets(&self.config.scan.tags, self.config.scan.market_limit).await?;
        let markets_considered = markets.len();
        info!(markets_considered, "fetched market catalog");
        if cancel.is_cancelled() {
            return Err(Error::Canceled);
        }

        let events = build_events(&markets);
        let graph = Arc::new(MarketGraph::build(markets.clone(), events));

        let required = self.registry.required_inputs();
        let mut input = StrategyInput {
            graph: Some(graph.clone()),
            thresholds_config: self.config.thresholds,
            time_tolerance_seconds: self.config.scan.time_tolerance_seconds,
            ..StrategyInput::default()
        };

        if required.thresholds {
            for market in &markets {
                if let Ok(info) = parse_threshold(market.question(), market.end_time()) {
                    input.thresholds.insert(market.market_id().clone(), info);
                }
            }
            debug!(count = input.thresholds.len(), "parsed thresholds");
        }

        if required.intervals {
            for market in &markets {
                if let Ok(info) = parse_interval(market.question()) {
                    input.intervals.insert(market.market_id().clone(), info);
                }
            }
            debug!(count = input.intervals.len(), "parsed intervals");
        }

        if cancel.is_cancelled() {
            return Err(Error::Canceled);
        }

        if required.clusters {
            match self.compute_clusters(&markets).await {
                Ok(clusters) => input.clusters = clusters,
                Err(err) => warnings.push(format!("clustering skipped: {err}")),
            }
            debug!(count = input.clusters.len(), "computed clusters");
        }

        if cancel.is_cancelled() {
            return Err(Error::Canceled);
        }

        if required.llm {
            self.analyze_clusters(&graph, &input.clusters, &mut input.relations, &mut warnings).await;
        }

        // EXHAUSTIVE needs a separate, per-event confirmation pass: a
        // cluster pairing isn't the same question as "do these siblings
        // partition the outcome space".
        if required.llm {
            self.verify_exhaustive_events(&graph, &mut input.exhaustive_events, &mut warnings).await;
        }

        if cancel.is_cancelled() {
            return Err(Error::Canceled);
        }

        let candidates = self.registry.detect_all(&input);
        info!(candidates = candidates.len(), "strategies emitted candidates");

        let mut seen = HashSet::new();
        let mut accepted = Vec::new();
        let mut rejections_summary: HashMap<ValidationLayer, u32> = HashMap::new();

        for mut candidate in candidates {
            if cancel.is_cancelled() {
                warnings.push("scan canceled before all candidates were validated".to_string());
                break;
            }

            let key = canonical_key(&candidate);
            if !seen.insert(key) {
                continue;
            }

            let mut books: HashMap<TokenId, OrderBook> = HashMap::new();
            for leg in candidate.legs() {
                let book = self.book_fetcher.fetch(leg.token_id()).await?;
                books.insert(leg.token_id().clone(), book);
            }

            let accepted_candidate = self.validation.validate(&mut candidate, &graph, &books, &self.book_fetcher).await;
            if accepted_candidate {
                accepted.push(candidate);
            } else if let crate::core::domain::Status::Rejected { layer, .. } = candidate.status() {
                *rejections_summary.entry(*layer).or_insert(0) += 1;
            }
        }

        let llm_calls_used = self.analyzer.as_ref().map_or(0, |a| a.calls_made());
        let strategies_run = self.registry.strategies().iter().map(|s| s.name().as_str().to_string()).collect();

        info!(accepted = accepted.len(), llm_calls_used, "scan complete");

        Ok(ScanReport {
            scan_id,
            started_at,
            finished_at: Utc::now(),
            strategies_run,
            markets_considered,
            llm_calls_used,
            opportunities: accepted,
            rejections_summary,
            warnings,
        })
    }

    /// Embeds every market's question and clusters them above
    /// `scan.similarity_threshold`. Markets that fail to embed are simply
    /// left out of clustering rather than failing the whole scan.
    async fn compute_clusters(&self, markets: &[Market]) -> Result<Vec<crate::core::domain::Cluster>> {
        let Some(embedder) = &self.embedder else {
            return Ok(Vec::new());
        };

        let batch_size = self.config.llm.embedding.batch_size.max(1);
        let mut embeddings = Vec::with_capacity(markets.len());
        for chunk in markets.chunks(batch_size) {
            let texts: Vec<String> = chunk.iter().map(|m| m.question().to_string()).collect();
            let batch = embedder.embed(&texts).await?;
            embeddings.extend(batch);
        }
        if embeddings.len() != markets.len() {
            return Err(Error::Invariant("embedder returned a different count than requested".to_string()));
        }

        Ok(cluster(markets, &embeddings, self.config.scan.similarity_threshold))
    }

    /// Sends every pair within each cluster to the LLM Analyzer, stopping
    /// early (with a warning, not a failure) once the call budget is
    /// exhausted.
    async fn analyze_clusters(
        &self,
        graph: &MarketGraph,
        clusters: &[crate::core::domain::Cluster],
        relations: &mut Vec<RelationshipAnalysis>,
        warnings: &mut Vec<String>,
    ) {
        let Some(analyzer) = &self.analyzer else {
            warnings.push("LLM analyzer not configured; EQUIVALENT/IMPLICATION candidates skipped".to_string());
            return;
        };

        'clusters: for c in clusters {
            let members = c.members();
            for i in 0..members.len() {
                for j in (i + 1)..members.len() {
                    let (Some(a), Some(b)) = (graph.market(&members[i]), graph.market(&members[j])) else {
                        continue;
                    };
                    match analyzer.analyze(a, b).await {
                        Ok(analysis) => relations.push(analysis),
                        Err(Error::AnalyzerBudgetExhausted { max_calls }) => {
                            warnings.push(format!("analyzer call budget of {max_calls} exhausted; remaining pairs skipped"));
                            break 'clusters;
                        }
                        Err(err) => warnings.push(format!("analyzer call failed: {err}")),
                    }
                }
            }
        }
    }

    /// Confirms, for each event with at least two siblings, whether the
    /// Analyzer judges the set collectively exhaustive and mutually
    /// exclusive. EXHAUSTIVE only emits for events confirmed here.
    async fn verify_exhaustive_events(&self, graph: &MarketGraph, exhaustive_events: &mut HashSet<EventId>, warnings: &mut Vec<String>) {
        let Some(analyzer) = &self.analyzer else { return };

        for event in graph.events() {
            let siblings = graph.siblings(event.event_id());
            if siblings.len() < 2 {
                continue;
            }
            let owned: Vec<Market> = siblings.into_iter().cloned().collect();
            match analyzer.verify_exhaustive_set(&owned).await {
                Ok(true) => {
                    exhaustive_events.insert(event.event_id().clone());
                }
                Ok(false) => {}
                Err(Error::AnalyzerBudgetExhausted { max_calls }) => {
                    warnings.push(format!("analyzer call budget of {max_calls} exhausted; remaining events skipped"));
                    break;
                }
                Err(err) => warnings.push(format!("exhaustive-set check failed for {}: {err}", event.event_id())),
            }
        }
    }
}
