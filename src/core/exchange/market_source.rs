//! Market Source: the venue adapter responsible for paging the market
//! catalog and fetching individual order books.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::app::config::PolymarketConfig;
use crate::core::domain::{Market, OrderBook, PriceLevel, TokenId};
use crate::error::Result;

use super::cache::{NullSnapshotCache, SnapshotCache, SnapshotKey};
use super::convert::market_from_gamma;
use super::dto::{ClobBookResponse, GammaMarketsResponse};
use super::ratelimit::RateLimiter;
use super::retry::RetryPolicy;

const PAGE_SIZE: usize = 100;

/// Abstraction over a prediction-market venue, so strategies and tests
/// never depend on Polymarket's wire format directly.
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Lists active markets, optionally filtered by tag, up to `limit`.
    /// Malformed records are skipped and logged rather than failing the
    /// whole page (`SOURCE_FORMAT`, non-fatal).
    async fn list_markets(&self, tags: &[String], limit: usize) -> Result<Vec<Market>>;

    /// Fetches the current order book for one token. Returns
    /// `OrderBook::empty()` rather than an error when the venue's book
    /// endpoint is exhausted, per `SPEC_FULL.md` §4.1.
    async fn fetch_order_book(&self, token_id: &TokenId) -> Result<OrderBook>;
}

pub struct PolymarketSource {
    http: Client,
    config: PolymarketConfig,
    limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
    cache: Arc<dyn SnapshotCache>,
}

impl PolymarketSource {
    /// `limiter` is the process-wide token bucket (`SPEC_FULL.md` §5) —
    /// shared with the embedder and LLM clients so every outbound call,
    /// not just the venue's, counts against `rate.requests_per_second`.
    /// Snapshots are served from an in-memory `NullSnapshotCache` by
    /// default; call [`Self::with_cache`] to plug in another one.
    #[must_use]
    pub fn new(config: PolymarketConfig, limiter: Arc<RateLimiter>) -> Self {
        Self::with_cache(config, limiter, Arc::new(NullSnapshotCache))
    }

    #[must_use]
    pub fn with_cache(config: PolymarketConfig, limiter: Arc<RateLimiter>, cache: Arc<dyn SnapshotCache>) -> Self {
        let retry = RetryPolicy::new(
            config.http.retry_max_attempts,
            Duration::from_millis(config.http.retry_backoff_ms),
            Duration::from_secs(10),
        );
        Self {
            http: Client::builder()
                .timeout(Duration::from_millis(config.http.timeout_ms))
                .connect_timeout(Duration::from_millis(config.http.connect_timeout_ms))
                .build()
                .unwrap_or_default(),
            config,
            limiter,
            retry,
            cache,
        }
    }

    async fn fetch_page(&self, tag: Option<&str>, offset: usize) -> Result<GammaMarketsResponse> {
        self.limiter.acquire().await;
        let mut url = format!(
            "{}/markets?active=true&closed=false&limit={PAGE_SIZE}&offset={offset}",
            self.config.gamma_url
        );
        if let Some(tag) = tag {
            url.push_str(&format!("&tag={tag}"));
        }
        self.retry
            .run("fetch_markets_page", || async {
                Ok(self.http.get(&url).send().await?.error_for_status()?.json().await?)
            })
            .await
    }
}

#[async_trait]
impl MarketSource for PolymarketSource {
    async fn list_markets(&self, tags: &[String], limit: usize) -> Result<Vec<Market>> {
        let cache_key = SnapshotKey::new(tags);
        let ttl = Duration::from_secs(self.config.snapshot_cache_ttl_secs);
        if let Some(mut cached) = self.cache.get(&cache_key, ttl) {
            cached.truncate(limit);
            debug!(count = cached.len(), "served market snapshot from cache");
            return Ok(cached);
        }

        let mut markets = Vec::new();
        let tag_filters: Vec<Option<&str>> = if tags.is_empty() {
            vec![None]
        } else {
            tags.iter().map(|t| Some(t.as_str())).collect()
        };

        'outer: for tag in tag_filters {
            let mut offset = 0usize;
            loop {
                let page = self.fetch_page(tag, offset).await?;
                if page.data.is_empty() {
                    break;
                }
                let page_len = page.data.len();
                for raw in page.data {
                    match market_from_gamma(raw) {
                        Ok(market) => markets.push(market),
                        Err(err) => warn!(error = %err, "skipping malformed market"),
                    }
                    if markets.len() >= limit {
                        break 'outer;
                    }
                }
                if page_len < PAGE_SIZE {
                    break;
                }
                offset += PAGE_SIZE;
            }
        }

        debug!(count = markets.len(), "listed markets");
        self.cache.put(cache_key, markets.clone());
        Ok(markets)
    }

    async fn fetch_order_book(&self, token_id: &TokenId) -> Result<OrderBook> {
        self.limiter.acquire().await;
        let url = format!("{}/book?token_id={}", self.config.api_url, token_id.as_str());
        let result: Result<ClobBookResponse> = self
            .retry
            .run("fetch_order_book", || async {
                Ok(self.http.get(&url).send().await?.error_for_status()?.json().await?)
            })
            .await;

        match result {
            Ok(raw) => {
                let parse_level = |lvl: &super::dto::ClobLevel| -> Option<PriceLevel> {
                    Some(PriceLevel::new(lvl.price.parse().ok()?, lvl.size.parse().ok()?))
                };
                let bids = raw.bids.iter().filter_map(parse_level).collect();
                let asks = raw.asks.iter().filter_map(parse_level).collect();
                Ok(OrderBook::with_levels(token_id.clone(), bids, asks))
            }
            Err(err) => {
                warn!(token_id = %token_id, error = %err, "order book fetch exhausted, using empty book");
                Ok(OrderBook::empty())
            }
        }
    }
}

/// Thin wrapper bounding concurrent order-book fetches to `n_book`.
pub struct BookFetcher {
    source: Arc<dyn MarketSource>,
    semaphore: Arc<tokio::sync::Semaphore>,
}

impl BookFetcher {
    #[must_use]
    pub fn new(source: Arc<dyn MarketSource>, n_book: usize) -> Self {
        Self {
            source,
            semaphore: Arc::new(tokio::sync::Semaphore::new(n_book.max(1))),
        }
    }

    pub async fn fetch(&self, token_id: &TokenId) -> Result<OrderBook> {
        let _permit = self.semaphore.acquire().await.expect("semaphore closed");
        self.source.fetch_order_book(token_id).await
    }
}
