//! Market Source: venue adapters and the wire-format conversion layer.

mod cache;
mod convert;
mod dto;
mod market_source;
mod ratelimit;
mod retry;

pub use cache::{NullSnapshotCache, SnapshotCache, SnapshotKey};
pub use market_source::{BookFetcher, MarketSource, PolymarketSource};
pub use ratelimit::RateLimiter;
pub use retry::RetryPolicy;
