//! The Market Source's snapshot-cache seam (`SPEC_FULL.md` §4.1).
//!
//! A full on-disk cache is a downstream concern — out of scope for this
//! crate — but the trait lives here so a caller can plug one in without
//! reaching into `MarketSource`'s internals. Order-book reads are never
//! routed through this trait at all: staleness there is a correctness bug,
//! not a performance knob.

use std::time::Duration;

use crate::core::domain::Market;

/// Cache key: the tag set a snapshot was fetched for, order-independent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotKey(Vec<String>);

impl SnapshotKey {
    #[must_use]
    pub fn new(tags: &[String]) -> Self {
        let mut sorted: Vec<String> = tags.to_vec();
        sorted.sort();
        Self(sorted)
    }
}

pub trait SnapshotCache: Send + Sync {
    /// Returns a cached snapshot for `key` if present and younger than `ttl`.
    fn get(&self, key: &SnapshotKey, ttl: Duration) -> Option<Vec<Market>>;

    fn put(&self, key: SnapshotKey, markets: Vec<Market>);
}

/// The default: never serves a cached snapshot. Every scan re-fetches,
/// which is always correct and is what the core ships; an on-disk
/// implementation is a downstream adapter's job.
#[derive(Debug, Default)]
pub struct NullSnapshotCache;

impl SnapshotCache for NullSnapshotCache {
    fn get(&self, _key: &SnapshotKey, _ttl: Duration) -> Option<Vec<Market>> {
        None
    }

    fn put(&self, _key: SnapshotKey, _markets: Vec<Market>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_key_is_order_independent() {
        let a = SnapshotKey::new(&["crypto".to_string(), "politics".to_string()]);
        let b = SnapshotKey::new(&["politics".to_string(), "crypto".to_string()]);
        assert_eq!(a, b);
    }

    #[test]
    fn null_cache_never_returns_a_snapshot() {
        let cache = NullSnapshotCache;
        let key = SnapshotKey::new(&[]);
        cache.put(key.clone(), Vec::new());
        assert!(cache.get(&key, Duration::from_secs(3600)).is_none());
    }
}
