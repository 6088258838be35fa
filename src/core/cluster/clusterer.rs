//! Semantic Clusterer: groups markets whose questions are similar enough to
//! be worth sending to the LLM Analyzer, via Union-Find over a
//! similarity-threshold graph.

use crate::core::domain::{Cluster, ClusterId, Market, MarketId};

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[ra.max(rb)] = ra.min(rb);
        }
    }
}

/// Clusters `markets` using precomputed `embeddings` (same order, one
/// vector per market), joining any pair whose cosine similarity meets
/// `threshold`. Output clusters are ordered deterministically by their
/// lowest-sorting member id so repeated runs over the same input produce
/// the same `ClusterId` assignment.
#[must_use]
pub fn cluster(markets: &[Market], embeddings: &[Vec<f32>], threshold: f64) -> Vec<Cluster> {
    assert_eq!(markets.len(), embeddings.len(), "one embedding per market is required");

    let n = markets.len();
    let mut uf = UnionFind::new(n);

    for i in 0..n {
        for j in (i + 1)..n {
            if super::embedder::cosine_similarity(&embeddings[i], &embeddings[j]) >= threshold {
                uf.union(i, j);
            }
        }
    }

    let mut groups: std::collections::BTreeMap<usize, Vec<MarketId>> = std::collections::BTreeMap::new();
    for i in 0..n {
        let root = uf.find(i);
        groups.entry(root).or_default().push(markets[i].market_id().clone());
    }

    let mut clusters: Vec<Cluster> = groups
        .into_values()
        .filter(|members| members.len() > 1)
        .enumerate()
        .map(|(ordinal, members)| Cluster::new(ClusterId::from(format!("cluster-{ordinal:04}")), members))
        .collect();
    clusters.sort_by(|a, b| a.members().first().cmp(&b.members().first()));
    clusters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{MarketFields, Price};
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;

    fn market(id: &str) -> Market {
        Market::new(MarketFields {
            market_id: MarketId::from(id),
            condition_id: format!("0x{id}"),
            token_id_yes: crate::core::domain::TokenId::from(format!("{id}-yes")),
            token_id_no: crate::core::domain::TokenId::from(format!("{id}-no")),
            question: String::new(),
            market_description: String::new(),
            event_description: String::new(),
            event_id: crate::core::domain::EventId::from("ev"),
            event_title: String::new(),
            tags: HashSet::new(),
            yes_mid: Price::new(dec!(0.5)),
            no_mid: Price::new(dec!(0.5)),
            liquidity_usd: dec!(0),
            volume_usd: dec!(0),
            end_time: Utc::now(),
            created_at: Utc::now(),
            resolution_source: String::new(),
        })
    }

    #[test]
    fn similar_markets_cluster_together() {
        let markets = vec![market("a"), market("b"), market("c")];
        let embeddings = vec![vec![1.0, 0.0], vec![0.99, 0.01], vec![0.0, 1.0]];
        let clusters = cluster(&markets, &embeddings, 0.9);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 2);
    }

    #[test]
    fn dissimilar_markets_are_not_clustered() {
        let markets = vec![market("a"), market("b")];
        let embeddings = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        assert!(cluster(&markets, &embeddings, 0.9).is_empty());
    }

    #[test]
    fn only_pairs_meeting_threshold_merge_leaving_singletons_out() {
        let markets = vec![market("a"), market("b"), market("c")];
        let embeddings = vec![vec![1.0, 0.0, 0.0], vec![0.95, 0.31, 0.0], vec![0.0, 1.0, 0.0]];
        let clusters = cluster(&markets, &embeddings, 0.9);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 2);
    }
}
