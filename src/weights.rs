//! Out-degree normalization coefficients for PageRank transitions.
//!
//! The cache is kept explicit rather than recomputed per ranking call:
//! repeated rankings over a frozen graph (the common disambiguation loop —
//! one PageRank per context window) reuse one coefficient pass, and every
//! topology mutation drops the cache back to [`CoefStatus::Stale`] so a
//! stale vector can never be read.

use crate::graph::KnowledgeGraph;
use crate::model::VertexId;

/// Tri-state validity of the coefficient cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoefStatus {
    /// Never computed, or invalidated by a topology mutation.
    #[default]
    Stale,
    /// `coef(u) = 1 / out_degree(u)`.
    Unweighted,
    /// `coef(u) = 1 / Σ weight(u, *)`.
    Weighted,
}

/// Per-vertex out-degree normalization factors.
#[derive(Debug, Default)]
pub struct WeightCache {
    coefs: Vec<f64>,
    status: CoefStatus,
}

impl WeightCache {
    pub fn status(&self) -> CoefStatus {
        self.status
    }

    /// Normalization factor for `u`; `0.0` marks a dangling vertex.
    pub fn coef(&self, u: VertexId) -> f64 {
        self.coefs.get(u.index()).copied().unwrap_or(0.0)
    }

    pub(crate) fn invalidate(&mut self) {
        self.status = CoefStatus::Stale;
    }
}

impl KnowledgeGraph {
    /// (Re)compute the out-coefficient for every vertex and stamp the mode.
    ///
    /// A vertex with no outgoing edges — or, in weighted mode, with
    /// outgoing weights summing to zero — gets a coefficient of `0.0`.
    /// Its rank mass is redistributed through the teleport vector by
    /// [`pagerank_ppv`](crate::rank::pagerank_ppv), never divided here.
    pub fn recompute_out_coefs(&mut self, weighted: bool) {
        let n = self.vertex_count();
        let mut coefs = vec![0.0f64; n];
        for u in self.vertex_ids() {
            let denom: f64 = if weighted {
                self.out_edges(u)
                    .iter()
                    .map(|&e| self.edge(e).map_or(0.0, |edge| f64::from(edge.weight)))
                    .sum()
            } else {
                self.out_degree(u) as f64
            };
            if denom > 0.0 {
                coefs[u.index()] = 1.0 / denom;
            }
        }
        self.coefs.coefs = coefs;
        self.coefs.status = if weighted {
            CoefStatus::Weighted
        } else {
            CoefStatus::Unweighted
        };
    }

    pub fn coef_status(&self) -> CoefStatus {
        self.coefs.status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fan_out() -> (KnowledgeGraph, VertexId, VertexId, VertexId) {
        let mut g = KnowledgeGraph::new();
        let a = g.find_or_insert_synset("a");
        let b = g.find_or_insert_synset("b");
        let c = g.find_or_insert_synset("c");
        g.find_or_insert_edge(a, b, 3.0).unwrap();
        g.find_or_insert_edge(a, c, 1.0).unwrap();
        (g, a, b, c)
    }

    #[test]
    fn starts_stale_and_mutation_invalidates() {
        let (mut g, _, _, _) = fan_out();
        assert_eq!(g.coef_status(), CoefStatus::Stale);
        g.recompute_out_coefs(false);
        assert_eq!(g.coef_status(), CoefStatus::Unweighted);
        g.find_or_insert_synset("d");
        assert_eq!(g.coef_status(), CoefStatus::Stale);
    }

    #[test]
    fn unweighted_coef_is_inverse_out_degree() {
        let (mut g, a, b, _) = fan_out();
        g.recompute_out_coefs(false);
        assert_eq!(g.coefs.coef(a), 0.5);
        // b is dangling
        assert_eq!(g.coefs.coef(b), 0.0);
    }

    #[test]
    fn weighted_coef_is_inverse_weight_sum() {
        let (mut g, a, _, _) = fan_out();
        g.recompute_out_coefs(true);
        assert_eq!(g.coef_status(), CoefStatus::Weighted);
        assert!((g.coefs.coef(a) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn zero_weight_out_edges_count_as_dangling_in_weighted_mode() {
        let mut g = KnowledgeGraph::new();
        let a = g.find_or_insert_synset("a");
        let b = g.find_or_insert_synset("b");
        g.find_or_insert_edge(a, b, 0.0).unwrap();
        g.recompute_out_coefs(true);
        assert_eq!(g.coefs.coef(a), 0.0);
        g.recompute_out_coefs(false);
        assert_eq!(g.coefs.coef(a), 1.0);
    }
}
