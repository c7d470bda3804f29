//! Personalized PageRank via power iteration.

use tracing::debug;

use crate::graph::KnowledgeGraph;
use crate::weights::CoefStatus;
use crate::{Error, Result};

/// Accepted deviation of the personalization vector's mass from 1.0.
pub const PPV_SUM_TOLERANCE: f64 = 1e-6;

/// Power-iteration parameters.
#[derive(Debug, Clone)]
pub struct PageRankConfig {
    /// Damping factor `d`: probability of following an edge rather than
    /// teleporting.
    pub damping: f64,
    /// Iteration cap; reaching it without converging is a soft condition.
    pub max_iterations: usize,
    /// L1 convergence threshold on successive rank vectors.
    pub epsilon: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            max_iterations: 100,
            epsilon: 1e-9,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PageRankResult {
    /// Final rank per vertex, indexed like the arena; sums to 1 within
    /// tolerance, every entry ≥ 0.
    pub ranks: Vec<f64>,
    pub iterations: usize,
    pub converged: bool,
}

/// Personalized PageRank over the graph.
///
/// Each iteration computes
///
/// ```text
/// new[v] = (1 - d)·ppv[v] + d·( Σ_{u→v} rank[u]·transition(u, v)
///                             + dangling_mass·ppv[v] )
/// ```
///
/// where `transition` comes from the out-coefficient cache in the mode
/// selected by `use_weight` (recomputed lazily when the cache is stale or
/// in the other mode — hence `&mut`). Dangling vertices hand their entire
/// mass to the teleport distribution, so total mass stays 1.0 at every
/// iteration.
///
/// `ppv` must have one entry per vertex, all entries finite and ≥ 0,
/// summing to 1 within [`PPV_SUM_TOLERANCE`]; violations are hard errors.
/// The vector is validated, never normalized.
pub fn pagerank_ppv(
    graph: &mut KnowledgeGraph,
    ppv: &[f64],
    use_weight: bool,
    config: &PageRankConfig,
) -> Result<PageRankResult> {
    let n = graph.vertex_count();
    if n == 0 && ppv.is_empty() {
        return Ok(PageRankResult {
            ranks: Vec::new(),
            iterations: 0,
            converged: true,
        });
    }
    validate_ppv(ppv, n)?;

    let wanted = if use_weight {
        CoefStatus::Weighted
    } else {
        CoefStatus::Unweighted
    };
    if graph.coef_status() != wanted {
        graph.recompute_out_coefs(use_weight);
    }

    // Dangling = zero coefficient: no out-edges, or zero out-weight in
    // weighted mode.
    let dangling: Vec<usize> = graph
        .vertex_ids()
        .filter(|&u| graph.coefs.coef(u) == 0.0)
        .map(|u| u.index())
        .collect();

    let d = config.damping;
    let mut ranks = ppv.to_vec();
    let mut next = vec![0.0f64; n];
    let mut iterations = 0;
    let mut converged = false;

    for _ in 0..config.max_iterations {
        iterations += 1;

        let dangling_mass: f64 = dangling.iter().map(|&i| ranks[i]).sum();
        for (v, slot) in next.iter_mut().enumerate() {
            *slot = (1.0 - d) * ppv[v] + d * dangling_mass * ppv[v];
        }

        for u in graph.vertex_ids() {
            let coef = graph.coefs.coef(u);
            if coef == 0.0 {
                continue;
            }
            for &e in graph.out_edges(u) {
                let Some(edge) = graph.edge(e) else { continue };
                let transition = if use_weight {
                    f64::from(edge.weight) * coef
                } else {
                    coef
                };
                next[edge.target.index()] += d * ranks[u.index()] * transition;
            }
        }

        let diff: f64 = ranks
            .iter()
            .zip(next.iter())
            .map(|(a, b)| (a - b).abs())
            .sum();

        std::mem::swap(&mut ranks, &mut next);

        debug!(iteration = iterations, l1_delta = diff, "pagerank sweep");
        if diff < config.epsilon {
            converged = true;
            break;
        }
    }

    debug!(iterations, converged, "pagerank finished");
    Ok(PageRankResult {
        ranks,
        iterations,
        converged,
    })
}

fn validate_ppv(ppv: &[f64], n: usize) -> Result<()> {
    if ppv.len() != n {
        return Err(Error::PpvLength {
            got: ppv.len(),
            expected: n,
        });
    }
    for (i, &p) in ppv.iter().enumerate() {
        if !p.is_finite() || p < 0.0 {
            return Err(Error::PpvMass(format!("entry {i} is {p}")));
        }
    }
    let sum: f64 = ppv.iter().sum();
    if (sum - 1.0).abs() > PPV_SUM_TOLERANCE {
        return Err(Error::PpvMass(format!(
            "entries sum to {sum}, expected 1 ± {PPV_SUM_TOLERANCE}"
        )));
    }
    Ok(())
}
