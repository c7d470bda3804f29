//! BFS reachability and Dijkstra shortest-path trees over the graph.
//!
//! Both are pure readers: they take `&KnowledgeGraph` and may run
//! concurrently with each other (the borrow checker enforces the rest of
//! the crate's no-concurrent-mutation contract).

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, VecDeque};

use crate::graph::KnowledgeGraph;
use crate::model::VertexId;
use crate::{Error, Result};

/// Breadth-first exploration from `source`, following outgoing edges only.
///
/// Returns every reachable vertex exactly once, in discovery order: a
/// vertex's discoverer always appears earlier in the output. An isolated
/// source yields `[source]`. An unknown source is a recoverable
/// [`Error::VertexNotFound`].
pub fn bfs(graph: &KnowledgeGraph, source: VertexId) -> Result<Vec<VertexId>> {
    if !graph.contains_vertex(source) {
        return Err(Error::VertexNotFound(source));
    }

    let mut visited = vec![false; graph.vertex_count()];
    let mut order = Vec::new();
    let mut queue = VecDeque::new();

    visited[source.index()] = true;
    queue.push_back(source);

    while let Some(u) = queue.pop_front() {
        order.push(u);
        for &e in graph.out_edges(u) {
            // out_edges only yields ids we inserted; the arena has them
            let Some(edge) = graph.edge(e) else { continue };
            let v = edge.target;
            if !visited[v.index()] {
                visited[v.index()] = true;
                queue.push_back(v);
            }
        }
    }

    Ok(order)
}

/// Single-source shortest paths by cumulative edge weight.
///
/// `parents[v]` is the predecessor of `v` on the shortest discovered path;
/// the source and every unreached vertex carry themselves as the sentinel
/// (`parents[v] == v`, distinguished by `distances[v]`).
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPathTree {
    pub source: VertexId,
    pub parents: Vec<VertexId>,
    /// `f64::INFINITY` where unreached.
    pub distances: Vec<f64>,
}

impl ShortestPathTree {
    pub fn is_reached(&self, v: VertexId) -> bool {
        self.distances
            .get(v.index())
            .is_some_and(|d| d.is_finite())
    }

    /// Reconstruct the source→`v` path by walking parent pointers.
    /// `None` if `v` is unknown or unreached.
    pub fn path_to(&self, v: VertexId) -> Option<Vec<VertexId>> {
        if !self.is_reached(v) {
            return None;
        }
        let mut path = vec![v];
        let mut cur = v;
        while cur != self.source {
            cur = self.parents[cur.index()];
            path.push(cur);
        }
        path.reverse();
        Some(path)
    }
}

// Total order for settled distances. Only finite nonnegative values reach
// the heap: weights are rejected during relaxation if negative or NaN.
#[derive(PartialEq, PartialOrd)]
struct Dist(f64);

impl Eq for Dist {}

impl Ord for Dist {
    fn cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap_or(Ordering::Equal)
    }
}

/// Dijkstra from `source` over outgoing edges.
///
/// Fails on an unknown source and on any *reachable* edge with a negative
/// (or NaN) weight — the nonnegativity precondition is enforced during
/// relaxation, not silently tolerated.
///
/// Tie rule, for reproducibility: heap entries order by `(distance,
/// vertex)` so equal-distance vertices settle in ascending index order,
/// and relaxation requires a strict improvement, so the earlier-settled
/// parent wins distance ties.
pub fn dijkstra(graph: &KnowledgeGraph, source: VertexId) -> Result<ShortestPathTree> {
    if !graph.contains_vertex(source) {
        return Err(Error::VertexNotFound(source));
    }

    let n = graph.vertex_count();
    let mut parents: Vec<VertexId> = (0..n).map(|i| VertexId(i as u32)).collect();
    let mut distances = vec![f64::INFINITY; n];

    // min-heap: (distance, vertex)
    let mut heap: BinaryHeap<Reverse<(Dist, VertexId)>> = BinaryHeap::new();
    distances[source.index()] = 0.0;
    heap.push(Reverse((Dist(0.0), source)));

    while let Some(Reverse((Dist(d), u))) = heap.pop() {
        // Stale entry: a shorter path to u was already settled.
        if d > distances[u.index()] {
            continue;
        }
        for &e in graph.out_edges(u) {
            let Some(edge) = graph.edge(e) else { continue };
            let w = edge.weight;
            if w.is_nan() || w < 0.0 {
                return Err(Error::NegativeWeight { edge: e, weight: w });
            }
            let v = edge.target;
            let candidate = d + f64::from(w);
            if candidate < distances[v.index()] {
                distances[v.index()] = candidate;
                parents[v.index()] = u;
                heap.push(Reverse((Dist(candidate), v)));
            }
        }
    }

    Ok(ShortestPathTree {
        source,
        parents,
        distances,
    })
}
