//! # synrank — knowledge-graph ranking engine
//!
//! The computational core of graph-based semantic ranking: a directed,
//! weighted, heterogeneous graph of word and concept ("synset") vertices
//! connected by typed relations, ranked with personalized PageRank and
//! explored with BFS / Dijkstra.
//!
//! ## Design Principles
//!
//! 1. **Caller-owned graph**: a [`KnowledgeGraph`] is an explicit value —
//!    no process-wide singleton, multiple graphs per process are fine
//! 2. **Arena storage**: vertices and edges live in dense append-only
//!    arrays addressed by [`VertexId`] / [`EdgeId`]; nothing is ever deleted
//! 3. **Algorithms are functions**: `bfs`, `dijkstra`, `pagerank_ppv` take
//!    the graph by reference; only PageRank needs `&mut` (it refreshes the
//!    out-coefficient cache lazily)
//! 4. **Dictionary owns nothing**: the word→sense feed comes in through the
//!    [`SenseInventory`] trait; its format and loading belong to the caller
//!
//! ## Quick Start
//!
//! ```rust
//! use synrank::{KnowledgeGraph, PageRankConfig, pagerank_ppv};
//!
//! # fn main() -> synrank::Result<()> {
//! let mut g = KnowledgeGraph::new();
//! let a = g.find_or_insert_synset("00001740-n");
//! let b = g.find_or_insert_synset("00002137-n");
//! let e = g.find_or_insert_edge(a, b, 1.0)?;
//! g.edge_add_reltype(e, "hypernym")?;
//!
//! // Teleport all probability mass toward `a`.
//! let mut ppv = vec![0.0; g.vertex_count()];
//! ppv[a.index()] = 1.0;
//! let result = pagerank_ppv(&mut g, &ppv, false, &PageRankConfig::default())?;
//! assert!(result.ranks[a.index()] > result.ranks[b.index()]);
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod graph;
pub mod builder;
pub mod weights;
pub mod traverse;
pub mod rank;
pub mod snapshot;
pub mod export;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Vertex, VertexId, VertexKind,
    Edge, EdgeId, RelTypeMask, RelTypeRegistry,
};

// ============================================================================
// Re-exports: Graph + construction
// ============================================================================

pub use graph::KnowledgeGraph;
pub use builder::{IngestReport, MemoryDictionary, Sense, SenseInventory};
pub use weights::CoefStatus;

// ============================================================================
// Re-exports: Algorithms
// ============================================================================

pub use traverse::{bfs, dijkstra, ShortestPathTree};
pub use rank::{pagerank_ppv, PageRankConfig, PageRankResult, PPV_SUM_TOLERANCE};

// ============================================================================
// Re-exports: Persistence
// ============================================================================

pub use snapshot::write_to_binfile;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A vertex id is out of range for this graph (bad edge endpoint,
    /// invalid traversal source). Recoverable — the caller decides.
    #[error("vertex {0} does not exist in this graph")]
    VertexNotFound(VertexId),

    /// An edge id is out of range for this graph.
    #[error("edge {0} does not exist in this graph")]
    EdgeNotFound(EdgeId),

    /// The relation-type registry is at mask capacity.
    #[error("relation-type registry full ({capacity} types), cannot register {name:?}")]
    RelTypeCapacity { name: String, capacity: usize },

    /// Dijkstra reached an edge with a negative (or non-finite) weight.
    #[error("edge {edge} has negative weight {weight}, shortest paths undefined")]
    NegativeWeight { edge: EdgeId, weight: f32 },

    /// Personalization vector length does not match the vertex count.
    #[error("personalization vector has {got} entries, graph has {expected} vertices")]
    PpvLength { got: usize, expected: usize },

    /// Personalization vector has a negative/non-finite entry or does not
    /// sum to 1 within tolerance. The core validates, never normalizes.
    #[error("personalization vector is not a probability distribution: {0}")]
    PpvMass(String),

    /// Malformed, truncated, or checksum-failing binary snapshot.
    #[error("snapshot error: {0}")]
    Snapshot(String),

    /// Snapshot was written by an incompatible format version.
    #[error("snapshot version {found} not supported (expected {expected})")]
    SnapshotVersion { found: u32, expected: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
