//! The knowledge-graph arena: vertex/edge storage, namespace indices,
//! relation-type registry, provenance, and the out-coefficient cache.

use hashbrown::HashMap;
use rand::Rng;
use smallvec::SmallVec;
use std::collections::BTreeSet;

use crate::model::{Edge, EdgeId, RelTypeRegistry, Vertex, VertexId, VertexKind};
use crate::weights::WeightCache;
use crate::{Error, Result};

/// A directed, weighted, heterogeneous graph of word and synset vertices.
///
/// Storage is an append-only arena: parallel arrays addressed by dense
/// [`VertexId`] / [`EdgeId`] indices, with a per-vertex list of outgoing
/// edge ids for traversal. Vertices and edges are only ever created —
/// the graph grows monotonically for its whole lifetime.
///
/// `KnowledgeGraph` deliberately does not implement `Clone`: copying would
/// silently duplicate the namespace indices and the coefficient cache and
/// let the copies diverge. Move it, or borrow it.
#[derive(Debug, Default)]
pub struct KnowledgeGraph {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    /// Outgoing edge ids per vertex, in insertion order.
    out: Vec<SmallVec<[EdgeId; 4]>>,
    synset_index: HashMap<String, VertexId>,
    word_index: HashMap<String, VertexId>,
    rel_types: RelTypeRegistry,
    /// Accepted provenance tags for relation-file ingestion. Sorted so
    /// snapshots are byte-deterministic.
    rel_sources: BTreeSet<String>,
    /// Free-text provenance (e.g. the command line that built the graph).
    notes: Vec<String>,
    pub(crate) coefs: WeightCache,
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Vertices
    // ========================================================================

    /// Idempotent synset insertion. Returns the existing vertex when the
    /// name is already in the synset namespace, else creates one with an
    /// empty gloss.
    pub fn find_or_insert_synset(&mut self, name: &str) -> VertexId {
        if let Some(&v) = self.synset_index.get(name) {
            return v;
        }
        let v = self.push_vertex(Vertex::new(name, VertexKind::Synset));
        self.synset_index.insert(name.to_string(), v);
        v
    }

    /// Idempotent word insertion, namespaced independently of synsets.
    pub fn find_or_insert_word(&mut self, name: &str) -> VertexId {
        if let Some(&v) = self.word_index.get(name) {
            return v;
        }
        let v = self.push_vertex(Vertex::new(name, VertexKind::Word));
        self.word_index.insert(name.to_string(), v);
        v
    }

    fn push_vertex(&mut self, vertex: Vertex) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(vertex);
        self.out.push(SmallVec::new());
        // Topology changed: out-coefficient vector is now the wrong length.
        self.coefs.invalidate();
        id
    }

    pub fn contains_vertex(&self, v: VertexId) -> bool {
        v.index() < self.vertices.len()
    }

    pub fn vertex(&self, v: VertexId) -> Option<&Vertex> {
        self.vertices.get(v.index())
    }

    pub fn vertex_name(&self, v: VertexId) -> Option<&str> {
        self.vertex(v).map(|vx| vx.name.as_str())
    }

    pub fn vertex_gloss(&self, v: VertexId) -> Option<&str> {
        self.vertex(v).map(|vx| vx.gloss.as_str())
    }

    pub fn set_vertex_gloss(&mut self, v: VertexId, gloss: impl Into<String>) -> Result<()> {
        match self.vertices.get_mut(v.index()) {
            Some(vx) => {
                vx.gloss = gloss.into();
                Ok(())
            }
            None => Err(Error::VertexNotFound(v)),
        }
    }

    pub fn vertex_is_word(&self, v: VertexId) -> bool {
        self.vertex(v).is_some_and(Vertex::is_word)
    }

    pub fn vertex_is_synset(&self, v: VertexId) -> bool {
        self.vertex(v).is_some_and(Vertex::is_synset)
    }

    /// Name lookup, synset namespace first, then words.
    pub fn vertex_by_name(&self, name: &str) -> Option<VertexId> {
        self.synset_index
            .get(name)
            .or_else(|| self.word_index.get(name))
            .copied()
    }

    /// A vertex drawn uniformly from all existing vertices, via the
    /// process-wide RNG. Sampling aid, not part of ranking correctness.
    pub fn random_vertex(&self) -> Option<VertexId> {
        if self.vertices.is_empty() {
            return None;
        }
        let i = rand::thread_rng().gen_range(0..self.vertices.len());
        Some(VertexId(i as u32))
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(|i| VertexId(i as u32))
    }

    // ========================================================================
    // Edges
    // ========================================================================

    /// Idempotent edge insertion for the ordered pair (u, v).
    ///
    /// If the edge already exists it is returned unchanged — the weight
    /// supplied at first insertion wins, later differing weights are
    /// ignored. New edges start with an empty relation mask.
    pub fn find_or_insert_edge(&mut self, u: VertexId, v: VertexId, weight: f32) -> Result<EdgeId> {
        if !self.contains_vertex(u) {
            return Err(Error::VertexNotFound(u));
        }
        if !self.contains_vertex(v) {
            return Err(Error::VertexNotFound(v));
        }
        if let Some(&e) = self.out[u.index()]
            .iter()
            .find(|&&e| self.edges[e.index()].target == v)
        {
            return Ok(e);
        }
        let e = EdgeId(self.edges.len() as u32);
        self.edges.push(Edge::new(u, v, weight));
        self.out[u.index()].push(e);
        self.coefs.invalidate();
        Ok(e)
    }

    /// Register `rel_name` (hard failure at mask capacity) and set its bit
    /// on edge `e`. Idempotent for already-set bits.
    pub fn edge_add_reltype(&mut self, e: EdgeId, rel_name: &str) -> Result<()> {
        if e.index() >= self.edges.len() {
            return Err(Error::EdgeNotFound(e));
        }
        let bit = self.rel_types.intern(rel_name)?;
        self.edges[e.index()].rtypes.set(bit);
        Ok(())
    }

    /// Decode an edge's relation mask into names, in registration order.
    pub fn edge_reltypes(&self, e: EdgeId) -> Vec<&str> {
        match self.edges.get(e.index()) {
            Some(edge) => edge
                .rtypes
                .iter()
                .filter_map(|bit| self.rel_types.name(bit))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn edge(&self, e: EdgeId) -> Option<&Edge> {
        self.edges.get(e.index())
    }

    /// Outgoing edge ids of `u`, in insertion order. Empty for an unknown
    /// vertex.
    pub fn out_edges(&self, u: VertexId) -> &[EdgeId] {
        self.out.get(u.index()).map_or(&[], |v| v.as_slice())
    }

    pub fn out_degree(&self, u: VertexId) -> usize {
        self.out_edges(u).len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).map(|i| EdgeId(i as u32))
    }

    // ========================================================================
    // Registry, sources, notes
    // ========================================================================

    pub fn rel_types(&self) -> &RelTypeRegistry {
        &self.rel_types
    }

    /// Accept a provenance tag for subsequent relation-file merges.
    pub fn add_rel_source(&mut self, tag: impl Into<String>) {
        self.rel_sources.insert(tag.into());
    }

    pub fn rel_sources(&self) -> &BTreeSet<String> {
        &self.rel_sources
    }

    pub fn add_comment(&mut self, text: impl Into<String>) {
        self.notes.push(text.into());
    }

    pub fn comments(&self) -> &[String] {
        &self.notes
    }

    // ========================================================================
    // Snapshot plumbing
    // ========================================================================

    /// Rebuild a graph from snapshot parts, reproducing dense indices in
    /// stored order. Validates endpoints and namespace uniqueness; the
    /// coefficient cache starts stale.
    pub(crate) fn from_parts(
        vertices: Vec<Vertex>,
        edges: Vec<Edge>,
        rel_types: Vec<String>,
        rel_sources: Vec<String>,
        notes: Vec<String>,
    ) -> Result<Self> {
        let mut synset_index = HashMap::new();
        let mut word_index = HashMap::new();
        for (i, vx) in vertices.iter().enumerate() {
            let id = VertexId(i as u32);
            let clash = match vx.kind {
                VertexKind::Synset => synset_index.insert(vx.name.clone(), id),
                VertexKind::Word => word_index.insert(vx.name.clone(), id),
            };
            if clash.is_some() {
                return Err(Error::Snapshot(format!(
                    "duplicate {:?} name {:?}",
                    vx.kind, vx.name
                )));
            }
        }

        let mut out: Vec<SmallVec<[EdgeId; 4]>> = vec![SmallVec::new(); vertices.len()];
        for (i, edge) in edges.iter().enumerate() {
            if edge.source.index() >= vertices.len() || edge.target.index() >= vertices.len() {
                return Err(Error::Snapshot(format!(
                    "edge {i} references vertex outside the stored range"
                )));
            }
            out[edge.source.index()].push(EdgeId(i as u32));
        }

        Ok(Self {
            vertices,
            edges,
            out,
            synset_index,
            word_index,
            rel_types: RelTypeRegistry::from_names(rel_types)?,
            rel_sources: rel_sources.into_iter().collect(),
            notes,
            coefs: WeightCache::default(),
        })
    }

    pub(crate) fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub(crate) fn edges(&self) -> &[Edge] {
        &self.edges
    }
}
