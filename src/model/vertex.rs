//! Vertex in the relation graph.

use serde::{Deserialize, Serialize};

/// Dense vertex index into the graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId(pub u32);

impl VertexId {
    /// The arena slot this id addresses.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for VertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Every vertex is exactly one of these. Word and synset names occupy
/// independent namespaces and may coincide without collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexKind {
    /// Lexical item ("word" layer), linked into the concept graph by the
    /// dictionary feed.
    Word,
    /// Concept / synset node from the relation sources.
    Synset,
}

/// A vertex in the relation graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Unique within its namespace (word names vs. synset names).
    pub name: String,
    /// Free-text gloss; empty until a source provides one.
    pub gloss: String,
    pub kind: VertexKind,
}

impl Vertex {
    pub fn new(name: impl Into<String>, kind: VertexKind) -> Self {
        Self {
            name: name.into(),
            gloss: String::new(),
            kind,
        }
    }

    pub fn is_word(&self) -> bool {
        self.kind == VertexKind::Word
    }

    pub fn is_synset(&self) -> bool {
        self.kind == VertexKind::Synset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_exclusive_and_exhaustive() {
        let w = Vertex::new("run", VertexKind::Word);
        let s = Vertex::new("run", VertexKind::Synset);
        assert!(w.is_word() && !w.is_synset());
        assert!(s.is_synset() && !s.is_word());
    }
}
