//! Edge (typed relation) in the relation graph.

use serde::{Deserialize, Serialize};

use super::VertexId;

/// Dense edge index into the graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

impl EdgeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bounded set of relation-type bits carried by an edge.
///
/// Bit `i` corresponds to the `i`-th name in the graph's
/// [`RelTypeRegistry`](super::RelTypeRegistry). Registering more than
/// [`RelTypeMask::CAPACITY`] distinct relation types is a hard error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelTypeMask(u64);

impl RelTypeMask {
    /// Number of distinct relation types an edge can carry.
    pub const CAPACITY: usize = u64::BITS as usize;

    pub const EMPTY: RelTypeMask = RelTypeMask(0);

    #[inline]
    pub fn set(&mut self, bit: usize) {
        debug_assert!(bit < Self::CAPACITY);
        self.0 |= 1u64 << bit;
    }

    #[inline]
    pub fn contains(&self, bit: usize) -> bool {
        bit < Self::CAPACITY && self.0 & (1u64 << bit) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Set bits in ascending (= registration) order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..Self::CAPACITY).filter(|&b| self.contains(b))
    }
}

/// A directed, weighted, typed edge.
///
/// At most one edge exists per ordered (source, target) pair;
/// multi-relations between the same pair fold into one mask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: VertexId,
    pub target: VertexId,
    /// Nonnegative; the weight supplied when the edge was first created.
    pub weight: f32,
    pub rtypes: RelTypeMask,
}

impl Edge {
    pub fn new(source: VertexId, target: VertexId, weight: f32) -> Self {
        Self {
            source,
            target,
            weight,
            rtypes: RelTypeMask::EMPTY,
        }
    }
}
