//! # Graph Model
//!
//! Clean DTOs for the word/synset relation graph.
//!
//! Design rule: this module is pure data — no I/O, no indices, no caches.
//! The arena, namespace maps, and algorithms live in the sibling modules.

pub mod vertex;
pub mod edge;
pub mod reltype;

pub use vertex::{Vertex, VertexId, VertexKind};
pub use edge::{Edge, EdgeId, RelTypeMask};
pub use reltype::RelTypeRegistry;
