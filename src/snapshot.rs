//! Versioned binary snapshot of the whole graph.
//!
//! Layout (little-endian):
//!
//! ```text
//! [magic: u32 = "SYNG"] [version: u32] [payload_len: u64] [crc32: u32] [payload]
//! ```
//!
//! The payload is the bincode encoding of [`Snapshot`]. A wrong magic,
//! a version mismatch, a truncated payload, or a CRC failure is fatal —
//! a snapshot is either loaded whole or not at all.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::graph::KnowledgeGraph;
use crate::model::{Edge, Vertex};
use crate::{Error, Result};

const MAGIC: u32 = 0x53594E47; // "SYNG"
const VERSION: u32 = 1;

/// Upper bound on the payload (256 MiB). Prevents OOM on corrupted headers.
const MAX_SNAPSHOT_SIZE: u64 = 256 * 1024 * 1024;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    /// Registry names in registration order — bit `i` of every stored
    /// edge mask refers to `rel_types[i]`.
    rel_types: Vec<String>,
    rel_sources: Vec<String>,
    notes: Vec<String>,
    /// Unix seconds at write time. Metadata only, not part of the
    /// round-trip equality contract.
    created_at: i64,
}

/// Serialize the full graph state to `path`.
pub fn write_to_binfile(graph: &KnowledgeGraph, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let snapshot = Snapshot {
        vertices: graph.vertices().to_vec(),
        edges: graph.edges().to_vec(),
        rel_types: graph.rel_types().names().to_vec(),
        rel_sources: graph.rel_sources().iter().cloned().collect(),
        notes: graph.comments().to_vec(),
        created_at: chrono::Utc::now().timestamp(),
    };
    let payload =
        bincode::serialize(&snapshot).map_err(|e| Error::Snapshot(format!("encode: {e}")))?;
    let crc = crc32fast::hash(&payload);

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&MAGIC.to_le_bytes())?;
    writer.write_all(&VERSION.to_le_bytes())?;
    writer.write_all(&(payload.len() as u64).to_le_bytes())?;
    writer.write_all(&crc.to_le_bytes())?;
    writer.write_all(&payload)?;
    writer.flush()?;

    info!(
        path = %path.display(),
        vertices = snapshot.vertices.len(),
        edges = snapshot.edges.len(),
        "snapshot written"
    );
    Ok(())
}

impl KnowledgeGraph {
    /// Load a graph from a binary snapshot, rebuilding the arena in
    /// stored order (dense indices are reproduced exactly) and both
    /// namespace indices. The coefficient cache starts stale.
    pub fn from_binfile(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);

        let magic = read_u32(&mut reader)?;
        if magic != MAGIC {
            return Err(Error::Snapshot(format!(
                "bad magic {magic:#010x}, not a synrank snapshot"
            )));
        }
        let version = read_u32(&mut reader)?;
        if version != VERSION {
            return Err(Error::SnapshotVersion {
                found: version,
                expected: VERSION,
            });
        }

        let len = read_u64(&mut reader)?;
        if len > MAX_SNAPSHOT_SIZE {
            return Err(Error::Snapshot(format!(
                "payload length {len} exceeds the {MAX_SNAPSHOT_SIZE}-byte cap"
            )));
        }
        let stored_crc = read_u32(&mut reader)?;

        let mut payload = vec![0u8; len as usize];
        reader
            .read_exact(&mut payload)
            .map_err(|e| truncated(&e, "payload"))?;
        if crc32fast::hash(&payload) != stored_crc {
            return Err(Error::Snapshot("payload checksum mismatch".to_string()));
        }

        let snapshot: Snapshot = bincode::deserialize(&payload)
            .map_err(|e| Error::Snapshot(format!("decode: {e}")))?;

        let graph = KnowledgeGraph::from_parts(
            snapshot.vertices,
            snapshot.edges,
            snapshot.rel_types,
            snapshot.rel_sources,
            snapshot.notes,
        )?;

        info!(
            path = %path.display(),
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "snapshot loaded"
        );
        Ok(graph)
    }
}

fn read_u32(reader: &mut impl Read) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader
        .read_exact(&mut buf)
        .map_err(|e| truncated(&e, "header"))?;
    Ok(u32::from_le_bytes(buf))
}

fn read_u64(reader: &mut impl Read) -> Result<u64> {
    let mut buf = [0u8; 8];
    reader
        .read_exact(&mut buf)
        .map_err(|e| truncated(&e, "header"))?;
    Ok(u64::from_le_bytes(buf))
}

fn truncated(err: &io::Error, what: &str) -> Error {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        Error::Snapshot(format!("truncated {what}"))
    } else {
        Error::Snapshot(format!("read {what}: {err}"))
    }
}
