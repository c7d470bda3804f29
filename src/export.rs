//! Diagnostic text dumps and JSONL export.
//!
//! None of these formats are compatibility contracts — they exist for
//! eyeballs and ad-hoc tooling. The versioned format is the binary
//! snapshot in [`crate::snapshot`].

use std::io::Write;

use crate::graph::KnowledgeGraph;
use crate::Result;

/// Summary header: counts, registered relation types, accepted sources,
/// and notes.
pub fn display_info<W: Write>(graph: &KnowledgeGraph, writer: &mut W) -> Result<()> {
    writeln!(writer, "vertices: {}", graph.vertex_count())?;
    writeln!(writer, "edges: {}", graph.edge_count())?;
    writeln!(
        writer,
        "relation types ({}): {}",
        graph.rel_types().len(),
        graph.rel_types().names().join(", ")
    )?;
    writeln!(
        writer,
        "accepted sources: {}",
        graph
            .rel_sources()
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    )?;
    for note in graph.comments() {
        writeln!(writer, "note: {note}")?;
    }
    Ok(())
}

/// One line per vertex (kind and name), then one indented line per
/// outgoing edge with target, weight, and decoded relation types.
pub fn dump_graph<W: Write>(graph: &KnowledgeGraph, writer: &mut W) -> Result<()> {
    for u in graph.vertex_ids() {
        let Some(vertex) = graph.vertex(u) else { continue };
        let kind = if vertex.is_word() { "word" } else { "synset" };
        writeln!(writer, "{u} {kind} {}", vertex.name)?;
        for &e in graph.out_edges(u) {
            let Some(edge) = graph.edge(e) else { continue };
            let target = graph.vertex_name(edge.target).unwrap_or("?");
            let rels = graph.edge_reltypes(e).join(",");
            writeln!(writer, "  -> {} w={} [{}]", target, edge.weight, rels)?;
        }
    }
    Ok(())
}

/// One JSON object per vertex. Returns the number of lines written.
pub fn export_vertices_jsonl<W: Write>(graph: &KnowledgeGraph, writer: &mut W) -> Result<usize> {
    let mut count = 0;
    for v in graph.vertex_ids() {
        let Some(vertex) = graph.vertex(v) else { continue };
        let json = serde_json::json!({
            "id": v.0,
            "name": vertex.name,
            "gloss": vertex.gloss,
            "kind": format!("{:?}", vertex.kind),
        });
        serde_json::to_writer(&mut *writer, &json)
            .map_err(|e| crate::Error::Io(std::io::Error::other(e)))?;
        writeln!(writer)?;
        count += 1;
    }
    Ok(count)
}

/// One JSON object per edge. Returns the number of lines written.
pub fn export_edges_jsonl<W: Write>(graph: &KnowledgeGraph, writer: &mut W) -> Result<usize> {
    let mut count = 0;
    for e in graph.edge_ids() {
        let Some(edge) = graph.edge(e) else { continue };
        let json = serde_json::json!({
            "id": e.0,
            "source": edge.source.0,
            "target": edge.target.0,
            "weight": edge.weight,
            "rel_types": graph.edge_reltypes(e),
        });
        serde_json::to_writer(&mut *writer, &json)
            .map_err(|e| crate::Error::Io(std::io::Error::other(e)))?;
        writeln!(writer)?;
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_graph() -> KnowledgeGraph {
        let mut g = KnowledgeGraph::new();
        let a = g.find_or_insert_synset("a");
        let b = g.find_or_insert_synset("b");
        let e = g.find_or_insert_edge(a, b, 0.5).unwrap();
        g.edge_add_reltype(e, "hypernym").unwrap();
        g.find_or_insert_word("w");
        g.add_rel_source("wn30");
        g.add_comment("tiny");
        g
    }

    #[test]
    fn display_info_mentions_counts_and_types() {
        let g = tiny_graph();
        let mut out = Vec::new();
        display_info(&g, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("vertices: 3"));
        assert!(text.contains("edges: 1"));
        assert!(text.contains("hypernym"));
        assert!(text.contains("note: tiny"));
    }

    #[test]
    fn dump_graph_lists_every_vertex_and_edge() {
        let g = tiny_graph();
        let mut out = Vec::new();
        dump_graph(&g, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("synset a"));
        assert!(text.contains("word w"));
        assert!(text.contains("-> b w=0.5 [hypernym]"));
    }

    #[test]
    fn jsonl_exports_one_object_per_line() {
        let g = tiny_graph();
        let mut out = Vec::new();
        assert_eq!(export_vertices_jsonl(&g, &mut out).unwrap(), 3);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3);
        for line in text.lines() {
            let v: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(v.get("name").is_some());
        }

        let mut out = Vec::new();
        assert_eq!(export_edges_jsonl(&g, &mut out).unwrap(), 1);
        let v: serde_json::Value =
            serde_json::from_str(String::from_utf8(out).unwrap().trim()).unwrap();
        assert_eq!(v["rel_types"][0], "hypernym");
    }
}
