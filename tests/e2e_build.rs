//! End-to-end tests for graph construction: relation-file ingestion,
//! source filtering, merging, and dictionary wiring.

use std::io::Write;

use pretty_assertions::assert_eq;
use synrank::{KnowledgeGraph, MemoryDictionary};
use tempfile::TempDir;

// ============================================================================
// Helper: write a relation file into a temp dir.
// ============================================================================

fn write_relations(dir: &TempDir, name: &str, lines: &[&str]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(f, "{line}").unwrap();
    }
    path
}

// ============================================================================
// 1. Fresh build with source filtering
// ============================================================================

#[test]
fn build_accepts_only_listed_sources() {
    let dir = TempDir::new().unwrap();
    let path = write_relations(
        &dir,
        "rels.txt",
        &[
            "# comment line",
            "",
            "u:00001740-n v:00002137-n t:hypernym s:wn30 w:1.0",
            "u:00002137-n v:00003009-n t:hypernym s:wn30 w:0.5",
            "u:00001740-n v:99999999-n t:gloss s:xwn w:0.2",
            "u:00001740-n v:00004258-n t:hypernym",
        ],
    );

    let (g, report) =
        KnowledgeGraph::from_relation_file_with_report(&path, ["wn30"]).unwrap();

    // Only the two wn30 lines land; the xwn line and the untagged line
    // are filtered by the non-empty accepted set.
    assert_eq!(report.relations, 2);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.malformed, 0);
    assert_eq!(g.vertex_count(), 3);
    assert_eq!(g.edge_count(), 2);
    assert!(g.vertex_by_name("99999999-n").is_none());
    assert!(g.rel_sources().contains("wn30"));
}

// ============================================================================
// 2. Unfiltered build (empty accepted set)
// ============================================================================

#[test]
fn empty_accepted_set_takes_every_line() {
    let dir = TempDir::new().unwrap();
    let path = write_relations(
        &dir,
        "rels.txt",
        &[
            "u:a v:b s:one",
            "u:b v:c s:two",
            "u:c v:d",
        ],
    );

    let (g, report) =
        KnowledgeGraph::from_relation_file_with_report(&path, Vec::<String>::new()).unwrap();
    assert_eq!(report.relations, 3);
    assert_eq!(report.skipped, 0);
    assert_eq!(g.vertex_count(), 4);
}

// ============================================================================
// 3. Best-effort ingestion of malformed lines
// ============================================================================

#[test]
fn malformed_lines_are_skipped_not_fatal() {
    let dir = TempDir::new().unwrap();
    let path = write_relations(
        &dir,
        "rels.txt",
        &[
            "u:a v:b w:1.0",
            "u:only-one-endpoint",
            "u:a v:c w:not-a-number",
            "u:a v:d w:-3.0",
            "u:a v:e",
        ],
    );

    let (g, report) =
        KnowledgeGraph::from_relation_file_with_report(&path, Vec::<String>::new()).unwrap();
    assert_eq!(report.relations, 2);
    assert_eq!(report.malformed, 3);
    // The partially-corrupt file still yields a usable graph.
    assert_eq!(g.edge_count(), 2);
}

#[test]
fn missing_relation_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let err = KnowledgeGraph::from_relation_file(dir.path().join("absent.txt"), ["wn30"])
        .unwrap_err();
    assert!(matches!(err, synrank::Error::Io(_)));
}

// ============================================================================
// 4. Merging into an existing graph
// ============================================================================

#[test]
fn merge_adds_without_resetting() {
    let dir = TempDir::new().unwrap();
    let base = write_relations(&dir, "base.txt", &["u:a v:b t:hypernym s:wn30"]);
    let extra = write_relations(
        &dir,
        "extra.txt",
        &["u:b v:c t:gloss s:xwn", "u:a v:b t:gloss s:xwn w:9.9"],
    );

    let mut g = KnowledgeGraph::from_relation_file(&base, ["wn30"]).unwrap();
    assert_eq!(g.edge_count(), 1);

    // Accept the second source, then merge.
    g.add_rel_source("xwn");
    let report = g.merge_relation_file(&extra).unwrap();
    assert_eq!(report.relations, 2);
    assert_eq!(g.vertex_count(), 3);
    // a→b already existed: the merge folds the new relation type into the
    // same edge and the original weight wins.
    assert_eq!(g.edge_count(), 2);
    let a = g.vertex_by_name("a").unwrap();
    let ab = g.out_edges(a)[0];
    assert_eq!(g.edge(ab).unwrap().weight, 1.0);
    assert_eq!(g.edge_reltypes(ab), vec!["hypernym", "gloss"]);
}

// ============================================================================
// 5. Dictionary wiring on top of a relation graph
// ============================================================================

#[test]
fn dictionary_links_words_into_the_concept_layer() {
    let dir = TempDir::new().unwrap();
    let path = write_relations(
        &dir,
        "rels.txt",
        &["u:bank-1-n v:institution-n t:hypernym", "u:bank-2-n v:terrain-n t:hypernym"],
    );
    let mut g = KnowledgeGraph::from_relation_file(&path, Vec::<String>::new()).unwrap();

    let mut dict = MemoryDictionary::new();
    dict.insert("bank", "bank-1-n", 1);
    dict.insert("bank", "bank-2-n", 2);
    let links = g.add_dictionary(&dict, true).unwrap();
    assert_eq!(links, 2);

    let w = g.vertex_by_name("bank").unwrap();
    assert!(g.vertex_is_word(w));
    assert_eq!(g.out_degree(w), 2);

    // Rank-1 sense carries the strongest link.
    let weights: Vec<f32> = g
        .out_edges(w)
        .iter()
        .map(|&e| g.edge(e).unwrap().weight)
        .collect();
    assert_eq!(weights, vec![1.0, 0.5]);

    // The word layer reaches the concept layer.
    let reached = synrank::bfs(&g, w).unwrap();
    let names: Vec<&str> = reached.iter().filter_map(|&v| g.vertex_name(v)).collect();
    assert!(names.contains(&"institution-n"));
    assert!(names.contains(&"terrain-n"));
}
