//! Graph construction: relation-file ingestion and dictionary wiring.
//!
//! Relation files are line-oriented, best-effort: a malformed line is
//! skipped with a warning and counted, a missing file is fatal. Records
//! carry whitespace-separated `key:value` fields in any order:
//!
//! ```text
//! u:00001740-n v:00002137-n t:hypernym s:wn30 w:0.8
//! ```
//!
//! `u:` and `v:` are required; `t:` (relation type), `s:` (provenance
//! tag) and `w:` (weight, default 1.0) are optional. Blank lines and
//! `#` comments are ignored. When the graph's accepted-source set is
//! non-empty, only lines whose `s:` tag is in the set are inserted;
//! an empty set accepts everything.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use hashbrown::HashMap;
use tracing::warn;

use crate::graph::KnowledgeGraph;
use crate::Result;

/// Counts from one ingestion pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    /// Relation records inserted into the graph.
    pub relations: usize,
    /// Lines filtered out by the accepted-source set.
    pub skipped: usize,
    /// Lines skipped with a warning (missing fields, bad weight).
    pub malformed: usize,
}

struct RelationRecord {
    source_synset: String,
    target_synset: String,
    rel_type: Option<String>,
    source_tag: Option<String>,
    weight: f32,
}

fn parse_relation_line(line: &str) -> std::result::Result<RelationRecord, String> {
    let mut u = None;
    let mut v = None;
    let mut rel_type = None;
    let mut source_tag = None;
    let mut weight = 1.0f32;

    for field in line.split_whitespace() {
        let Some((key, value)) = field.split_once(':') else {
            return Err(format!("field {field:?} is not key:value"));
        };
        if value.is_empty() {
            return Err(format!("field {field:?} has an empty value"));
        }
        match key {
            "u" => u = Some(value.to_string()),
            "v" => v = Some(value.to_string()),
            "t" => rel_type = Some(value.to_string()),
            "s" => source_tag = Some(value.to_string()),
            "w" => {
                weight = value
                    .parse::<f32>()
                    .map_err(|e| format!("weight {value:?}: {e}"))?;
                if !weight.is_finite() || weight < 0.0 {
                    return Err(format!("weight {weight} is not finite and nonnegative"));
                }
            }
            other => return Err(format!("unknown field key {other:?}")),
        }
    }

    match (u, v) {
        (Some(source_synset), Some(target_synset)) => Ok(RelationRecord {
            source_synset,
            target_synset,
            rel_type,
            source_tag,
            weight,
        }),
        _ => Err("missing required u: or v: field".to_string()),
    }
}

impl KnowledgeGraph {
    /// Build a fresh graph from a relation file, inserting only records
    /// whose source tag is accepted, and recording the accepted set.
    /// A missing file is fatal.
    pub fn from_relation_file(
        path: impl AsRef<Path>,
        accepted_sources: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self> {
        let (graph, _) = Self::from_relation_file_with_report(path, accepted_sources)?;
        Ok(graph)
    }

    /// [`from_relation_file`](Self::from_relation_file), also returning
    /// the ingestion counts.
    pub fn from_relation_file_with_report(
        path: impl AsRef<Path>,
        accepted_sources: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<(Self, IngestReport)> {
        let mut graph = Self::new();
        for tag in accepted_sources {
            graph.add_rel_source(tag);
        }
        let report = graph.merge_relation_file(path)?;
        Ok((graph, report))
    }

    /// Merge relation records into the existing graph under the currently
    /// accepted source set. Existing vertices and edges are untouched.
    pub fn merge_relation_file(&mut self, path: impl AsRef<Path>) -> Result<IngestReport> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let mut report = IngestReport::default();

        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let record = match parse_relation_line(trimmed) {
                Ok(r) => r,
                Err(reason) => {
                    warn!(path = %path.display(), line = lineno + 1, %reason, "skipping malformed relation line");
                    report.malformed += 1;
                    continue;
                }
            };

            // Empty accepted set = unfiltered build; non-empty filters
            // strictly, so an untagged line is then skipped too.
            if !self.rel_sources().is_empty() {
                let accepted = record
                    .source_tag
                    .as_ref()
                    .is_some_and(|tag| self.rel_sources().contains(tag));
                if !accepted {
                    report.skipped += 1;
                    continue;
                }
            }

            let u = self.find_or_insert_synset(&record.source_synset);
            let v = self.find_or_insert_synset(&record.target_synset);
            let e = self.find_or_insert_edge(u, v, record.weight)?;
            if let Some(rel) = &record.rel_type {
                // Registry overflow is the one fatal condition here.
                self.edge_add_reltype(e, rel)?;
            }
            report.relations += 1;
        }

        Ok(report)
    }

    // ========================================================================
    // Dictionary wiring
    // ========================================================================

    /// Insert every word of `dict` and link it to its candidate synsets.
    /// Returns the number of sense links recorded.
    pub fn add_dictionary(&mut self, dict: &impl SenseInventory, with_weight: bool) -> Result<usize> {
        let mut links = 0;
        for word in dict.words() {
            links += self.add_token(dict, word, with_weight)?;
        }
        Ok(links)
    }

    /// Insert one word vertex and an edge to each of its candidate
    /// synsets. Edge weight is `1.0` unweighted, or `1 / sense_rank`
    /// weighted (the rank-1 sense gets the strongest link). Returns the
    /// number of sense links recorded — `0` for an unknown word.
    pub fn add_token(
        &mut self,
        dict: &impl SenseInventory,
        word: &str,
        with_weight: bool,
    ) -> Result<usize> {
        let senses = dict.senses(word);
        if senses.is_empty() {
            return Ok(0);
        }
        let w = self.find_or_insert_word(word);
        for sense in senses {
            let concept = self.find_or_insert_synset(&sense.synset);
            let weight = if with_weight {
                1.0 / sense.rank.max(1) as f32
            } else {
                1.0
            };
            self.find_or_insert_edge(w, concept, weight)?;
        }
        Ok(senses.len())
    }
}

// ============================================================================
// Dictionary seam
// ============================================================================

/// One candidate concept for a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sense {
    /// Synset name in the relation graph's concept namespace.
    pub synset: String,
    /// 1-based sense rank: 1 is the most frequent sense.
    pub rank: u32,
}

/// The word→sense feed. Format and loading belong to the implementor;
/// the graph only consumes (word, synset, rank) triples.
pub trait SenseInventory {
    /// All known words, in the inventory's own order.
    fn words(&self) -> Box<dyn Iterator<Item = &str> + '_>;

    /// Candidate senses for `word`; empty for an unknown word.
    fn senses(&self, word: &str) -> &[Sense];
}

/// In-memory inventory, insertion-ordered. Used by tests and embedders
/// that load their dictionary elsewhere.
#[derive(Debug, Default)]
pub struct MemoryDictionary {
    order: Vec<String>,
    entries: HashMap<String, Vec<Sense>>,
}

impl MemoryDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one (word, synset, rank) triple.
    pub fn insert(&mut self, word: impl Into<String>, synset: impl Into<String>, rank: u32) {
        let word = word.into();
        if !self.entries.contains_key(&word) {
            self.order.push(word.clone());
        }
        self.entries.entry(word).or_default().push(Sense {
            synset: synset.into(),
            rank,
        });
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl SenseInventory for MemoryDictionary {
    fn words(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.order.iter().map(String::as_str))
    }

    fn senses(&self, word: &str) -> &[Sense] {
        self.entries.get(word).map_or(&[], Vec::as_slice)
    }
}
