//! OBO-Graphs JSON index.
//!
//! Parses the `{"graphs": [{"nodes": [...], "edges": [...]}]}` documents
//! published for EFO, MONDO and friends into an id→label lookup and an
//! object→edges adjacency. Edges are stored unfiltered; predicate and
//! exclusion rules are applied by [`GraphSource`] during traversal.

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::compression::read_file;
use crate::config::SdrfConfig;
use crate::error::{Result, SdrfError};

use super::builder::SubclassSource;

/// A labeled ontology term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OntologyNode {
    pub id: String,
    pub label: String,
}

impl OntologyNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// A directed edge: `subject` is a child of `object` through `predicate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyEdge {
    #[serde(alias = "sub")]
    pub subject: String,
    #[serde(alias = "pred")]
    pub predicate: String,
    #[serde(alias = "obj")]
    pub object: String,
}

/// Where a loaded ontology came from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OntologySnapshot {
    /// File path or a caller-supplied description.
    pub source: String,
    /// SHA-256 of the file as stored.
    pub fingerprint: Option<String>,
    pub node_count: usize,
    pub edge_count: usize,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct GraphDocument {
    #[serde(default)]
    graphs: Vec<RawGraph>,
}

#[derive(Deserialize)]
struct RawGraph {
    #[serde(default)]
    nodes: Vec<RawNode>,
    #[serde(default)]
    edges: Vec<OntologyEdge>,
}

#[derive(Deserialize)]
struct RawNode {
    id: Option<String>,
    #[serde(alias = "label")]
    lbl: Option<String>,
}

/// Parsed ontology graph.
#[derive(Debug, Clone)]
pub struct OntologyGraphIndex {
    id_to_label: HashMap<String, String>,
    edges: Vec<OntologyEdge>,
    /// Edge positions keyed by object id.
    by_object: HashMap<String, Vec<usize>>,
    snapshot: OntologySnapshot,
}

impl OntologyGraphIndex {
    /// Build an index from nodes and edges directly.
    pub fn from_parts(
        nodes: impl IntoIterator<Item = OntologyNode>,
        edges: Vec<OntologyEdge>,
    ) -> Self {
        let id_to_label: HashMap<String, String> =
            nodes.into_iter().map(|n| (n.id, n.label)).collect();
        Self::assemble(id_to_label, edges, "in-memory".to_string(), None)
    }

    /// Parse a JSON graph document from bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let doc: GraphDocument = serde_json::from_slice(bytes)?;
        Ok(Self::from_document(doc, "in-memory".to_string(), None))
    }

    /// Parse a JSON graph document from a reader.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let doc: GraphDocument = serde_json::from_reader(reader)?;
        Ok(Self::from_document(doc, "in-memory".to_string(), None))
    }

    /// Load a JSON graph file, plain or gzipped.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = read_file(path)?;
        let doc: GraphDocument = serde_json::from_slice(&file.contents)?;
        let index = Self::from_document(doc, path.display().to_string(), Some(file.fingerprint));
        tracing::info!(
            path = %path.display(),
            nodes = index.node_count(),
            edges = index.edge_count(),
            "loaded ontology graph"
        );
        Ok(index)
    }

    fn from_document(doc: GraphDocument, source: String, fingerprint: Option<String>) -> Self {
        let mut id_to_label = HashMap::new();
        let mut edges = Vec::new();
        for graph in doc.graphs {
            for node in graph.nodes {
                if let (Some(id), Some(label)) = (node.id, node.lbl) {
                    id_to_label.insert(id, label);
                }
            }
            edges.extend(graph.edges);
        }
        Self::assemble(id_to_label, edges, source, fingerprint)
    }

    fn assemble(
        id_to_label: HashMap<String, String>,
        edges: Vec<OntologyEdge>,
        source: String,
        fingerprint: Option<String>,
    ) -> Self {
        let mut by_object: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, edge) in edges.iter().enumerate() {
            by_object.entry(edge.object.clone()).or_default().push(i);
        }
        let snapshot = OntologySnapshot {
            source,
            fingerprint,
            node_count: id_to_label.len(),
            edge_count: edges.len(),
            loaded_at: Utc::now(),
        };
        Self {
            id_to_label,
            edges,
            by_object,
            snapshot,
        }
    }

    /// Label of a term, or `TermNotFound`.
    pub fn label(&self, id: &str) -> Result<&str> {
        self.id_to_label
            .get(id)
            .map(|s| s.as_str())
            .ok_or_else(|| SdrfError::TermNotFound {
                term_id: id.to_string(),
            })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.id_to_label.contains_key(id)
    }

    /// All edges pointing at `object_id`, in document order.
    pub fn edges_to<'a>(&'a self, object_id: &str) -> impl Iterator<Item = &'a OntologyEdge> + 'a {
        self.by_object
            .get(object_id)
            .into_iter()
            .flatten()
            .map(move |&i| &self.edges[i])
    }

    pub fn edges(&self) -> &[OntologyEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.id_to_label.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn snapshot(&self) -> &OntologySnapshot {
        &self.snapshot
    }
}

/// Which edges a traversal follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalRules {
    pub accepted_predicates: HashSet<String>,
    pub excluded_ids: HashSet<String>,
}

impl TraversalRules {
    pub fn from_config(config: &SdrfConfig) -> Self {
        Self {
            accepted_predicates: config.accepted_predicates.iter().cloned().collect(),
            excluded_ids: config.excluded_term_ids.iter().cloned().collect(),
        }
    }

    /// Whether an edge contributes a child during traversal.
    pub fn follows(&self, edge: &OntologyEdge) -> bool {
        self.accepted_predicates.contains(&edge.predicate)
            && !self.excluded_ids.contains(&edge.subject)
            && !self.excluded_ids.contains(&edge.object)
    }
}

impl Default for TraversalRules {
    fn default() -> Self {
        Self::from_config(&SdrfConfig::default())
    }
}

/// A graph index viewed through a set of traversal rules.
#[derive(Debug, Clone, Copy)]
pub struct GraphSource<'a> {
    index: &'a OntologyGraphIndex,
    rules: &'a TraversalRules,
}

impl<'a> GraphSource<'a> {
    pub fn new(index: &'a OntologyGraphIndex, rules: &'a TraversalRules) -> Self {
        Self { index, rules }
    }
}

impl SubclassSource for GraphSource<'_> {
    fn label(&self, id: &str) -> Result<&str> {
        self.index.label(id)
    }

    fn direct_subclasses(&self, id: &str) -> Vec<OntologyNode> {
        self.index
            .edges_to(id)
            .filter(|edge| self.rules.follows(edge))
            .filter_map(|edge| {
                self.index
                    .label(&edge.subject)
                    .ok()
                    .map(|label| OntologyNode::new(edge.subject.clone(), label))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BFO_PART_OF, MONDO_EXCLUDED_ROOT};

    const DOC: &str = r#"{
        "graphs": [{
            "nodes": [
                {"id": "EFO:1", "lbl": "organism part", "type": "CLASS"},
                {"id": "EFO:2", "lbl": "liver"},
                {"id": "EFO:3", "lbl": "lobe of liver"},
                {"id": "EFO:4"},
                {"lbl": "orphan label"}
            ],
            "edges": [
                {"sub": "EFO:2", "pred": "is_a", "obj": "EFO:1"},
                {"sub": "EFO:3", "pred": "http://purl.obolibrary.org/obo/BFO_0000050", "obj": "EFO:2"},
                {"sub": "EFO:4", "pred": "is_a", "obj": "EFO:1"},
                {"sub": "EFO:2", "pred": "has_part", "obj": "EFO:3"}
            ]
        }]
    }"#;

    #[test]
    fn test_labels_require_id_and_label() {
        let index = OntologyGraphIndex::from_slice(DOC.as_bytes()).unwrap();
        assert_eq!(index.node_count(), 3);
        assert_eq!(index.label("EFO:2").unwrap(), "liver");
        assert!(index.label("EFO:4").unwrap_err().is_not_found());
    }

    #[test]
    fn test_edges_kept_unfiltered() {
        let index = OntologyGraphIndex::from_slice(DOC.as_bytes()).unwrap();
        assert_eq!(index.edge_count(), 4);
        assert_eq!(index.edges_to("EFO:1").count(), 2);
        assert_eq!(index.edges_to("EFO:3").next().unwrap().predicate, "has_part");
    }

    #[test]
    fn test_source_filters_predicates_and_unlabeled() {
        let index = OntologyGraphIndex::from_slice(DOC.as_bytes()).unwrap();
        let rules = TraversalRules::default();
        let source = GraphSource::new(&index, &rules);

        let children = source.direct_subclasses("EFO:1");
        assert_eq!(children, vec![OntologyNode::new("EFO:2", "liver")]);

        let children = source.direct_subclasses("EFO:2");
        assert_eq!(children, vec![OntologyNode::new("EFO:3", "lobe of liver")]);

        assert!(source.direct_subclasses("EFO:3").is_empty());
    }

    #[test]
    fn test_excluded_subject_and_object() {
        let index = OntologyGraphIndex::from_parts(
            [
                OntologyNode::new("root", "disease"),
                OntologyNode::new(MONDO_EXCLUDED_ROOT, "excluded"),
                OntologyNode::new("kid", "kid"),
            ],
            vec![
                OntologyEdge {
                    subject: MONDO_EXCLUDED_ROOT.to_string(),
                    predicate: "is_a".to_string(),
                    object: "root".to_string(),
                },
                OntologyEdge {
                    subject: "kid".to_string(),
                    predicate: BFO_PART_OF.to_string(),
                    object: MONDO_EXCLUDED_ROOT.to_string(),
                },
            ],
        );
        let rules = TraversalRules::default();
        let source = GraphSource::new(&index, &rules);
        assert!(source.direct_subclasses("root").is_empty());
        assert!(source.direct_subclasses(MONDO_EXCLUDED_ROOT).is_empty());
    }

    #[test]
    fn test_long_field_names_accepted() {
        let doc = r#"{"graphs":[{"nodes":[{"id":"a","label":"A"}],
            "edges":[{"subject":"b","predicate":"is_a","object":"a"}]}]}"#;
        let index = OntologyGraphIndex::from_slice(doc.as_bytes()).unwrap();
        assert_eq!(index.label("a").unwrap(), "A");
        assert_eq!(index.edges_to("a").count(), 1);
    }

    #[test]
    fn test_snapshot_counts() {
        let index = OntologyGraphIndex::from_slice(DOC.as_bytes()).unwrap();
        let snapshot = index.snapshot();
        assert_eq!(snapshot.node_count, 3);
        assert_eq!(snapshot.edge_count, 4);
        assert!(snapshot.fingerprint.is_none());
    }
}
