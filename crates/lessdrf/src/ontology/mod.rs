//! Ontology loading, subclass tree construction and tree projections.

mod builder;
mod graph;
mod obo;
mod repository;
mod tree;

pub use builder::{BuildStats, SubclassSource, SubclassTreeBuilder};
pub use graph::{
    GraphSource, OntologyEdge, OntologyGraphIndex, OntologyNode, OntologySnapshot, TraversalRules,
};
pub use obo::{OboOntology, OboTerm};
pub use repository::{LoadedOntology, OntologyRepository};
pub use tree::{
    flatten_nested, leaf_label, resolve_selection, ui_nodes_from_nested, FlatTermList, NodeId,
    Placement, SubclassTree, TreeUiNode, PATH_SEPARATOR,
};
