//! Load-once ontology repository.
//!
//! Ontologies are registered while the repository is being set up and are
//! read-only afterwards. Subclass trees and their flat term lists are
//! memoized per `(ontology, root term)`, so one repository can sit behind an
//! `Arc` and serve every session.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::SdrfConfig;
use crate::error::{Result, SdrfError};

use super::builder::SubclassTreeBuilder;
use super::graph::{GraphSource, OntologyGraphIndex, OntologySnapshot, TraversalRules};
use super::obo::OboOntology;
use super::tree::{FlatTermList, SubclassTree};

/// A loaded ontology in either supported format.
#[derive(Debug)]
pub enum LoadedOntology {
    Graph(OntologyGraphIndex),
    Obo(OboOntology),
}

impl LoadedOntology {
    pub fn snapshot(&self) -> &OntologySnapshot {
        match self {
            LoadedOntology::Graph(index) => index.snapshot(),
            LoadedOntology::Obo(obo) => obo.snapshot(),
        }
    }
}

/// Ontology name, root id and root label.
type CacheKey = (String, String, String);

fn cache_key(ontology: &str, root_id: &str, root_label: &str) -> CacheKey {
    (ontology.to_string(), root_id.to_string(), root_label.to_string())
}

/// Shared, read-only store of parsed ontologies and derived trees.
#[derive(Debug)]
pub struct OntologyRepository {
    rules: TraversalRules,
    ontologies: HashMap<String, LoadedOntology>,
    trees: RwLock<HashMap<CacheKey, Arc<SubclassTree>>>,
    term_lists: RwLock<HashMap<CacheKey, Arc<FlatTermList>>>,
}

impl OntologyRepository {
    pub fn new(config: &SdrfConfig) -> Self {
        Self {
            rules: TraversalRules::from_config(config),
            ontologies: HashMap::new(),
            trees: RwLock::new(HashMap::new()),
            term_lists: RwLock::new(HashMap::new()),
        }
    }

    /// Load an OBO-Graphs JSON file (plain or gzipped) under `name`.
    pub fn register_graph(&mut self, name: &str, path: impl AsRef<Path>) -> Result<()> {
        if self.is_registered(name) {
            return Ok(());
        }
        let index = OntologyGraphIndex::load(path)?;
        self.insert(name, LoadedOntology::Graph(index));
        Ok(())
    }

    /// Load an OBO file (plain or gzipped) under `name`.
    pub fn register_obo(&mut self, name: &str, path: impl AsRef<Path>) -> Result<()> {
        if self.is_registered(name) {
            return Ok(());
        }
        let obo = OboOntology::load(path)?;
        self.insert(name, LoadedOntology::Obo(obo));
        Ok(())
    }

    /// Register an already parsed ontology.
    pub fn insert(&mut self, name: &str, ontology: LoadedOntology) {
        self.ontologies.insert(name.to_string(), ontology);
    }

    fn is_registered(&self, name: &str) -> bool {
        let known = self.ontologies.contains_key(name);
        if known {
            tracing::debug!(ontology = name, "already loaded, reusing");
        }
        known
    }

    pub fn ontology(&self, name: &str) -> Result<&LoadedOntology> {
        self.ontologies
            .get(name)
            .ok_or_else(|| SdrfError::UnknownOntology(name.to_string()))
    }

    /// Snapshots of every registered ontology, sorted by name.
    pub fn snapshots(&self) -> Vec<(&str, &OntologySnapshot)> {
        let mut all: Vec<_> = self
            .ontologies
            .iter()
            .map(|(name, o)| (name.as_str(), o.snapshot()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(b.0));
        all
    }

    /// Subclass tree of `root_id` keyed by `root_label`, built on first request.
    pub fn subclass_tree(
        &self,
        ontology: &str,
        root_id: &str,
        root_label: &str,
    ) -> Result<Arc<SubclassTree>> {
        let key = cache_key(ontology, root_id, root_label);
        if let Some(tree) = self
            .trees
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            tracing::debug!(ontology, root = root_id, "tree cache hit");
            return Ok(Arc::clone(tree));
        }

        let tree = match self.ontology(ontology)? {
            LoadedOntology::Graph(index) => {
                SubclassTreeBuilder::new(GraphSource::new(index, &self.rules))
                    .build(root_id, root_label)?
            }
            LoadedOntology::Obo(obo) => SubclassTreeBuilder::new(obo).build(root_id, root_label)?,
        };
        let tree = Arc::new(tree);

        self.trees
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert_with(|| Arc::clone(&tree));
        Ok(tree)
    }

    /// Flat term list of `root_id`'s subclass tree.
    pub fn term_list(
        &self,
        ontology: &str,
        root_id: &str,
        root_label: &str,
    ) -> Result<Arc<FlatTermList>> {
        let key = cache_key(ontology, root_id, root_label);
        if let Some(list) = self
            .term_lists
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(list));
        }

        let list = Arc::new(self.subclass_tree(ontology, root_id, root_label)?.flatten());
        self.term_lists
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert_with(|| Arc::clone(&list));
        Ok(list)
    }

    /// Number of memoized trees.
    pub fn cached_trees(&self) -> usize {
        self.trees
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for OntologyRepository {
    fn default() -> Self {
        Self::new(&SdrfConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::graph::{OntologyEdge, OntologyNode};

    fn repository() -> OntologyRepository {
        let index = OntologyGraphIndex::from_parts(
            [
                OntologyNode::new("EFO:0000635", "organism part"),
                OntologyNode::new("UBERON:0002107", "liver"),
            ],
            vec![OntologyEdge {
                subject: "UBERON:0002107".to_string(),
                predicate: "is_a".to_string(),
                object: "EFO:0000635".to_string(),
            }],
        );
        let mut repo = OntologyRepository::default();
        repo.insert("efo", LoadedOntology::Graph(index));
        repo
    }

    #[test]
    fn test_tree_memoized() {
        let repo = repository();
        let a = repo.subclass_tree("efo", "EFO:0000635", "organism part").unwrap();
        let b = repo.subclass_tree("efo", "EFO:0000635", "organism part").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(repo.cached_trees(), 1);
    }

    #[test]
    fn test_root_label_is_part_of_cache_key() {
        let repo = repository();
        let first = repo.subclass_tree("efo", "EFO:0000635", "organism part").unwrap();
        let second = repo.subclass_tree("efo", "EFO:0000635", "tissue").unwrap();
        assert_eq!(first.root_label(), "organism part");
        assert_eq!(second.root_label(), "tissue");
        assert_eq!(second.to_ui_nodes()[0].children.as_ref().unwrap()[0].value, "tissue,liver");
        assert_eq!(repo.cached_trees(), 2);

        let list = repo.term_list("efo", "EFO:0000635", "tissue").unwrap();
        assert!(list.contains("tissue"));
        assert!(!list.contains("organism part"));
    }

    #[test]
    fn test_term_list() {
        let repo = repository();
        let list = repo.term_list("efo", "EFO:0000635", "organism part").unwrap();
        assert!(list.contains("liver"));
        assert!(list.contains("organism part"));
    }

    #[test]
    fn test_errors_not_cached() {
        let repo = repository();
        assert!(repo.subclass_tree("efo", "EFO:missing", "x").unwrap_err().is_not_found());
        assert_eq!(repo.cached_trees(), 0);
        assert!(matches!(
            repo.subclass_tree("nope", "EFO:0000635", "x"),
            Err(SdrfError::UnknownOntology(_))
        ));
    }

    #[test]
    fn test_repository_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OntologyRepository>();
    }
}
