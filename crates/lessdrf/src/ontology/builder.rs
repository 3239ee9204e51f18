//! Subclass tree construction.

use std::collections::HashSet;

use crate::error::Result;

use super::graph::OntologyNode;
use super::tree::{Placement, SubclassTree};

/// An ontology that can answer "what are the direct children of this term".
///
/// Implemented by [`super::GraphSource`] for OBO-Graphs JSON and by
/// [`super::OboOntology`] for OBO files.
pub trait SubclassSource {
    /// Label of a term, or `TermNotFound`.
    fn label(&self, id: &str) -> Result<&str>;

    /// Children one level below `id` that traversal should follow.
    fn direct_subclasses(&self, id: &str) -> Vec<OntologyNode>;
}

impl<S: SubclassSource + ?Sized> SubclassSource for &S {
    fn label(&self, id: &str) -> Result<&str> {
        (**self).label(id)
    }

    fn direct_subclasses(&self, id: &str) -> Vec<OntologyNode> {
        (**self).direct_subclasses(id)
    }
}

/// Statistics from one build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Terms whose children were queried.
    pub expanded: usize,
    /// Subtrees moved because their label turned up again elsewhere.
    pub relocations: usize,
    /// Placements refused because the label was already an ancestor.
    pub refused: usize,
}

struct Frame {
    node: super::tree::NodeId,
    pending: std::vec::IntoIter<OntologyNode>,
}

/// Builds [`SubclassTree`]s by walking a [`SubclassSource`] depth first.
pub struct SubclassTreeBuilder<S> {
    source: S,
}

impl<S: SubclassSource> SubclassTreeBuilder<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Build the tree of every descendant of `root_id`, keyed by `root_label`.
    pub fn build(&self, root_id: &str, root_label: &str) -> Result<SubclassTree> {
        self.build_with_stats(root_id, root_label).map(|(tree, _)| tree)
    }

    /// Like [`Self::build`], also reporting what the traversal did.
    ///
    /// Each term id is expanded once; a label seen again is moved under the
    /// branch that reached it last. A term whose label is already an
    /// ancestor is not placed, but its children are.
    pub fn build_with_stats(
        &self,
        root_id: &str,
        root_label: &str,
    ) -> Result<(SubclassTree, BuildStats)> {
        self.source.label(root_id)?;

        let mut tree = SubclassTree::new(root_label);
        let mut stats = BuildStats::default();
        let mut expanded: HashSet<String> = HashSet::new();
        expanded.insert(root_id.to_string());

        let mut stack = vec![Frame {
            node: tree.root(),
            pending: self.source.direct_subclasses(root_id).into_iter(),
        }];
        stats.expanded += 1;

        while let Some(frame) = stack.last_mut() {
            let parent = frame.node;
            let Some(child) = frame.pending.next() else {
                stack.pop();
                continue;
            };

            let node = match tree.attach(parent, &child.label) {
                Placement::Refused(_) => {
                    tracing::debug!(
                        term = %child.id,
                        label = %child.label,
                        parent = %tree.label(parent),
                        "label already an ancestor, not placed"
                    );
                    stats.refused += 1;
                    // A distinct term sharing an ancestor's label still has
                    // descendants; they go under the current parent.
                    if expanded.insert(child.id.clone()) {
                        stats.expanded += 1;
                        stack.push(Frame {
                            node: parent,
                            pending: self.source.direct_subclasses(&child.id).into_iter(),
                        });
                    }
                    continue;
                }
                Placement::Relocated { node, from } => {
                    tracing::debug!(
                        label = %child.label,
                        from = %tree.label(from),
                        to = %tree.label(parent),
                        "relocated subtree"
                    );
                    stats.relocations += 1;
                    node
                }
                Placement::Inserted(node) | Placement::Unchanged(node) => node,
            };

            if expanded.insert(child.id.clone()) {
                stats.expanded += 1;
                stack.push(Frame {
                    node,
                    pending: self.source.direct_subclasses(&child.id).into_iter(),
                });
            }
        }

        tracing::debug!(
            root = root_id,
            labels = tree.len(),
            relocations = stats.relocations,
            "built subclass tree"
        );
        Ok((tree, stats))
    }

    /// Build one tree per root, continuing past roots that are not found.
    pub fn build_many<'r>(
        &self,
        roots: &'r [(&'r str, &'r str)],
    ) -> Vec<(&'r str, Result<SubclassTree>)> {
        roots
            .iter()
            .map(|&(id, label)| {
                let result = self.build(id, label);
                if let Err(e) = &result {
                    tracing::warn!(term = id, error = %e, "skipping root");
                }
                (id, result)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MONDO_EXCLUDED_ROOT;
    use crate::error::SdrfError;
    use crate::ontology::graph::{GraphSource, OntologyEdge, OntologyGraphIndex, TraversalRules};

    fn edge(sub: &str, obj: &str) -> OntologyEdge {
        OntologyEdge {
            subject: sub.to_string(),
            predicate: "is_a".to_string(),
            object: obj.to_string(),
        }
    }

    fn index(nodes: &[(&str, &str)], edges: Vec<OntologyEdge>) -> OntologyGraphIndex {
        OntologyGraphIndex::from_parts(
            nodes.iter().map(|(id, l)| OntologyNode::new(*id, *l)),
            edges,
        )
    }

    #[test]
    fn test_builds_nested_descendants() {
        let index = index(
            &[("r", "root"), ("a", "A"), ("b", "B"), ("c", "C")],
            vec![edge("a", "r"), edge("b", "a"), edge("c", "r")],
        );
        let rules = TraversalRules::default();
        let tree = SubclassTreeBuilder::new(GraphSource::new(&index, &rules))
            .build("r", "root")
            .unwrap();

        assert_eq!(
            tree.to_nested_json(),
            serde_json::json!({"root": {"A": {"B": {}}, "C": {}}})
        );
    }

    #[test]
    fn test_missing_root_is_not_found() {
        let index = index(&[("r", "root")], vec![]);
        let rules = TraversalRules::default();
        let builder = SubclassTreeBuilder::new(GraphSource::new(&index, &rules));

        match builder.build("missing", "missing") {
            Err(SdrfError::TermNotFound { term_id }) => assert_eq!(term_id, "missing"),
            other => panic!("expected TermNotFound, got {:?}", other.map(|t| t.len())),
        }

        let empty = builder.build("r", "root").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_convergent_paths_place_label_once() {
        // D is reachable through both B and C.
        let index = index(
            &[("r", "root"), ("b", "B"), ("c", "C"), ("d", "D"), ("e", "E")],
            vec![edge("b", "r"), edge("c", "r"), edge("d", "b"), edge("d", "c"), edge("e", "d")],
        );
        let rules = TraversalRules::default();
        let (tree, stats) = SubclassTreeBuilder::new(GraphSource::new(&index, &rules))
            .build_with_stats("r", "root")
            .unwrap();

        let d = tree.find("D").unwrap();
        assert_eq!(tree.label(tree.parent(d).unwrap()), "C");
        assert_eq!(tree.len(), 5);
        assert_eq!(stats.relocations, 1);
        // E was expanded once, under D's first placement, and moved along with it.
        assert_eq!(tree.path(tree.find("E").unwrap()), vec!["root", "C", "D", "E"]);
    }

    #[test]
    fn test_cycle_terminates_without_self_containment() {
        let index = index(
            &[("r", "root"), ("a", "A"), ("b", "B")],
            vec![edge("a", "r"), edge("b", "a"), edge("a", "b"), edge("r", "b")],
        );
        let rules = TraversalRules::default();
        let (tree, stats) = SubclassTreeBuilder::new(GraphSource::new(&index, &rules))
            .build_with_stats("r", "root")
            .unwrap();

        assert_eq!(tree.len(), 3);
        assert_eq!(stats.refused, 2);
        assert_eq!(tree.path(tree.find("B").unwrap()), vec!["root", "A", "B"]);
    }

    #[test]
    fn test_excluded_branch_skipped() {
        let index = index(
            &[("r", "disease"), (MONDO_EXCLUDED_ROOT, "huge branch"), ("x", "X")],
            vec![edge(MONDO_EXCLUDED_ROOT, "r"), edge("x", MONDO_EXCLUDED_ROOT)],
        );
        let rules = TraversalRules::default();
        let tree = SubclassTreeBuilder::new(GraphSource::new(&index, &rules))
            .build("r", "disease")
            .unwrap();
        assert!(!tree.contains("huge branch"));
        assert!(!tree.contains("X"));
    }

    #[test]
    fn test_build_many_continues_past_missing() {
        let index = index(&[("r", "root"), ("a", "A")], vec![edge("a", "r")]);
        let rules = TraversalRules::default();
        let builder = SubclassTreeBuilder::new(GraphSource::new(&index, &rules));

        let results = builder.build_many(&[("nope", "nope"), ("r", "root")]);
        assert_eq!(results.len(), 2);
        assert!(results[0].1.as_ref().unwrap_err().is_not_found());
        assert_eq!(results[1].1.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_same_label_different_ids_merge_children() {
        let index = index(
            &[("r", "root"), ("a1", "A"), ("a2", "A"), ("x", "X"), ("y", "Y")],
            vec![edge("a1", "r"), edge("a2", "r"), edge("x", "a1"), edge("y", "a2")],
        );
        let rules = TraversalRules::default();
        let tree = SubclassTreeBuilder::new(GraphSource::new(&index, &rules))
            .build("r", "root")
            .unwrap();
        let a = tree.find("A").unwrap();
        let kids: Vec<_> = tree.children(a).iter().map(|&c| tree.label(c)).collect();
        assert_eq!(kids, vec!["X", "Y"]);
    }

    #[test]
    fn test_ancestor_label_on_other_id_keeps_descendants() {
        // "t2" repeats the root's label; "leaf" is only reachable through it.
        let index = index(
            &[("t1", "tissue"), ("a", "A"), ("t2", "tissue"), ("leaf", "leaf")],
            vec![edge("a", "t1"), edge("t2", "a"), edge("leaf", "t2")],
        );
        let rules = TraversalRules::default();
        let (tree, stats) = SubclassTreeBuilder::new(GraphSource::new(&index, &rules))
            .build_with_stats("t1", "tissue")
            .unwrap();

        assert_eq!(stats.refused, 1);
        assert_eq!(tree.path(tree.find("leaf").unwrap()), vec!["tissue", "A", "leaf"]);
        assert!(tree.flatten().contains("leaf"));
    }
}
