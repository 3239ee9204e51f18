//! Subclass trees and their flat and UI-tree projections.
//!
//! A [`SubclassTree`] is an arena of labeled nodes plus a label index, so
//! every label sits at exactly one position. Re-attaching a label that is
//! already placed moves its whole subtree ([`SubclassTree::attach`]).

use std::collections::HashMap;

use indexmap::IndexSet;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{Result, SdrfError};

/// Separator between labels in a [`TreeUiNode::value`] path.
pub const PATH_SEPARATOR: &str = ",";

/// Unique labels of a tree, in preorder.
pub type FlatTermList = IndexSet<String>;

/// Position of a node inside its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct TreeNode {
    label: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Outcome of [`SubclassTree::attach`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// A new node was created.
    Inserted(NodeId),
    /// The label already sat under this parent.
    Unchanged(NodeId),
    /// The label's subtree was moved from `from` to the requested parent.
    Relocated { node: NodeId, from: NodeId },
    /// The label is the parent itself or one of its ancestors.
    Refused(NodeId),
}

impl Placement {
    /// The node now holding the label, unless the placement was refused.
    pub fn node(&self) -> Option<NodeId> {
        match *self {
            Placement::Inserted(id) | Placement::Unchanged(id) => Some(id),
            Placement::Relocated { node, .. } => Some(node),
            Placement::Refused(_) => None,
        }
    }
}

/// Nested label tree rooted at one ontology term.
#[derive(Debug, Clone)]
pub struct SubclassTree {
    nodes: Vec<TreeNode>,
    index: HashMap<String, NodeId>,
}

impl SubclassTree {
    const ROOT: NodeId = NodeId(0);

    /// Create a tree holding only its root.
    pub fn new(root_label: impl Into<String>) -> Self {
        let label = root_label.into();
        let mut index = HashMap::new();
        index.insert(label.clone(), Self::ROOT);
        Self {
            nodes: vec![TreeNode {
                label,
                parent: None,
                children: Vec::new(),
            }],
            index,
        }
    }

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    pub fn root_label(&self) -> &str {
        &self.nodes[0].label
    }

    /// Number of placed labels, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the root has no children.
    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    pub fn label(&self, node: NodeId) -> &str {
        &self.nodes[node.0].label
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn find(&self, label: &str) -> Option<NodeId> {
        self.index.get(label).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    /// Distance from the root.
    pub fn depth(&self, node: NodeId) -> usize {
        std::iter::successors(self.parent(node), |&p| self.parent(p)).count()
    }

    /// Whether `ancestor` lies on the path from the root to `node`, `node` excluded.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        std::iter::successors(self.parent(node), |&p| self.parent(p)).any(|p| p == ancestor)
    }

    /// Labels from the root down to `node`.
    pub fn path(&self, node: NodeId) -> Vec<&str> {
        let mut path: Vec<&str> = std::iter::successors(Some(node), |&n| self.parent(n))
            .map(|n| self.label(n))
            .collect();
        path.reverse();
        path
    }

    /// Place `label` under `parent`.
    ///
    /// A label already in the tree is moved together with its subtree; the
    /// old placement disappears. A label that is `parent` or one of its
    /// ancestors is refused, which keeps the structure a tree.
    pub fn attach(&mut self, parent: NodeId, label: &str) -> Placement {
        match self.find(label) {
            None => {
                let id = NodeId(self.nodes.len());
                self.nodes.push(TreeNode {
                    label: label.to_string(),
                    parent: Some(parent),
                    children: Vec::new(),
                });
                self.nodes[parent.0].children.push(id);
                self.index.insert(label.to_string(), id);
                Placement::Inserted(id)
            }
            Some(existing) if existing == parent || self.is_ancestor(existing, parent) => {
                Placement::Refused(existing)
            }
            Some(existing) => match self.parent(existing) {
                Some(current) if current == parent => Placement::Unchanged(existing),
                Some(current) => {
                    self.relocate(existing, parent);
                    Placement::Relocated {
                        node: existing,
                        from: current,
                    }
                }
                // Only the root has no parent, and the root is an ancestor of every parent.
                None => Placement::Refused(existing),
            },
        }
    }

    fn relocate(&mut self, node: NodeId, new_parent: NodeId) {
        if let Some(old) = self.nodes[node.0].parent {
            self.nodes[old.0].children.retain(|&c| c != node);
        }
        self.nodes[node.0].parent = Some(new_parent);
        self.nodes[new_parent.0].children.push(node);
    }

    /// Node ids in preorder, root first.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![Self::ROOT];
        while let Some(node) = stack.pop() {
            order.push(node);
            stack.extend(self.children(node).iter().rev());
        }
        order
    }

    /// Every label of the tree, once each.
    pub fn flatten(&self) -> FlatTermList {
        self.preorder()
            .into_iter()
            .map(|n| self.label(n).to_string())
            .collect()
    }

    /// Convert to the nested `{"root": {"child": {}}}` document.
    pub fn to_nested_json(&self) -> Value {
        let mut top = Map::new();
        top.insert(self.root_label().to_string(), self.children_json(Self::ROOT));
        Value::Object(top)
    }

    fn children_json(&self, node: NodeId) -> Value {
        let map: Map<String, Value> = self
            .children(node)
            .iter()
            .map(|&c| (self.label(c).to_string(), self.children_json(c)))
            .collect();
        Value::Object(map)
    }

    /// Rebuild a tree from a nested document with a single top-level key.
    ///
    /// String values are read as a single leaf child; `null` marks a leaf.
    pub fn from_nested_json(value: &Value) -> Result<Self> {
        let top = value.as_object().ok_or_else(|| {
            SdrfError::MalformedTree(format!("expected a mapping, found {}", json_kind(value)))
        })?;
        let mut entries = top.iter();
        let (root_label, children) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            _ => {
                return Err(SdrfError::MalformedTree(format!(
                    "expected exactly one root key, found {}",
                    top.len()
                )));
            }
        };
        let mut tree = SubclassTree::new(root_label.clone());
        tree.read_children(Self::ROOT, children)?;
        Ok(tree)
    }

    fn read_children(&mut self, parent: NodeId, value: &Value) -> Result<()> {
        match value {
            Value::Object(map) => {
                for (label, sub) in map {
                    if let Some(node) = self.attach(parent, label).node() {
                        self.read_children(node, sub)?;
                    }
                }
                Ok(())
            }
            Value::String(leaf) => {
                self.attach(parent, leaf);
                Ok(())
            }
            Value::Null => Ok(()),
            other => Err(SdrfError::MalformedTree(format!(
                "unexpected {} under '{}'",
                json_kind(other),
                self.label(parent)
            ))),
        }
    }

    /// Convert to the node list consumed by tree-select widgets.
    pub fn to_ui_nodes(&self) -> Vec<TreeUiNode> {
        vec![self.ui_node(Self::ROOT, None)]
    }

    fn ui_node(&self, node: NodeId, parent_path: Option<&str>) -> TreeUiNode {
        let label = self.label(node);
        let value = match parent_path {
            Some(p) => format!("{p}{PATH_SEPARATOR}{label}"),
            None => label.to_string(),
        };
        let children = self.children(node);
        let children = if children.is_empty() {
            None
        } else {
            Some(
                children
                    .iter()
                    .map(|&c| self.ui_node(c, Some(&value)))
                    .collect(),
            )
        };
        TreeUiNode {
            label: label.to_string(),
            value,
            children,
        }
    }
}

struct NestedChildren<'a> {
    tree: &'a SubclassTree,
    node: NodeId,
}

impl Serialize for NestedChildren<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let children = self.tree.children(self.node);
        let mut map = serializer.serialize_map(Some(children.len()))?;
        for &child in children {
            map.serialize_entry(
                self.tree.label(child),
                &NestedChildren {
                    tree: self.tree,
                    node: child,
                },
            )?;
        }
        map.end()
    }
}

/// Serializes as the nested document of [`SubclassTree::to_nested_json`].
impl Serialize for SubclassTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(
            self.root_label(),
            &NestedChildren {
                tree: self,
                node: Self::ROOT,
            },
        )?;
        map.end()
    }
}

/// One node of a tree-select widget.
///
/// `value` is the comma-joined path from the root, which keeps equal labels
/// under different parents apart. Leaves carry no `children` field at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeUiNode {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeUiNode>>,
}

impl TreeUiNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Tree-select nodes for a raw nested term document.
///
/// Unlike [`SubclassTree::to_ui_nodes`], labels are not deduplicated: the
/// same label under two parents yields two nodes told apart by their path.
/// String values become a single leaf child; `null` and empty mappings are
/// leaves.
pub fn ui_nodes_from_nested(value: &Value) -> Result<Vec<TreeUiNode>> {
    let map = value.as_object().ok_or_else(|| {
        SdrfError::MalformedTree(format!("expected a mapping, found {}", json_kind(value)))
    })?;
    ui_nodes_from_map(map, None)
}

fn ui_nodes_from_map(map: &Map<String, Value>, parent_path: Option<&str>) -> Result<Vec<TreeUiNode>> {
    map.iter()
        .map(|(label, sub)| {
            let value = match parent_path {
                Some(p) => format!("{p}{PATH_SEPARATOR}{label}"),
                None => label.clone(),
            };
            let children = match sub {
                Value::Object(m) if m.is_empty() => None,
                Value::Object(m) => Some(ui_nodes_from_map(m, Some(&value))?),
                Value::String(leaf) => Some(vec![TreeUiNode {
                    label: leaf.clone(),
                    value: format!("{value}{PATH_SEPARATOR}{leaf}"),
                    children: None,
                }]),
                Value::Null => None,
                other => {
                    return Err(SdrfError::MalformedTree(format!(
                        "unexpected {} under '{label}'",
                        json_kind(other)
                    )));
                }
            };
            Ok(TreeUiNode {
                label: label.clone(),
                value,
                children,
            })
        })
        .collect()
}

/// Recover the label from a tree path value.
pub fn leaf_label(value: &str) -> &str {
    value
        .rsplit(PATH_SEPARATOR)
        .next()
        .unwrap_or(value)
        .trim()
}

/// Map widget selections (paths or plain labels) to labels.
pub fn resolve_selection<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .map(|v| leaf_label(v.as_ref()).to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Collect every key and leaf value of a nested term document.
///
/// The document must be a mapping. Scalar leaves are included as text;
/// arrays contribute each of their elements; `null` contributes nothing.
pub fn flatten_nested(value: &Value) -> Result<FlatTermList> {
    let map = value.as_object().ok_or_else(|| {
        SdrfError::MalformedTree(format!("expected a mapping, found {}", json_kind(value)))
    })?;
    let mut terms = FlatTermList::new();
    collect_map(map, &mut terms);
    Ok(terms)
}

fn collect_map(map: &Map<String, Value>, terms: &mut FlatTermList) {
    for (key, value) in map {
        terms.insert(key.clone());
        collect_value(value, terms);
    }
}

fn collect_value(value: &Value, terms: &mut FlatTermList) {
    match value {
        Value::Object(map) => collect_map(map, terms),
        Value::Array(items) => items.iter().for_each(|v| collect_value(v, terms)),
        Value::String(s) => {
            terms.insert(s.clone());
        }
        Value::Null => {}
        other => {
            terms.insert(other.to_string());
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
