//! Tree structures for hierarchical display.

use serde::{Deserialize, Serialize};

use super::model::Node;

/// A node with its recursively attached children.
///
/// `children` is omitted from the serialized form when empty, so leaves
/// carry no `children` field at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    /// The node record itself.
    #[serde(flatten)]
    pub node: Node,
    /// Child nodes in sibling order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Wrap a node as a leaf.
    pub fn leaf(node: Node) -> Self {
        Self {
            node,
            children: Vec::new(),
        }
    }

    /// Total number of nodes in this subtree, including the root.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::count).sum::<usize>()
    }
}
