//! Hierarchy node entities.

pub mod model;
pub mod tree;

pub use model::{Node, NodeCategory, NodeDraft, OrderUpdate};
pub use tree::TreeNode;
