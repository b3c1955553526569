//! Node entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Whether a node is a directory or a file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "node_category", rename_all = "lowercase")]
pub enum NodeCategory {
    /// A directory; may have children.
    Directory,
    /// A file; carries a size and a blob storage key.
    File,
}

impl NodeCategory {
    /// Check if this is the directory variant.
    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory)
    }
}

/// A node in the promotion asset hierarchy.
///
/// Nodes form a forest through `parent_id` references: `None` means the node
/// sits at the root level, otherwise the referenced node must be an active
/// directory. The induced edges are acyclic.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Node {
    /// Unique node identifier, immutable after creation.
    pub id: Uuid,
    /// Display name; not required to be unique among siblings.
    pub name: String,
    /// Directory or file; immutable after creation.
    pub category: NodeCategory,
    /// Parent directory (None for root-level nodes).
    pub parent_id: Option<Uuid>,
    /// Sibling sort key; engine-issued updates keep it monotonic within a
    /// sibling group but it is neither contiguous nor unique.
    pub sort_order: i32,
    /// Byte count; files only.
    pub size_bytes: Option<i64>,
    /// Blob store key; files only.
    pub storage_path: Option<String>,
    /// Visibility flag; inactive nodes are excluded from every read.
    pub active: bool,
    /// When the node was created.
    pub created_at: DateTime<Utc>,
    /// When the node was last mutated.
    pub updated_at: DateTime<Utc>,
}

impl Node {
    /// Check if this is a root-level node (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Data required to create a new node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDraft {
    /// Display name.
    pub name: String,
    /// Directory or file.
    pub category: NodeCategory,
    /// Parent directory (None for root level).
    pub parent_id: Option<Uuid>,
    /// Sibling sort key.
    pub sort_order: i32,
    /// Byte count; files only.
    pub size_bytes: Option<i64>,
    /// Blob store key; files only.
    pub storage_path: Option<String>,
}

impl NodeDraft {
    /// Draft for a new directory.
    pub fn directory(name: impl Into<String>, parent_id: Option<Uuid>, sort_order: i32) -> Self {
        Self {
            name: name.into(),
            category: NodeCategory::Directory,
            parent_id,
            sort_order,
            size_bytes: None,
            storage_path: None,
        }
    }

    /// Draft for a new file.
    pub fn file(
        name: impl Into<String>,
        parent_id: Option<Uuid>,
        sort_order: i32,
        size_bytes: i64,
        storage_path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: NodeCategory::File,
            parent_id,
            sort_order,
            size_bytes: Some(size_bytes),
            storage_path: Some(storage_path.into()),
        }
    }
}

/// One sibling order reassignment in a reorder batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate {
    /// The node to reassign.
    pub id: Uuid,
    /// Its new sort key.
    pub sort_order: i32,
}
