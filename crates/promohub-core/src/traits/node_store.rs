//! Node store trait — the durable keyed storage boundary for node records.

use async_trait::async_trait;
use uuid::Uuid;

use promohub_entity::node::{Node, NodeDraft, OrderUpdate};

use crate::result::AppResult;

/// Trait for node record storage backends.
///
/// The hierarchy engine issues read/write/query requests against this
/// boundary and never manages connections or transactions directly. An
/// implementation may back it with any keyed document or relational store,
/// provided the listing contracts below hold.
///
/// Deletion is a soft delete throughout: records are deactivated, never
/// physically removed, and every read excludes inactive records.
#[async_trait]
pub trait NodeStore: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch one active node by id.
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Node>>;

    /// List all active nodes, sorted by `sort_order` ascending.
    async fn list_active(&self) -> AppResult<Vec<Node>>;

    /// List active children of one parent (`None` = root level),
    /// sorted by `sort_order` ascending.
    async fn list_by_parent(&self, parent_id: Option<Uuid>) -> AppResult<Vec<Node>>;

    /// List the most recently created active file nodes, newest first.
    async fn list_recent_files(&self, limit: i64) -> AppResult<Vec<Node>>;

    /// Case-insensitive substring match over active node names.
    async fn search_by_name(&self, keyword: &str) -> AppResult<Vec<Node>>;

    /// Create a single node record, returning the post-creation state.
    ///
    /// A draft whose `parent_id` references a missing node or a file node
    /// fails with `InvalidReference`.
    async fn create(&self, draft: NodeDraft) -> AppResult<Node>;

    /// Create a batch of node records atomically, returning them in input
    /// order.
    async fn create_many(&self, drafts: Vec<NodeDraft>) -> AppResult<Vec<Node>>;

    /// Update a node's name, returning the post-mutation state, or `None`
    /// if no active record matched.
    async fn update_name(&self, id: Uuid, name: &str) -> AppResult<Option<Node>>;

    /// Apply a batch of sibling order reassignments as a single atomic
    /// write (all-or-nothing).
    async fn update_order(&self, updates: &[OrderUpdate]) -> AppResult<()>;

    /// Deactivate one node. Returns `true` iff an active record existed;
    /// safe to retry (returns `false` rather than erroring when absent).
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Deactivate a set of nodes atomically, returning the number of
    /// records that transitioned.
    async fn delete_many(&self, ids: &[Uuid]) -> AppResult<u64>;
}
