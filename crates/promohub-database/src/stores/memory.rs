//! In-memory node store — the reference implementation of the store
//! contracts, used by tests and embedded deployments.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use promohub_core::error::AppError;
use promohub_core::result::AppResult;
use promohub_core::traits::NodeStore;
use promohub_entity::node::{Node, NodeCategory, NodeDraft, OrderUpdate};

/// One stored record plus its insertion sequence number.
///
/// The sequence number is a deterministic tiebreak for records created
/// within the same timestamp granularity.
#[derive(Debug, Clone)]
struct StoredNode {
    node: Node,
    seq: u64,
}

#[derive(Debug, Default)]
struct Inner {
    nodes: HashMap<Uuid, StoredNode>,
    next_seq: u64,
}

impl Inner {
    fn check_parent(&self, parent_id: Uuid) -> AppResult<()> {
        match self.nodes.get(&parent_id) {
            Some(stored) if stored.node.active => {
                if stored.node.category.is_directory() {
                    Ok(())
                } else {
                    Err(AppError::invalid_reference(format!(
                        "Parent {parent_id} is not a directory"
                    )))
                }
            }
            _ => Err(AppError::invalid_reference(format!(
                "Parent {parent_id} does not exist"
            ))),
        }
    }

    fn insert_draft(&mut self, draft: NodeDraft) -> AppResult<Node> {
        if let Some(parent_id) = draft.parent_id {
            self.check_parent(parent_id)?;
        }

        let now = Utc::now();
        let node = Node {
            id: Uuid::new_v4(),
            name: draft.name,
            category: draft.category,
            parent_id: draft.parent_id,
            sort_order: draft.sort_order,
            size_bytes: draft.size_bytes,
            storage_path: draft.storage_path,
            active: true,
            created_at: now,
            updated_at: now,
        };

        let seq = self.next_seq;
        self.next_seq += 1;
        self.nodes.insert(
            node.id,
            StoredNode {
                node: node.clone(),
                seq,
            },
        );
        Ok(node)
    }

    fn active_sorted(&self) -> Vec<&StoredNode> {
        let mut records: Vec<&StoredNode> =
            self.nodes.values().filter(|s| s.node.active).collect();
        records.sort_by_key(|s| (s.node.sort_order, s.seq));
        records
    }
}

/// In-memory [`NodeStore`] keyed by node id.
///
/// Batch operations are atomic by construction: each runs under a single
/// write-lock scope and validates its whole input before mutating.
#[derive(Debug, Default)]
pub struct MemoryNodeStore {
    inner: RwLock<Inner>,
}

impl MemoryNodeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NodeStore for MemoryNodeStore {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Node>> {
        let inner = self.inner.read().await;
        Ok(inner
            .nodes
            .get(&id)
            .filter(|s| s.node.active)
            .map(|s| s.node.clone()))
    }

    async fn list_active(&self) -> AppResult<Vec<Node>> {
        let inner = self.inner.read().await;
        Ok(inner
            .active_sorted()
            .into_iter()
            .map(|s| s.node.clone())
            .collect())
    }

    async fn list_by_parent(&self, parent_id: Option<Uuid>) -> AppResult<Vec<Node>> {
        let inner = self.inner.read().await;
        Ok(inner
            .active_sorted()
            .into_iter()
            .filter(|s| s.node.parent_id == parent_id)
            .map(|s| s.node.clone())
            .collect())
    }

    async fn list_recent_files(&self, limit: i64) -> AppResult<Vec<Node>> {
        let inner = self.inner.read().await;
        let mut files: Vec<&StoredNode> = inner
            .nodes
            .values()
            .filter(|s| s.node.active && s.node.category == NodeCategory::File)
            .collect();
        files.sort_by(|a, b| {
            (b.node.created_at, b.seq).cmp(&(a.node.created_at, a.seq))
        });
        Ok(files
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|s| s.node.clone())
            .collect())
    }

    async fn search_by_name(&self, keyword: &str) -> AppResult<Vec<Node>> {
        let needle = keyword.to_lowercase();
        let inner = self.inner.read().await;
        Ok(inner
            .active_sorted()
            .into_iter()
            .filter(|s| s.node.name.to_lowercase().contains(&needle))
            .map(|s| s.node.clone())
            .collect())
    }

    async fn create(&self, draft: NodeDraft) -> AppResult<Node> {
        let mut inner = self.inner.write().await;
        inner.insert_draft(draft)
    }

    async fn create_many(&self, drafts: Vec<NodeDraft>) -> AppResult<Vec<Node>> {
        let mut inner = self.inner.write().await;
        for draft in &drafts {
            if let Some(parent_id) = draft.parent_id {
                inner.check_parent(parent_id)?;
            }
        }
        drafts
            .into_iter()
            .map(|draft| inner.insert_draft(draft))
            .collect()
    }

    async fn update_name(&self, id: Uuid, name: &str) -> AppResult<Option<Node>> {
        let mut inner = self.inner.write().await;
        match inner.nodes.get_mut(&id) {
            Some(stored) if stored.node.active => {
                stored.node.name = name.to_string();
                stored.node.updated_at = Utc::now();
                Ok(Some(stored.node.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn update_order(&self, updates: &[OrderUpdate]) -> AppResult<()> {
        let mut inner = self.inner.write().await;

        // Validate the whole batch before touching anything.
        for update in updates {
            match inner.nodes.get(&update.id) {
                Some(stored) if stored.node.active => {}
                _ => {
                    return Err(AppError::invalid_reference(format!(
                        "Node {} does not exist",
                        update.id
                    )));
                }
            }
        }

        let now = Utc::now();
        for update in updates {
            if let Some(stored) = inner.nodes.get_mut(&update.id) {
                stored.node.sort_order = update.sort_order;
                stored.node.updated_at = now;
            }
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        match inner.nodes.get_mut(&id) {
            Some(stored) if stored.node.active => {
                stored.node.active = false;
                stored.node.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_many(&self, ids: &[Uuid]) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        let mut removed = 0;
        for id in ids {
            if let Some(stored) = inner.nodes.get_mut(id) {
                if stored.node.active {
                    stored.node.active = false;
                    stored.node.updated_at = now;
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get() {
        let store = MemoryNodeStore::new();
        let node = store
            .create(NodeDraft::directory("Docs", None, 0))
            .await
            .unwrap();

        let fetched = store.get_by_id(node.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Docs");
        assert!(fetched.active);
        assert!(fetched.is_root());
    }

    #[tokio::test]
    async fn test_create_rejects_file_parent() {
        let store = MemoryNodeStore::new();
        let root = store
            .create(NodeDraft::directory("Docs", None, 0))
            .await
            .unwrap();
        let file = store
            .create(NodeDraft::file("a.pdf", Some(root.id), 0, 10, "k/a.pdf"))
            .await
            .unwrap();

        let err = store
            .create(NodeDraft::directory("nested", Some(file.id), 0))
            .await
            .unwrap_err();
        assert_eq!(
            err.kind,
            promohub_core::error::ErrorKind::InvalidReference
        );
    }

    #[tokio::test]
    async fn test_list_by_parent_sorted() {
        let store = MemoryNodeStore::new();
        let root = store
            .create(NodeDraft::directory("Docs", None, 0))
            .await
            .unwrap();
        store
            .create(NodeDraft::file("b.pdf", Some(root.id), 2, 1, "k/b"))
            .await
            .unwrap();
        store
            .create(NodeDraft::file("a.pdf", Some(root.id), 1, 1, "k/a"))
            .await
            .unwrap();

        let children = store.list_by_parent(Some(root.id)).await.unwrap();
        let names: Vec<&str> = children.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf"]);
    }

    #[tokio::test]
    async fn test_delete_is_soft_and_idempotent() {
        let store = MemoryNodeStore::new();
        let node = store
            .create(NodeDraft::directory("Docs", None, 0))
            .await
            .unwrap();

        assert!(store.delete(node.id).await.unwrap());
        assert!(!store.delete(node.id).await.unwrap());
        assert!(store.get_by_id(node.id).await.unwrap().is_none());
        assert!(store.list_active().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_order_rejects_unknown_ids_without_partial_write() {
        let store = MemoryNodeStore::new();
        let node = store
            .create(NodeDraft::directory("Docs", None, 0))
            .await
            .unwrap();

        let updates = vec![
            OrderUpdate {
                id: node.id,
                sort_order: 9,
            },
            OrderUpdate {
                id: Uuid::new_v4(),
                sort_order: 1,
            },
        ];
        assert!(store.update_order(&updates).await.is_err());

        // The valid half of the batch must not have been applied.
        let fetched = store.get_by_id(node.id).await.unwrap().unwrap();
        assert_eq!(fetched.sort_order, 0);
    }

    #[tokio::test]
    async fn test_recent_files_newest_first() {
        let store = MemoryNodeStore::new();
        for i in 0..6 {
            store
                .create(NodeDraft::file(
                    format!("f{i}.pdf"),
                    None,
                    i,
                    1,
                    format!("k/f{i}"),
                ))
                .await
                .unwrap();
        }

        let recent = store.list_recent_files(4).await.unwrap();
        let names: Vec<&str> = recent.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["f5.pdf", "f4.pdf", "f3.pdf", "f2.pdf"]);
    }

    #[tokio::test]
    async fn test_search_case_insensitive() {
        let store = MemoryNodeStore::new();
        store
            .create(NodeDraft::directory("Quarterly Report", None, 0))
            .await
            .unwrap();
        store
            .create(NodeDraft::directory("report-archive", None, 1))
            .await
            .unwrap();
        store
            .create(NodeDraft::directory("Misc", None, 2))
            .await
            .unwrap();

        let upper = store.search_by_name("Report").await.unwrap();
        let lower = store.search_by_name("report").await.unwrap();
        let upper_ids: Vec<Uuid> = upper.iter().map(|n| n.id).collect();
        let lower_ids: Vec<Uuid> = lower.iter().map(|n| n.id).collect();
        assert_eq!(upper_ids.len(), 2);
        assert_eq!(upper_ids, lower_ids);
    }
}
