//! Node hierarchy engine.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use promohub_core::error::AppError;
use promohub_core::result::AppResult;
use promohub_core::traits::NodeStore;
use promohub_entity::node::{Node, NodeCategory, NodeDraft, OrderUpdate, TreeNode};

use super::tree::build_forest;

/// Recent-file listing size when the caller does not specify one.
const DEFAULT_RECENT_LIMIT: i64 = 4;

/// A file record to register in the hierarchy. The blob itself must already
/// be stored under `storage_path`.
#[derive(Debug, Clone)]
pub struct NewFile {
    /// Display name.
    pub name: String,
    /// Byte count of the stored blob.
    pub size_bytes: i64,
    /// Blob store key.
    pub storage_path: String,
}

/// Result of duplicating a subtree.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DuplicatedSubtree {
    /// The copied root node.
    pub root: Node,
    /// All copied descendants, in creation order.
    pub descendants: Vec<Node>,
}

/// Orchestrates all node hierarchy operations over an injected store.
#[derive(Debug, Clone)]
pub struct NodeService {
    store: Arc<dyn NodeStore>,
}

impl NodeService {
    pub fn new(store: Arc<dyn NodeStore>) -> Self {
        Self { store }
    }

    /// Assemble the full forest of active nodes.
    pub async fn list_tree(&self) -> AppResult<Vec<TreeNode>> {
        let nodes = self.store.list_active().await?;
        build_forest(nodes, None)
    }

    /// Fetch one node, failing with `NotFound` when absent or inactive.
    pub async fn get_node(&self, id: Uuid) -> AppResult<Node> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Node not found: {id}")))
    }

    /// List direct children of a parent (`None` for the root level).
    pub async fn list_children(&self, parent_id: Option<Uuid>) -> AppResult<Vec<Node>> {
        self.store.list_by_parent(parent_id).await
    }

    /// Create a directory node placed after its existing siblings.
    ///
    /// The parent reference is not pre-validated here; a bad reference
    /// surfaces as the store's `InvalidReference`.
    pub async fn create_directory(
        &self,
        name: &str,
        parent_id: Option<Uuid>,
    ) -> AppResult<Node> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Directory name cannot be empty"));
        }

        let siblings = self.store.list_by_parent(parent_id).await?;
        let draft = NodeDraft::directory(name, parent_id, next_sort_order(&siblings));
        let node = self.store.create(draft).await?;

        info!(node_id = %node.id, name = %node.name, "Directory created");
        Ok(node)
    }

    /// Register a batch of file records under one parent, continuing the
    /// sibling sort order. The whole batch is written atomically.
    pub async fn create_files(
        &self,
        parent_id: Option<Uuid>,
        files: Vec<NewFile>,
    ) -> AppResult<Vec<Node>> {
        if files.is_empty() {
            return Err(AppError::validation("No files to create"));
        }

        let siblings = self.store.list_by_parent(parent_id).await?;
        let base = next_sort_order(&siblings);
        let drafts: Vec<NodeDraft> = files
            .into_iter()
            .enumerate()
            .map(|(i, f)| {
                NodeDraft::file(f.name, parent_id, base + i as i32, f.size_bytes, f.storage_path)
            })
            .collect();

        let created = self.store.create_many(drafts).await?;
        info!(count = created.len(), "Files created");
        Ok(created)
    }

    /// Rename a node.
    pub async fn rename_node(&self, id: Uuid, new_name: &str) -> AppResult<Node> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(AppError::validation("Node name cannot be empty"));
        }

        let node = self
            .store
            .update_name(id, new_name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Node not found: {id}")))?;

        info!(node_id = %id, name = %new_name, "Node renamed");
        Ok(node)
    }

    /// Deactivate a node and its whole subtree in one atomic write.
    ///
    /// Returns `Ok(false)` when the node does not exist; the operation is
    /// safe to retry. Children are never left orphaned.
    pub async fn delete_node(&self, id: Uuid) -> AppResult<bool> {
        if self.store.get_by_id(id).await?.is_none() {
            return Ok(false);
        }

        let snapshot = self.store.list_active().await?;
        let mut children_of: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for node in &snapshot {
            if let Some(parent) = node.parent_id {
                children_of.entry(parent).or_default().push(node.id);
            }
        }

        let mut ids = vec![id];
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(kids) = children_of.remove(&current) {
                for kid in kids {
                    ids.push(kid);
                    stack.push(kid);
                }
            }
        }

        let removed = self.store.delete_many(&ids).await?;
        info!(node_id = %id, removed, "Node deleted");
        Ok(true)
    }

    /// Duplicate a node and its whole subtree.
    ///
    /// The source is snapshotted from one read before any write, so the copy
    /// reflects a single consistent state. The copied root is named
    /// `"<name> (copy)"` and placed after its siblings; descendants keep
    /// their names, shape, and sibling order. File copies receive a fresh
    /// storage key; blob content is not copied here.
    pub async fn duplicate_subtree(&self, id: Uuid) -> AppResult<DuplicatedSubtree> {
        let source = self.get_node(id).await?;
        let snapshot = self.store.list_active().await?;

        let mut children_of: HashMap<Uuid, Vec<Node>> = HashMap::new();
        for node in &snapshot {
            if let Some(parent) = node.parent_id {
                children_of.entry(parent).or_default().push(node.clone());
            }
        }

        let next = snapshot
            .iter()
            .filter(|n| n.parent_id == source.parent_id)
            .map(|n| n.sort_order)
            .max()
            .map_or(0, |m| m + 1);
        let root_draft = copy_draft(
            &source,
            source.parent_id,
            next,
            format!("{} (copy)", source.name),
        );
        let root = self.store.create(root_draft).await?;

        let mut descendants = Vec::new();
        let mut queue = VecDeque::from([(source.id, root.id)]);
        while let Some((source_id, copy_id)) = queue.pop_front() {
            let Some(children) = children_of.remove(&source_id) else {
                continue;
            };

            let drafts: Vec<NodeDraft> = children
                .iter()
                .map(|c| copy_draft(c, Some(copy_id), c.sort_order, c.name.clone()))
                .collect();
            let created = self.store.create_many(drafts).await?;

            for (child, copy) in children.iter().zip(&created) {
                if child.category.is_directory() {
                    queue.push_back((child.id, copy.id));
                }
            }
            descendants.extend(created);
        }

        info!(
            node_id = %id,
            copy_id = %root.id,
            copied = descendants.len() + 1,
            "Subtree duplicated"
        );
        Ok(DuplicatedSubtree { root, descendants })
    }

    /// Reassign sort keys within one sibling group as a single atomic batch.
    ///
    /// Every update must target a current child of `parent_id`; any other id
    /// fails the whole batch with `InvalidReference` before anything is
    /// written.
    pub async fn reorder_siblings(
        &self,
        parent_id: Option<Uuid>,
        updates: Vec<OrderUpdate>,
    ) -> AppResult<()> {
        if updates.is_empty() {
            return Ok(());
        }

        let children = self.store.list_by_parent(parent_id).await?;
        let child_ids: HashSet<Uuid> = children.iter().map(|n| n.id).collect();
        for update in &updates {
            if !child_ids.contains(&update.id) {
                return Err(AppError::invalid_reference(format!(
                    "Node {} is not a child of the target parent",
                    update.id
                )));
            }
        }

        self.store.update_order(&updates).await?;
        info!(count = updates.len(), "Siblings reordered");
        Ok(())
    }

    /// Case-insensitive substring search over active node names.
    pub async fn search(&self, keyword: &str) -> AppResult<Vec<Node>> {
        self.store.search_by_name(keyword.trim()).await
    }

    /// Most recently created files, newest first. Defaults to 4.
    pub async fn recent_files(&self, limit: Option<i64>) -> AppResult<Vec<Node>> {
        self.store
            .list_recent_files(limit.unwrap_or(DEFAULT_RECENT_LIMIT))
            .await
    }
}

fn next_sort_order(siblings: &[Node]) -> i32 {
    siblings
        .iter()
        .map(|n| n.sort_order)
        .max()
        .map_or(0, |m| m + 1)
}

fn copy_draft(source: &Node, parent_id: Option<Uuid>, sort_order: i32, name: String) -> NodeDraft {
    match source.category {
        NodeCategory::Directory => NodeDraft::directory(name, parent_id, sort_order),
        NodeCategory::File => NodeDraft::file(
            name,
            parent_id,
            sort_order,
            source.size_bytes.unwrap_or(0),
            fresh_storage_key(&source.name),
        ),
    }
}

/// Generate a collision-free blob store key for a file name.
pub(crate) fn fresh_storage_key(filename: &str) -> String {
    format!("promotion/{}/{filename}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use promohub_core::error::ErrorKind;
    use promohub_database::stores::MemoryNodeStore;

    use super::*;

    fn service() -> NodeService {
        NodeService::new(Arc::new(MemoryNodeStore::new()))
    }

    #[tokio::test]
    async fn test_create_directory_assigns_incrementing_order() {
        let svc = service();
        let a = svc.create_directory("a", None).await.unwrap();
        let b = svc.create_directory("b", None).await.unwrap();
        assert_eq!(a.sort_order, 0);
        assert_eq!(b.sort_order, 1);
    }

    #[tokio::test]
    async fn test_create_directory_rejects_blank_name() {
        let svc = service();
        let err = svc.create_directory("   ", None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_create_files_continues_sibling_order() {
        let svc = service();
        let docs = svc.create_directory("Docs", None).await.unwrap();
        svc.create_files(
            Some(docs.id),
            vec![NewFile {
                name: "first.pdf".into(),
                size_bytes: 10,
                storage_path: "k/first".into(),
            }],
        )
        .await
        .unwrap();

        let more = svc
            .create_files(
                Some(docs.id),
                vec![
                    NewFile {
                        name: "second.pdf".into(),
                        size_bytes: 10,
                        storage_path: "k/second".into(),
                    },
                    NewFile {
                        name: "third.pdf".into(),
                        size_bytes: 10,
                        storage_path: "k/third".into(),
                    },
                ],
            )
            .await
            .unwrap();

        assert_eq!(more[0].sort_order, 1);
        assert_eq!(more[1].sort_order, 2);
    }

    #[tokio::test]
    async fn test_rename_missing_node_is_not_found() {
        let svc = service();
        let err = svc.rename_node(Uuid::new_v4(), "x").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_list_tree_builds_nested_shape() {
        let svc = service();
        let docs = svc.create_directory("Docs", None).await.unwrap();
        svc.create_files(
            Some(docs.id),
            vec![
                NewFile {
                    name: "a.pdf".into(),
                    size_bytes: 1,
                    storage_path: "k/a".into(),
                },
                NewFile {
                    name: "b.pdf".into(),
                    size_bytes: 1,
                    storage_path: "k/b".into(),
                },
            ],
        )
        .await
        .unwrap();

        let tree = svc.list_tree().await.unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].node.name, "Docs");
        let names: Vec<&str> = tree[0]
            .children
            .iter()
            .map(|c| c.node.name.as_str())
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf"]);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_descendants() {
        let svc = service();
        let docs = svc.create_directory("Docs", None).await.unwrap();
        let sub = svc.create_directory("Sub", Some(docs.id)).await.unwrap();
        svc.create_files(
            Some(sub.id),
            vec![NewFile {
                name: "deep.pdf".into(),
                size_bytes: 1,
                storage_path: "k/deep".into(),
            }],
        )
        .await
        .unwrap();

        assert!(svc.delete_node(docs.id).await.unwrap());
        assert!(svc.list_tree().await.unwrap().is_empty());
        assert!(svc.list_children(Some(sub.id)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_absent_node_returns_false() {
        let svc = service();
        assert!(!svc.delete_node(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_preserves_shape_and_renames_root() {
        let svc = service();
        let docs = svc.create_directory("Docs", None).await.unwrap();
        let sub = svc.create_directory("Sub", Some(docs.id)).await.unwrap();
        let files = svc
            .create_files(
                Some(sub.id),
                vec![NewFile {
                    name: "deep.pdf".into(),
                    size_bytes: 7,
                    storage_path: "k/deep".into(),
                }],
            )
            .await
            .unwrap();

        let copy = svc.duplicate_subtree(docs.id).await.unwrap();
        assert_eq!(copy.root.name, "Docs (copy)");
        assert_eq!(copy.descendants.len(), 2);

        // Fresh ids everywhere.
        let source_ids: HashSet<Uuid> =
            [docs.id, sub.id, files[0].id].into_iter().collect();
        assert!(!source_ids.contains(&copy.root.id));
        assert!(copy.descendants.iter().all(|n| !source_ids.contains(&n.id)));

        // Same shape under the copy.
        let tree = svc.list_tree().await.unwrap();
        let copied_root = tree
            .iter()
            .find(|t| t.node.id == copy.root.id)
            .expect("copied root in tree");
        assert_eq!(copied_root.count(), 3);
        assert_eq!(copied_root.children[0].node.name, "Sub");
        assert_eq!(copied_root.children[0].children[0].node.name, "deep.pdf");

        // File copies must not share blob keys with their sources.
        let copied_file = &copied_root.children[0].children[0].node;
        assert_ne!(copied_file.storage_path, files[0].storage_path);
        assert_eq!(copied_file.size_bytes, Some(7));
    }

    #[tokio::test]
    async fn test_duplicate_places_copy_after_siblings() {
        let svc = service();
        let docs = svc.create_directory("Docs", None).await.unwrap();
        svc.create_directory("Other", None).await.unwrap();

        let copy = svc.duplicate_subtree(docs.id).await.unwrap();
        assert_eq!(copy.root.sort_order, 2);
    }

    #[tokio::test]
    async fn test_reorder_applies_new_orders() {
        let svc = service();
        let docs = svc.create_directory("Docs", None).await.unwrap();
        let a = svc.create_directory("a", Some(docs.id)).await.unwrap();
        let b = svc.create_directory("b", Some(docs.id)).await.unwrap();

        svc.reorder_siblings(
            Some(docs.id),
            vec![
                OrderUpdate {
                    id: a.id,
                    sort_order: 5,
                },
                OrderUpdate {
                    id: b.id,
                    sort_order: 1,
                },
            ],
        )
        .await
        .unwrap();

        let children = svc.list_children(Some(docs.id)).await.unwrap();
        let names: Vec<&str> = children.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_reorder_rejects_foreign_ids() {
        let svc = service();
        let docs = svc.create_directory("Docs", None).await.unwrap();
        let outsider = svc.create_directory("Outsider", None).await.unwrap();

        let err = svc
            .reorder_siblings(
                Some(docs.id),
                vec![OrderUpdate {
                    id: outsider.id,
                    sort_order: 0,
                }],
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidReference);

        // The outsider keeps its original order.
        let roots = svc.list_children(None).await.unwrap();
        let found = roots.iter().find(|n| n.id == outsider.id).unwrap();
        assert_eq!(found.sort_order, 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_reorders_of_disjoint_groups_apply_fully() {
        let svc = Arc::new(service());
        let left = svc.create_directory("Left", None).await.unwrap();
        let right = svc.create_directory("Right", None).await.unwrap();
        let (left_id, right_id) = (left.id, right.id);

        let mut left_kids = Vec::new();
        let mut right_kids = Vec::new();
        for name in ["a", "b", "c"] {
            left_kids.push(svc.create_directory(name, Some(left_id)).await.unwrap());
            right_kids.push(svc.create_directory(name, Some(right_id)).await.unwrap());
        }

        fn reversed(kids: &[Node]) -> Vec<OrderUpdate> {
            kids.iter()
                .rev()
                .enumerate()
                .map(|(i, n)| OrderUpdate {
                    id: n.id,
                    sort_order: i as i32,
                })
                .collect()
        }

        let left_updates = reversed(&left_kids);
        let right_updates = reversed(&right_kids);
        let (svc_l, svc_r) = (Arc::clone(&svc), Arc::clone(&svc));
        let (l, r) = tokio::join!(
            tokio::spawn(
                async move { svc_l.reorder_siblings(Some(left_id), left_updates).await }
            ),
            tokio::spawn(
                async move { svc_r.reorder_siblings(Some(right_id), right_updates).await }
            ),
        );
        l.unwrap().unwrap();
        r.unwrap().unwrap();

        // Each group must land fully reordered; a torn batch would leave a
        // mixed ordering in one of them.
        for parent in [left_id, right_id] {
            let names: Vec<String> = svc
                .list_children(Some(parent))
                .await
                .unwrap()
                .into_iter()
                .map(|n| n.name)
                .collect();
            assert_eq!(names, vec!["c", "b", "a"]);
        }
    }

    #[tokio::test]
    async fn test_recent_files_defaults_to_four() {
        let svc = service();
        for i in 0..6 {
            svc.create_files(
                None,
                vec![NewFile {
                    name: format!("f{i}.pdf"),
                    size_bytes: 1,
                    storage_path: format!("k/f{i}"),
                }],
            )
            .await
            .unwrap();
        }

        let recent = svc.recent_files(None).await.unwrap();
        assert_eq!(recent.len(), 4);
        assert_eq!(recent[0].name, "f5.pdf");
    }

    #[tokio::test]
    async fn test_search_matches_any_case() {
        let svc = service();
        svc.create_directory("Summer Campaign", None).await.unwrap();
        svc.create_directory("winter campaign", None).await.unwrap();

        let hits = svc.search("CAMPAIGN").await.unwrap();
        assert_eq!(hits.len(), 2);
    }
}
