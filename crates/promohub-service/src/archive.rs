//! Archive export: pack a directory subtree into a zip.

use std::io::{Cursor, Write};
use std::sync::Arc;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use promohub_core::error::{AppError, ErrorKind};
use promohub_core::result::AppResult;
use promohub_core::traits::{BlobStore, NodeStore};
use promohub_entity::node::Node;

/// A finished archive ready to serve.
#[derive(Debug, Clone)]
pub struct ArchiveExport {
    /// Suggested download file name, `"<root name>.zip"`.
    pub filename: String,
    /// The zip bytes.
    pub data: Bytes,
}

/// Packs directory subtrees into zip archives.
#[derive(Debug, Clone)]
pub struct ArchiveService {
    store: Arc<dyn NodeStore>,
    blobs: Arc<dyn BlobStore>,
}

impl ArchiveService {
    pub fn new(store: Arc<dyn NodeStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { store, blobs }
    }

    /// Export a directory's subtree as a zip.
    ///
    /// The walk preserves sibling order and emits an explicit entry for every
    /// directory, so empty directories survive the round trip. Any blob read
    /// failure aborts the whole export; nothing partial is returned. The
    /// token is checked between entries for cooperative cancellation.
    pub async fn export_directory(
        &self,
        node_id: Uuid,
        cancel: &CancellationToken,
    ) -> AppResult<ArchiveExport> {
        let root = self
            .store
            .get_by_id(node_id)
            .await?
            .filter(|n| n.category.is_directory())
            .ok_or_else(|| AppError::not_found(format!("Directory not found: {node_id}")))?;

        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        // Depth-first walk in sibling order.
        let mut stack: Vec<(Node, String)> = Vec::new();
        push_children(
            &mut stack,
            self.store.list_by_parent(Some(root.id)).await?,
            "",
        );

        while let Some((node, path)) = stack.pop() {
            if cancel.is_cancelled() {
                return Err(AppError::internal("Archive export cancelled"));
            }

            if node.category.is_directory() {
                zip.add_directory(format!("{path}/"), options)
                    .map_err(|e| {
                        AppError::with_source(ErrorKind::Internal, "Failed to write zip entry", e)
                    })?;
                push_children(
                    &mut stack,
                    self.store.list_by_parent(Some(node.id)).await?,
                    &path,
                );
            } else {
                let key = node.storage_path.as_deref().ok_or_else(|| {
                    AppError::storage(format!("File node {} has no storage key", node.id))
                })?;
                let content = self.blobs.get(key).await?;

                zip.start_file(path.as_str(), options).map_err(|e| {
                    AppError::with_source(ErrorKind::Internal, "Failed to write zip entry", e)
                })?;
                zip.write_all(&content).map_err(|e| {
                    AppError::with_source(ErrorKind::Internal, "Failed to write zip entry", e)
                })?;
            }
        }

        let cursor = zip.finish().map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to finalize archive", e)
        })?;
        let data = Bytes::from(cursor.into_inner());

        info!(node_id = %node_id, bytes = data.len(), "Archive exported");
        Ok(ArchiveExport {
            filename: format!("{}.zip", root.name),
            data,
        })
    }
}

/// Push children so the stack pops them in sibling order.
fn push_children(stack: &mut Vec<(Node, String)>, children: Vec<Node>, prefix: &str) {
    for child in children.into_iter().rev() {
        let path = if prefix.is_empty() {
            child.name.clone()
        } else {
            format!("{prefix}/{}", child.name)
        };
        stack.push((child, path));
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use promohub_database::stores::MemoryNodeStore;
    use promohub_entity::node::NodeDraft;
    use promohub_storage::MemoryBlobStore;
    use zip::ZipArchive;

    use super::*;

    async fn setup() -> (ArchiveService, Arc<dyn NodeStore>, Arc<MemoryBlobStore>) {
        let store: Arc<dyn NodeStore> = Arc::new(MemoryNodeStore::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let service = ArchiveService::new(store.clone(), blobs.clone());
        (service, store, blobs)
    }

    async fn put_blob(blobs: &MemoryBlobStore, key: &str, content: &'static [u8]) {
        blobs
            .put(key, Bytes::from_static(content), "application/pdf")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_export_mirrors_tree_layout() {
        let (service, store, blobs) = setup().await;

        let docs = store
            .create(NodeDraft::directory("Docs", None, 0))
            .await
            .unwrap();
        store
            .create(NodeDraft::file("a.pdf", Some(docs.id), 0, 3, "k/a"))
            .await
            .unwrap();
        let sub = store
            .create(NodeDraft::directory("Sub", Some(docs.id), 1))
            .await
            .unwrap();
        store
            .create(NodeDraft::file("deep.pdf", Some(sub.id), 0, 4, "k/deep"))
            .await
            .unwrap();
        store
            .create(NodeDraft::directory("Empty", Some(docs.id), 2))
            .await
            .unwrap();
        put_blob(&blobs, "k/a", b"aaa").await;
        put_blob(&blobs, "k/deep", b"deep").await;

        let export = service
            .export_directory(docs.id, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(export.filename, "Docs.zip");

        let mut archive = ZipArchive::new(Cursor::new(export.data.to_vec())).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["a.pdf", "Sub/", "Sub/deep.pdf", "Empty/"]);

        let mut content = String::new();
        archive
            .by_name("Sub/deep.pdf")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "deep");
    }

    #[tokio::test]
    async fn test_export_of_file_node_is_not_found() {
        let (service, store, _) = setup().await;
        let file = store
            .create(NodeDraft::file("a.pdf", None, 0, 1, "k/a"))
            .await
            .unwrap();

        let err = service
            .export_directory(file.id, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_missing_blob_aborts_export() {
        let (service, store, _) = setup().await;
        let docs = store
            .create(NodeDraft::directory("Docs", None, 0))
            .await
            .unwrap();
        store
            .create(NodeDraft::file("ghost.pdf", Some(docs.id), 0, 1, "k/ghost"))
            .await
            .unwrap();

        let err = service
            .export_directory(docs.id, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_cancellation_aborts_export() {
        let (service, store, blobs) = setup().await;
        let docs = store
            .create(NodeDraft::directory("Docs", None, 0))
            .await
            .unwrap();
        store
            .create(NodeDraft::file("a.pdf", Some(docs.id), 0, 3, "k/a"))
            .await
            .unwrap();
        put_blob(&blobs, "k/a", b"aaa").await;

        let token = CancellationToken::new();
        token.cancel();

        assert!(service.export_directory(docs.id, &token).await.is_err());
    }

    #[tokio::test]
    async fn test_empty_directory_exports_empty_archive() {
        let (service, store, _) = setup().await;
        let docs = store
            .create(NodeDraft::directory("Docs", None, 0))
            .await
            .unwrap();

        let export = service
            .export_directory(docs.id, &CancellationToken::new())
            .await
            .unwrap();
        let archive = ZipArchive::new(Cursor::new(export.data.to_vec())).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
