//! Upload workflow: validate, store blobs, register file nodes.

use std::sync::Arc;

use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use promohub_core::config::storage::StorageConfig;
use promohub_core::error::AppError;
use promohub_core::result::AppResult;
use promohub_core::traits::{BlobStore, NodeStore};
use promohub_entity::node::Node;

use super::service::{fresh_storage_key, NewFile, NodeService};

/// One uploaded file held fully in memory.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Original file name.
    pub filename: String,
    /// Declared content type.
    pub content_type: String,
    /// File content.
    pub data: Bytes,
}

/// Validates uploads, writes their blobs, and registers the file nodes as
/// one atomic batch.
#[derive(Debug, Clone)]
pub struct UploadService {
    store: Arc<dyn NodeStore>,
    nodes: Arc<NodeService>,
    blobs: Arc<dyn BlobStore>,
    config: StorageConfig,
}

impl UploadService {
    pub fn new(
        store: Arc<dyn NodeStore>,
        nodes: Arc<NodeService>,
        blobs: Arc<dyn BlobStore>,
        config: StorageConfig,
    ) -> Self {
        Self {
            store,
            nodes,
            blobs,
            config,
        }
    }

    /// Upload a batch of files under one parent directory.
    ///
    /// The batch is validated in full (count, content types, parent) before
    /// any blob is written, so a rejected request leaves no stored content
    /// behind.
    pub async fn upload_files(
        &self,
        parent_id: Option<Uuid>,
        files: Vec<UploadFile>,
    ) -> AppResult<Vec<Node>> {
        if files.is_empty() {
            return Err(AppError::validation("No files provided"));
        }
        if files.len() > self.config.max_files_per_upload {
            return Err(AppError::validation(format!(
                "At most {} files per upload",
                self.config.max_files_per_upload
            )));
        }

        for file in &files {
            if !self
                .config
                .allowed_content_types
                .iter()
                .any(|t| t == &file.content_type)
            {
                return Err(AppError::unsupported_media_type(format!(
                    "Content type not allowed: {}",
                    file.content_type
                )));
            }
        }

        if let Some(parent_id) = parent_id {
            let parent = self.store.get_by_id(parent_id).await?.ok_or_else(|| {
                AppError::invalid_reference(format!("Parent {parent_id} does not exist"))
            })?;
            if !parent.category.is_directory() {
                return Err(AppError::invalid_reference(format!(
                    "Parent {parent_id} is not a directory"
                )));
            }
        }

        let mut drafts = Vec::with_capacity(files.len());
        for file in files {
            let key = fresh_storage_key(&file.filename);
            let size_bytes = file.data.len() as i64;
            self.blobs.put(&key, file.data, &file.content_type).await?;
            drafts.push(NewFile {
                name: file.filename,
                size_bytes,
                storage_path: key,
            });
        }

        let created = self.nodes.create_files(parent_id, drafts).await?;
        info!(count = created.len(), "Upload completed");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use promohub_core::error::ErrorKind;
    use promohub_database::stores::MemoryNodeStore;
    use promohub_storage::MemoryBlobStore;

    use super::*;

    fn setup() -> (UploadService, Arc<NodeService>, Arc<MemoryBlobStore>) {
        let store: Arc<dyn NodeStore> = Arc::new(MemoryNodeStore::new());
        let nodes = Arc::new(NodeService::new(store.clone()));
        let blobs = Arc::new(MemoryBlobStore::new());
        let upload = UploadService::new(
            store,
            nodes.clone(),
            blobs.clone(),
            StorageConfig::default(),
        );
        (upload, nodes, blobs)
    }

    fn pdf(name: &str) -> UploadFile {
        UploadFile {
            filename: name.to_string(),
            content_type: "application/pdf".to_string(),
            data: Bytes::from_static(b"%PDF-1.4"),
        }
    }

    #[tokio::test]
    async fn test_upload_stores_blobs_and_registers_nodes() {
        let (upload, nodes, blobs) = setup();
        let docs = nodes.create_directory("Docs", None).await.unwrap();

        let created = upload
            .upload_files(Some(docs.id), vec![pdf("a.pdf"), pdf("b.pdf")])
            .await
            .unwrap();

        assert_eq!(created.len(), 2);
        assert_eq!(blobs.len().await, 2);
        assert_eq!(created[0].sort_order, 0);
        assert_eq!(created[1].sort_order, 1);
        assert_eq!(created[0].size_bytes, Some(8));
        assert!(created[0]
            .storage_path
            .as_deref()
            .unwrap()
            .starts_with("promotion/"));
    }

    #[tokio::test]
    async fn test_upload_rejects_too_many_files() {
        let (upload, _, blobs) = setup();
        let files: Vec<UploadFile> = (0..6).map(|i| pdf(&format!("f{i}.pdf"))).collect();

        let err = upload.upload_files(None, files).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(blobs.is_empty().await);
    }

    #[tokio::test]
    async fn test_upload_rejects_disallowed_content_type() {
        let (upload, _, blobs) = setup();
        let exe = UploadFile {
            filename: "tool.exe".to_string(),
            content_type: "application/octet-stream".to_string(),
            data: Bytes::from_static(b"MZ"),
        };

        let err = upload.upload_files(None, vec![exe]).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedMediaType);
        assert!(blobs.is_empty().await);
    }

    #[tokio::test]
    async fn test_upload_rejects_file_parent_before_storing() {
        let (upload, nodes, blobs) = setup();
        let docs = nodes.create_directory("Docs", None).await.unwrap();
        let existing = upload
            .upload_files(Some(docs.id), vec![pdf("a.pdf")])
            .await
            .unwrap();

        let err = upload
            .upload_files(Some(existing[0].id), vec![pdf("nested.pdf")])
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidReference);
        assert_eq!(blobs.len().await, 1);
    }
}
