//! In-memory blob store, used by tests.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use promohub_core::error::AppError;
use promohub_core::result::AppResult;
use promohub_core::traits::BlobStore;

/// In-memory [`BlobStore`] keyed by path.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Bytes>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn put(&self, key: &str, data: Bytes, _content_type: &str) -> AppResult<String> {
        self.blobs.write().await.insert(key.to_string(), data);
        Ok(format!("memory://{key}"))
    }

    async fn get(&self, key: &str) -> AppResult<Bytes> {
        self.blobs
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Blob not found: {key}")))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.blobs.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get() {
        let store = MemoryBlobStore::new();
        store
            .put("k/a.bin", Bytes::from_static(b"abc"), "application/octet-stream")
            .await
            .unwrap();

        assert_eq!(store.get("k/a.bin").await.unwrap(), Bytes::from_static(b"abc"));
        assert_eq!(store.len().await, 1);

        store.delete("k/a.bin").await.unwrap();
        assert!(store.is_empty().await);
    }
}
