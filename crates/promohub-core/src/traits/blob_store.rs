//! Blob store trait for pluggable file content backends.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for binary object storage keyed by path.
///
/// Used only by the upload workflow and the archive exporter; the hierarchy
/// engine itself never touches file content. Content addressing and physical
/// location are entirely the implementation's concern.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "s3").
    fn provider_type(&self) -> &str;

    /// Store an object under the given key and return its public URL.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<String>;

    /// Fetch an object's bytes by key.
    async fn get(&self, key: &str) -> AppResult<Bytes>;

    /// Remove an object. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;
}
