//! Blob store backends for PromoHub.
//!
//! The hierarchy engine stores only node metadata; file content lives behind
//! the [`BlobStore`] trait. The local filesystem backend is the default, an
//! S3-compatible backend is available behind the `s3` feature, and an
//! in-memory backend backs the test suites.

pub mod local;
pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;

use std::sync::Arc;

use promohub_core::config::storage::StorageConfig;
use promohub_core::error::AppError;
use promohub_core::result::AppResult;
use promohub_core::traits::BlobStore;

pub use local::LocalBlobStore;
pub use memory::MemoryBlobStore;

/// Build the blob store named by the configuration.
pub async fn create_blob_store(config: &StorageConfig) -> AppResult<Arc<dyn BlobStore>> {
    match config.provider.as_str() {
        "local" => {
            let store = LocalBlobStore::new(&config.local.root_path).await?;
            Ok(Arc::new(store))
        }
        #[cfg(feature = "s3")]
        "s3" => {
            let store = s3::S3BlobStore::new(&config.s3).await?;
            Ok(Arc::new(store))
        }
        other => Err(AppError::configuration(format!(
            "Unknown storage provider: {other}"
        ))),
    }
}
