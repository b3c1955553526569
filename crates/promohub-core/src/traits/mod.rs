//! Collaborator traits consumed by the hierarchy engine.

pub mod blob_store;
pub mod node_store;

pub use blob_store::BlobStore;
pub use node_store::NodeStore;
