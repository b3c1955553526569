//! Node hierarchy engine: tree assembly, CRUD, duplication, reorder, upload.

pub mod service;
pub mod tree;
pub mod upload;
