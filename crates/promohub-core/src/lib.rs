//! # promohub-core
//!
//! Core crate for PromoHub. Contains the collaborator traits, configuration
//! schemas, and the unified error system.
//!
//! This crate depends only on `promohub-entity` internally.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
