//! Bookmark site entities.

pub mod model;

pub use model::{CreateSite, Site, UpdateSite};
