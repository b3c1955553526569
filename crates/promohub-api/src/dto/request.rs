//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use promohub_entity::node::OrderUpdate;

/// Create directory request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDirectoryRequest {
    /// Directory name.
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    /// Parent directory ID (None for root level).
    pub parent_id: Option<Uuid>,
}

/// Rename node request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenameNodeRequest {
    /// New name.
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
}

/// Sibling reorder request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRequest {
    /// The sibling group's parent (None for the root level).
    pub parent_id: Option<Uuid>,
    /// Order reassignments, applied as one batch.
    pub updates: Vec<OrderUpdate>,
}

/// Node search query parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    /// Substring to match, case-insensitive.
    pub keyword: String,
}

/// Recent-file listing query parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct RecentQuery {
    /// Listing size (default 4).
    pub limit: Option<i64>,
}

/// Create site request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSiteRequest {
    /// Site name.
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    /// Short description.
    pub description: Option<String>,
    /// Target URL.
    #[validate(url(message = "Must be a valid URL"))]
    pub url: String,
}

/// Update site request; unset fields keep their current value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSiteRequest {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New URL.
    pub url: Option<String>,
    /// New visibility.
    pub active: Option<bool>,
}
