//! Site (bookmark) entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A bookmarked shortcut site. Flat collection, independent of nodes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Site {
    /// Unique site identifier.
    pub id: Uuid,
    /// Site name.
    pub name: String,
    /// Short description.
    pub description: Option<String>,
    /// Target URL.
    pub url: String,
    /// Visibility flag.
    pub active: bool,
    /// When the site was created.
    pub created_at: DateTime<Utc>,
    /// When the site was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSite {
    /// Site name.
    pub name: String,
    /// Short description.
    pub description: Option<String>,
    /// Target URL.
    pub url: String,
}

/// Partial update of a site; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSite {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New URL.
    pub url: Option<String>,
    /// New visibility.
    pub active: Option<bool>,
}
