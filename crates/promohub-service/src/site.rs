//! Site (bookmark) operations.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use promohub_core::error::AppError;
use promohub_core::result::AppResult;
use promohub_database::repositories::SiteRepository;
use promohub_entity::site::{CreateSite, Site, UpdateSite};

/// Manages the flat bookmark site collection.
#[derive(Debug, Clone)]
pub struct SiteService {
    repo: Arc<SiteRepository>,
}

impl SiteService {
    pub fn new(repo: Arc<SiteRepository>) -> Self {
        Self { repo }
    }

    /// List visible sites, newest first.
    pub async fn list_sites(&self) -> AppResult<Vec<Site>> {
        self.repo.list_active().await
    }

    pub async fn create_site(&self, data: CreateSite) -> AppResult<Site> {
        if data.name.trim().is_empty() {
            return Err(AppError::validation("Site name cannot be empty"));
        }
        if data.url.trim().is_empty() {
            return Err(AppError::validation("Site URL cannot be empty"));
        }

        let site = self.repo.create(data).await?;
        info!(site_id = %site.id, name = %site.name, "Site created");
        Ok(site)
    }

    /// Partial update; unset fields keep their current value.
    pub async fn update_site(&self, id: Uuid, data: UpdateSite) -> AppResult<Site> {
        let site = self
            .repo
            .update(id, data)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Site not found: {id}")))?;

        info!(site_id = %id, "Site updated");
        Ok(site)
    }

    /// Remove a site. Returns `Ok(false)` when it was already gone.
    pub async fn delete_site(&self, id: Uuid) -> AppResult<bool> {
        let deleted = self.repo.delete(id).await?;
        if deleted {
            info!(site_id = %id, "Site deleted");
        }
        Ok(deleted)
    }
}
