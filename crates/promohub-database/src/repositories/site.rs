//! Site repository.

use sqlx::PgPool;
use uuid::Uuid;

use promohub_core::error::{AppError, ErrorKind};
use promohub_core::result::AppResult;
use promohub_entity::site::{CreateSite, Site, UpdateSite};

/// PostgreSQL repository for bookmark sites.
#[derive(Debug, Clone)]
pub struct SiteRepository {
    pool: PgPool,
}

impl SiteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all visible sites, newest first.
    pub async fn list_active(&self) -> AppResult<Vec<Site>> {
        sqlx::query_as::<_, Site>(
            "SELECT * FROM sites WHERE active = TRUE ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list sites", e))
    }

    pub async fn create(&self, data: CreateSite) -> AppResult<Site> {
        sqlx::query_as::<_, Site>(
            "INSERT INTO sites (name, description, url) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create site", e))
    }

    /// Apply a partial update; `None` fields keep their current value.
    pub async fn update(&self, id: Uuid, data: UpdateSite) -> AppResult<Option<Site>> {
        sqlx::query_as::<_, Site>(
            "UPDATE sites SET \
                 name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 url = COALESCE($4, url), \
                 active = COALESCE($5, active), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.url)
        .bind(data.active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update site", e))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM sites WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete site", e))?;
        Ok(result.rows_affected() > 0)
    }
}
