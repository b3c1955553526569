//! Bookmark site handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;
use validator::Validate;

use promohub_core::error::AppError;
use promohub_entity::site::{CreateSite, UpdateSite};

use crate::dto::request::{CreateSiteRequest, UpdateSiteRequest};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/sites
pub async fn list_sites(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let sites = state.site_service.list_sites().await?;
    Ok(Json(serde_json::json!({ "success": true, "data": sites })))
}

/// POST /api/sites
pub async fn create_site(
    State(state): State<AppState>,
    Json(req): Json<CreateSiteRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let site = state
        .site_service
        .create_site(CreateSite {
            name: req.name,
            description: req.description,
            url: req.url,
        })
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": site })))
}

/// PUT /api/sites/{id}
pub async fn update_site(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSiteRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let site = state
        .site_service
        .update_site(
            id,
            UpdateSite {
                name: req.name,
                description: req.description,
                url: req.url,
                active: req.active,
            },
        )
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": site })))
}

/// DELETE /api/sites/{id}
pub async fn delete_site(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.site_service.delete_site(id).await? {
        return Err(AppError::not_found(format!("Site not found: {id}")).into());
    }
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "message": "Site deleted" } }),
    ))
}
