//! Node hierarchy handlers: tree, CRUD, upload, reorder, duplicate, archive.

use std::sync::Arc;

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use validator::Validate;

use promohub_core::error::AppError;
use promohub_service::UploadFile;

use crate::dto::request::{
    CreateDirectoryRequest, RecentQuery, RenameNodeRequest, ReorderRequest, SearchQuery,
};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/nodes/tree
pub async fn get_tree(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let tree = state.node_service.list_tree().await?;
    Ok(Json(serde_json::json!({ "success": true, "data": tree })))
}

/// GET /api/nodes/recent?limit=...
pub async fn recent_files(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let files = state.node_service.recent_files(query.limit).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": files })))
}

/// GET /api/nodes/search?keyword=...
pub async fn search_nodes(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let nodes = state.node_service.search(&query.keyword).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": nodes })))
}

/// GET /api/nodes/{id}
pub async fn get_node(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let node = state.node_service.get_node(id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": node })))
}

/// GET /api/nodes/children — root-level nodes
pub async fn list_root_children(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let children = state.node_service.list_children(None).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": children }),
    ))
}

/// GET /api/nodes/{id}/children
pub async fn list_children(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let children = state.node_service.list_children(Some(id)).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": children }),
    ))
}

/// POST /api/nodes/directories
pub async fn create_directory(
    State(state): State<AppState>,
    Json(req): Json<CreateDirectoryRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let node = state
        .node_service
        .create_directory(&req.name, req.parent_id)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": node })))
}

/// POST /api/nodes/files — multipart upload
///
/// Fields: optional `parent_id` text field plus up to five file fields.
pub async fn upload_files(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut parent_id: Option<Uuid> = None;
    let mut files: Vec<UploadFile> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "parent_id" {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?;
            if !text.is_empty() {
                parent_id = Some(
                    text.parse::<Uuid>()
                        .map_err(|_| AppError::validation("Invalid parent_id"))?,
                );
            }
        } else if field.file_name().is_some() {
            let filename = field.file_name().unwrap_or("unnamed").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?;
            files.push(UploadFile {
                filename,
                content_type,
                data,
            });
        }
    }

    let created = state.upload_service.upload_files(parent_id, files).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": created })))
}

/// PUT /api/nodes/{id} — rename
pub async fn rename_node(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RenameNodeRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let node = state.node_service.rename_node(id, &req.name).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": node })))
}

/// PUT /api/nodes/order
pub async fn reorder_nodes(
    State(state): State<AppState>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .node_service
        .reorder_siblings(req.parent_id, req.updates)
        .await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "message": "Order updated" } }),
    ))
}

/// POST /api/nodes/{id}/duplicate
pub async fn duplicate_node(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let copy = state.node_service.duplicate_subtree(id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": copy })))
}

/// DELETE /api/nodes/{id}
pub async fn delete_node(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.node_service.delete_node(id).await? {
        return Err(AppError::not_found(format!("Node not found: {id}")).into());
    }
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "message": "Node deleted" } }),
    ))
}

/// GET /api/nodes/{id}/archive — zip download
///
/// The export runs on its own task; dropping this handler (client
/// disconnect) cancels it through the token's drop guard.
pub async fn download_archive(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let token = CancellationToken::new();
    let _cancel_on_disconnect = token.clone().drop_guard();

    let archive = Arc::clone(&state.archive_service);
    let export = tokio::spawn(async move { archive.export_directory(id, &token).await })
        .await
        .map_err(|e| AppError::internal(format!("Archive task failed: {e}")))??;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/zip")
        .header(
            header::CONTENT_DISPOSITION,
            attachment_disposition(&export.filename),
        )
        .header(header::CONTENT_LENGTH, export.data.len())
        .body(Body::from(export.data))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}

/// Build a `Content-Disposition` attachment value with the filename
/// neutralized for the quoted-string grammar. Quotes, backslashes, and
/// control characters would otherwise break out of the quoted value.
fn attachment_disposition(filename: &str) -> String {
    let safe: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("attachment; filename=\"{safe}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_disposition_plain_name() {
        assert_eq!(
            attachment_disposition("Summer Campaign.zip"),
            "attachment; filename=\"Summer Campaign.zip\""
        );
    }

    #[test]
    fn test_attachment_disposition_neutralizes_quotes_and_controls() {
        assert_eq!(
            attachment_disposition("evil\"; rm -rf\u{1}.zip"),
            "attachment; filename=\"evil_; rm -rf_.zip\""
        );
        assert_eq!(
            attachment_disposition("back\\slash.zip"),
            "attachment; filename=\"back_slash.zip\""
        );
    }
}
