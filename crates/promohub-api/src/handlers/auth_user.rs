//! Authorized-user handlers.

use axum::Json;
use axum::extract::State;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/auth-users
pub async fn list_auth_users(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let users = state.auth_user_service.list_auth_users().await?;
    Ok(Json(serde_json::json!({ "success": true, "data": users })))
}
