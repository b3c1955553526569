//! Health check handlers.

use axum::Json;
use axum::extract::State;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/health
///
/// Probes the database; a failed probe surfaces as 503.
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.health_check().await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "data": { "status": "ok", "database": "up" }
    })))
}
