//! HTTP-facing error type.
//!
//! `AppError` lives in promohub-core and `IntoResponse` in axum, so the
//! response mapping hangs off a local newtype. Handlers return
//! `Result<_, ApiError>`; the `From` impl lets `?` lift any `AppError`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use promohub_core::error::{AppError, ErrorKind};

/// `AppError` wrapped for use as an axum rejection.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, error_code) = match &err.kind {
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ErrorKind::InvalidReference => (StatusCode::BAD_REQUEST, "INVALID_REFERENCE"),
            ErrorKind::UnsupportedMediaType => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_MEDIA_TYPE")
            }
            ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
            ErrorKind::ServiceUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            ErrorKind::CycleDetected => {
                tracing::error!(error = %err.message, "Hierarchy cycle detected");
                (StatusCode::INTERNAL_SERVER_ERROR, "CYCLE_DETECTED")
            }
            ErrorKind::Database => {
                tracing::error!(error = %err.message, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR")
            }
            ErrorKind::Storage => {
                tracing::error!(error = %err.message, "Storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR")
            }
            ErrorKind::Configuration => {
                tracing::error!(error = %err.message, "Configuration error");
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR")
            }
            ErrorKind::Internal => {
                tracing::error!(error = %err.message, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message: err.message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn respond(err: AppError) -> Response {
        ApiError::from(err).into_response()
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = respond(AppError::not_found("Node not found"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_reference_maps_to_400() {
        let response = respond(AppError::invalid_reference("Bad parent"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unsupported_media_type_maps_to_415() {
        let response = respond(AppError::unsupported_media_type("nope"));
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_service_unavailable_maps_to_503() {
        let response = respond(AppError::service_unavailable("database down"));
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
