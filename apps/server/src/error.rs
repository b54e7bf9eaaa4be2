//! API error types and their HTTP mapping.
//!
//! ## Error Flow
//! ```text
//!   ValidationError ──► 400 Bad Request
//!   DbError::NotFound ──► 404 Not Found
//!   business conflicts ──► 409 Conflict
//!     (insufficient stock, no open session, duplicates)
//!   everything else ──► 500, details logged, generic body
//! ```
//! Responses carry a stable machine-readable code next to the human
//! message:
//! ```json
//! { "code": "CONFLICT", "message": "Insufficient stock for item: ..." }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use till_core::error::{CoreError, ValidationError};
use till_db::DbError;

/// API-level errors, already shaped for an HTTP response.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Validation(_) => "VALIDATION",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal details stay in the log, not in the response body.
        let message = match &self {
            ApiError::Internal(detail) => {
                error!(detail, "Internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "code": self.code(),
            "message": message,
        }));

        (status, body).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::NotFound(err.to_string()),

            DbError::UniqueViolation { .. }
            | DbError::ForeignKeyViolation { .. }
            | DbError::InsufficientStock { .. }
            | DbError::NoOpenSession { .. } => ApiError::Conflict(err.to_string()),

            DbError::InvalidTimeRange { .. } => ApiError::Validation(err.to_string()),

            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InsufficientStock { .. } => ApiError::Conflict(err.to_string()),
            CoreError::TimeOutBeforeTimeIn { .. } => ApiError::Validation(err.to_string()),
            CoreError::Validation(inner) => inner.into(),
        }
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_409() {
        let err: ApiError = DbError::InsufficientStock {
            name: "Amber Leaf".to_string(),
            available: 5,
            requested: 6,
        }
        .into();

        assert!(matches!(err, ApiError::Conflict(_)));
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn no_open_session_maps_to_409() {
        let err: ApiError = DbError::NoOpenSession {
            user_id: 1,
            date: "2026-08-17".parse().unwrap(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn invalid_time_range_maps_to_400() {
        let err: ApiError = DbError::InvalidTimeRange {
            time_in: "09:00:00".parse().unwrap(),
            time_out: "08:00:00".parse().unwrap(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
