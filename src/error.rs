//! Application error type and its HTTP mapping.
//!
//! Every handler returns `Result<_, AppError>`. The error renders as a JSON
//! envelope:
//!
//! ```json
//! { "error": { "code": "conflict", "message": "...", "details": {} } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::domain::repositories::StoreError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },
    #[error("{message}")]
    NotFound { message: String, details: Value },
    #[error("{message}")]
    Conflict { message: String, details: Value },
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into its serializable payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::Conflict { message, details } => ("conflict", message, details),
            AppError::Internal { message, details } => ("internal_error", message, details),
        };

        ErrorInfo {
            code,
            message: message.clone(),
            details: details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey(key) => AppError::conflict(
                format!("Short key '{key}' already exists"),
                json!({ "short_key": key }),
            ),
            other => {
                tracing::error!(error = %other, "Store operation failed");

                let message = match other {
                    StoreError::Timeout(_) => "Store operation timed out",
                    StoreError::Unavailable(_) => "Store unavailable",
                    _ => "Store error",
                };

                AppError::internal(message, json!({}))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_maps_to_conflict() {
        let err: AppError = StoreError::DuplicateKey("AbCd_123".to_string()).into();

        assert!(matches!(err, AppError::Conflict { .. }));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(err.to_string().contains("AbCd_123"));
    }

    #[test]
    fn test_backend_errors_map_to_internal() {
        let err: AppError = StoreError::Unavailable("pool closed".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err: AppError = StoreError::Query("syntax error".to_string()).into();
        assert_eq!(err.to_error_info().code, "internal_error");
        assert!(!err.to_string().contains("syntax error"));
    }

    #[test]
    fn test_error_info_codes() {
        assert_eq!(
            AppError::bad_request("bad", json!({})).to_error_info().code,
            "validation_error"
        );
        assert_eq!(
            AppError::not_found("missing", json!({})).to_error_info().code,
            "not_found"
        );
        assert_eq!(
            AppError::conflict("taken", json!({})).to_error_info().code,
            "conflict"
        );
    }
}
