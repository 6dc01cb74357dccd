//! Error types for cellar.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    /// Malformed or out-of-range input, naming the offending field.
    #[error("Validation error on `{field}`: {message}")]
    Validation { field: String, message: String },

    /// One or more ids supplied by the caller do not exist.
    #[error("Referenced {entity} not found: {ids:?}")]
    ReferenceNotFound { entity: &'static str, ids: Vec<i32> },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    // === Server Errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Build a validation error for a named field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Build a reference error; ids are reported sorted and deduplicated.
    #[must_use]
    pub fn reference_not_found(entity: &'static str, mut ids: Vec<i32>) -> Self {
        ids.sort_unstable();
        ids.dedup();
        Self::ReferenceNotFound { entity, ids }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::ReferenceNotFound { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::AlreadyExists(_) => StatusCode::CONFLICT,

            // 5xx Server Errors
            Self::Database(_) | Self::Storage(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::ReferenceNotFound { .. } => "REFERENCE_NOT_FOUND",
            Self::NotFound(_) => "NOT_FOUND",
            Self::AlreadyExists(_) => "ALREADY_EXISTS",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        let mut error = json!({
            "code": code,
            "message": self.to_string(),
        });
        match &self {
            Self::Validation { field, .. } => error["field"] = json!(field),
            Self::ReferenceNotFound { entity, ids } => {
                error["entity"] = json!(entity);
                error["ids"] = json!(ids);
            }
            _ => {}
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let field = err
            .field_errors()
            .keys()
            .min()
            .map_or_else(|| "request".to_string(), ToString::to_string);
        Self::Validation {
            field,
            message: err.to_string(),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_not_found_sorts_and_dedups() {
        let err = AppError::reference_not_found("grape", vec![7, 3, 7, 1]);
        match err {
            AppError::ReferenceNotFound { entity, ids } => {
                assert_eq!(entity, "grape");
                assert_eq!(ids, vec![1, 3, 7]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::validation("name", "blank").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::reference_not_found("origin", vec![9]).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::NotFound("wine 1".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::AlreadyExists("review".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert!(AppError::Database("down".to_string()).is_server_error());
    }

    #[test]
    fn test_validation_message_names_field() {
        let err = AppError::validation("vintage_year", "must be between 1800 and 2200");
        assert_eq!(
            err.to_string(),
            "Validation error on `vintage_year`: must be between 1800 and 2200"
        );
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::AlreadyExists("review".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
