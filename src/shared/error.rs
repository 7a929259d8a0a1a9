//! Application Error Types
//!
//! Centralized error handling with Axum integration.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::{DomainError, ErrorKind};

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The stored aggregate changed after it was loaded.
    #[error("Concurrency conflict: {0}")]
    ConcurrencyConflict(String),

    /// Request body failed field validation; every failing field is reported.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    /// Stable string code, e.g. `Faculty.GroupDoesNotExist`
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// Field-level validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

fn domain_status(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation | ErrorKind::InvalidParameters | ErrorKind::CountInsufficient => {
            StatusCode::BAD_REQUEST
        }
        ErrorKind::NotFound | ErrorKind::DoesNotExist => StatusCode::NOT_FOUND,
        ErrorKind::AlreadyExists => StatusCode::CONFLICT,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut errors = None;
        let (status, code, error, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, 10001, "NotFound", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, 10002, "BadRequest", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, 10005, "Conflict", msg),
            AppError::Validation {
                message,
                errors: fields,
            } => {
                errors = Some(fields);
                (StatusCode::BAD_REQUEST, 10007, "Validation", message)
            }
            AppError::ConcurrencyConflict(msg) => (
                StatusCode::CONFLICT,
                10008,
                "Faculty.ConcurrencyConflict",
                msg,
            ),
            AppError::Domain(e) => (domain_status(e.kind()), 10009, e.code(), e.to_string()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    10000,
                    "Internal",
                    "Internal server error".into(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    10000,
                    "Internal",
                    "Internal server error".into(),
                )
            }
        };

        let body = ErrorResponse {
            code,
            error,
            message,
            errors,
        };

        (status, Json(body)).into_response()
    }
}
