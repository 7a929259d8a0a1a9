//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

pub mod faculty;
pub mod group;
pub mod health;

use crate::application::services::FacultyError;
use crate::shared::error::AppError;

/// Map a faculty service error onto the HTTP error type.
pub(crate) fn faculty_error(error: FacultyError) -> AppError {
    match error {
        FacultyError::NotFound(id) => AppError::NotFound(format!("Faculty {} not found", id)),
        FacultyError::Domain(e) => AppError::Domain(e),
        e @ FacultyError::ConcurrencyConflict(_) => AppError::ConcurrencyConflict(e.to_string()),
        FacultyError::Internal(msg) => AppError::Internal(msg),
    }
}
