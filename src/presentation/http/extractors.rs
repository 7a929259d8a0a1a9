//! Custom Extractors
//!
//! Request body parsing that reports failures in the API error format.

use axum::extract::FromRequest;

use crate::shared::error::AppError;

/// JSON body extractor.
///
/// Same as [`axum::Json`], but a body that is malformed or has the wrong
/// shape is rejected with [`AppError::BadRequest`] instead of axum's
/// plain-text response.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
