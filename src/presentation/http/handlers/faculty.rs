//! Faculty Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use super::faculty_error;
use crate::application::dto::request::{CreateFacultyRequest, UpdateFacultyRequest};
use crate::application::dto::response::{FacultyResponse, FacultySummaryResponse};
use crate::domain::{FacultyId, UserId};
use crate::presentation::http::extractors::AppJson;
use crate::shared::error::AppError;
use crate::shared::validation::{parse_id, validation_error};
use crate::startup::AppState;

/// Create a new faculty
pub async fn create_faculty(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateFacultyRequest>,
) -> Result<(StatusCode, Json<FacultyResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let faculty = state
        .faculty_service
        .create_faculty(body.name)
        .await
        .map_err(faculty_error)?;

    Ok((StatusCode::CREATED, Json(FacultyResponse::from(faculty))))
}

/// List all faculties
pub async fn list_faculties(
    State(state): State<AppState>,
) -> Result<Json<Vec<FacultySummaryResponse>>, AppError> {
    let faculties = state
        .faculty_service
        .list_faculties()
        .await
        .map_err(faculty_error)?;

    Ok(Json(
        faculties.into_iter().map(FacultySummaryResponse::from).collect(),
    ))
}

/// Get faculty by ID, groups included
pub async fn get_faculty(
    State(state): State<AppState>,
    Path(faculty_id): Path<String>,
) -> Result<Json<FacultyResponse>, AppError> {
    let faculty_id: FacultyId = parse_id(&faculty_id, "faculty")?;

    let faculty = state
        .faculty_service
        .get_faculty(faculty_id)
        .await
        .map_err(faculty_error)?;

    Ok(Json(FacultyResponse::from(faculty)))
}

/// Get faculty summary (group and department head counts only)
pub async fn get_faculty_summary(
    State(state): State<AppState>,
    Path(faculty_id): Path<String>,
) -> Result<Json<FacultySummaryResponse>, AppError> {
    let faculty_id: FacultyId = parse_id(&faculty_id, "faculty")?;

    let summary = state
        .faculty_service
        .get_faculty_summary(faculty_id)
        .await
        .map_err(faculty_error)?;

    Ok(Json(FacultySummaryResponse::from(summary)))
}

/// Rename faculty
pub async fn update_faculty(
    State(state): State<AppState>,
    Path(faculty_id): Path<String>,
    AppJson(body): AppJson<UpdateFacultyRequest>,
) -> Result<Json<FacultyResponse>, AppError> {
    let faculty_id: FacultyId = parse_id(&faculty_id, "faculty")?;
    body.validate().map_err(validation_error)?;

    let faculty = state
        .faculty_service
        .rename_faculty(faculty_id, body.name)
        .await
        .map_err(faculty_error)?;

    Ok(Json(FacultyResponse::from(faculty)))
}

/// Delete faculty
pub async fn delete_faculty(
    State(state): State<AppState>,
    Path(faculty_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let faculty_id: FacultyId = parse_id(&faculty_id, "faculty")?;

    state
        .faculty_service
        .delete_faculty(faculty_id)
        .await
        .map_err(faculty_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Assign a department head
pub async fn add_department_head(
    State(state): State<AppState>,
    Path((faculty_id, user_id)): Path<(String, String)>,
) -> Result<Json<FacultyResponse>, AppError> {
    let faculty_id: FacultyId = parse_id(&faculty_id, "faculty")?;
    let user_id: UserId = parse_id(&user_id, "user")?;

    let faculty = state
        .faculty_service
        .add_department_head(faculty_id, user_id)
        .await
        .map_err(faculty_error)?;

    Ok(Json(FacultyResponse::from(faculty)))
}

/// Unassign a department head
pub async fn remove_department_head(
    State(state): State<AppState>,
    Path((faculty_id, user_id)): Path<(String, String)>,
) -> Result<Json<FacultyResponse>, AppError> {
    let faculty_id: FacultyId = parse_id(&faculty_id, "faculty")?;
    let user_id: UserId = parse_id(&user_id, "user")?;

    let faculty = state
        .faculty_service
        .remove_department_head(faculty_id, user_id)
        .await
        .map_err(faculty_error)?;

    Ok(Json(FacultyResponse::from(faculty)))
}
