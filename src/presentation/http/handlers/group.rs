//! Group Handlers
//!
//! Groups live inside a faculty, so every route carries the faculty ID.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use super::faculty_error;
use crate::application::dto::request::{
    CreateGroupRequest, MergeGroupsRequest, SplitGroupRequest, TransferStudentRequest,
    UpdateGroupRequest,
};
use crate::application::dto::response::{
    GroupResponse, SplitGroupResponse, TransferStudentResponse,
};
use crate::application::services::{MergeGroupsDto, TransferStudentDto};
use crate::domain::{FacultyId, GroupId, StudentId};
use crate::presentation::http::extractors::AppJson;
use crate::shared::error::AppError;
use crate::shared::validation::{parse_id, validation_error};
use crate::startup::AppState;

fn parse_group_path(faculty_id: &str, group_id: &str) -> Result<(FacultyId, GroupId), AppError> {
    Ok((parse_id(faculty_id, "faculty")?, parse_id(group_id, "group")?))
}

/// Add a group to a faculty
pub async fn create_group(
    State(state): State<AppState>,
    Path(faculty_id): Path<String>,
    AppJson(body): AppJson<CreateGroupRequest>,
) -> Result<(StatusCode, Json<GroupResponse>), AppError> {
    let faculty_id: FacultyId = parse_id(&faculty_id, "faculty")?;
    body.validate().map_err(validation_error)?;

    let group = state
        .faculty_service
        .add_group(faculty_id, body.name)
        .await
        .map_err(faculty_error)?;

    Ok((StatusCode::CREATED, Json(GroupResponse::from(group))))
}

/// Get group by ID
pub async fn get_group(
    State(state): State<AppState>,
    Path((faculty_id, group_id)): Path<(String, String)>,
) -> Result<Json<GroupResponse>, AppError> {
    let (faculty_id, group_id) = parse_group_path(&faculty_id, &group_id)?;

    let group = state
        .faculty_service
        .get_group(faculty_id, group_id)
        .await
        .map_err(faculty_error)?;

    Ok(Json(GroupResponse::from(group)))
}

/// Rename group
pub async fn update_group(
    State(state): State<AppState>,
    Path((faculty_id, group_id)): Path<(String, String)>,
    AppJson(body): AppJson<UpdateGroupRequest>,
) -> Result<Json<GroupResponse>, AppError> {
    let (faculty_id, group_id) = parse_group_path(&faculty_id, &group_id)?;
    body.validate().map_err(validation_error)?;

    let group = state
        .faculty_service
        .rename_group(faculty_id, group_id, body.name)
        .await
        .map_err(faculty_error)?;

    Ok(Json(GroupResponse::from(group)))
}

/// Remove group
pub async fn delete_group(
    State(state): State<AppState>,
    Path((faculty_id, group_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let (faculty_id, group_id) = parse_group_path(&faculty_id, &group_id)?;

    state
        .faculty_service
        .remove_group(faculty_id, group_id)
        .await
        .map_err(faculty_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Merge groups into a new group
pub async fn merge_groups(
    State(state): State<AppState>,
    Path(faculty_id): Path<String>,
    AppJson(body): AppJson<MergeGroupsRequest>,
) -> Result<(StatusCode, Json<GroupResponse>), AppError> {
    let faculty_id: FacultyId = parse_id(&faculty_id, "faculty")?;
    let group_ids = body
        .group_ids
        .iter()
        .map(|id| parse_id::<GroupId>(id, "group"))
        .collect::<Result<Vec<_>, _>>()?;

    let merged = state
        .faculty_service
        .merge_groups(
            faculty_id,
            MergeGroupsDto {
                group_ids,
                remove_sources: body.remove_sources,
            },
        )
        .await
        .map_err(faculty_error)?;

    Ok((StatusCode::CREATED, Json(GroupResponse::from(merged))))
}

/// Split a group into parts
pub async fn split_group(
    State(state): State<AppState>,
    Path((faculty_id, group_id)): Path<(String, String)>,
    AppJson(body): AppJson<SplitGroupRequest>,
) -> Result<(StatusCode, Json<SplitGroupResponse>), AppError> {
    let (faculty_id, group_id) = parse_group_path(&faculty_id, &group_id)?;
    let number_of_groups = usize::try_from(body.number_of_groups).unwrap_or(0);

    let parts = state
        .faculty_service
        .split_group(faculty_id, group_id, number_of_groups)
        .await
        .map_err(faculty_error)?;

    Ok((
        StatusCode::CREATED,
        Json(SplitGroupResponse {
            groups: parts.into_iter().map(GroupResponse::from).collect(),
        }),
    ))
}

/// Enrol a student in a group
pub async fn add_student(
    State(state): State<AppState>,
    Path((faculty_id, group_id, student_id)): Path<(String, String, String)>,
) -> Result<Json<GroupResponse>, AppError> {
    let (faculty_id, group_id) = parse_group_path(&faculty_id, &group_id)?;
    let student_id: StudentId = parse_id(&student_id, "student")?;

    let group = state
        .faculty_service
        .add_student(faculty_id, group_id, student_id)
        .await
        .map_err(faculty_error)?;

    Ok(Json(GroupResponse::from(group)))
}

/// Drop a student from a group
pub async fn remove_student(
    State(state): State<AppState>,
    Path((faculty_id, group_id, student_id)): Path<(String, String, String)>,
) -> Result<Json<GroupResponse>, AppError> {
    let (faculty_id, group_id) = parse_group_path(&faculty_id, &group_id)?;
    let student_id: StudentId = parse_id(&student_id, "student")?;

    let group = state
        .faculty_service
        .remove_student(faculty_id, group_id, student_id)
        .await
        .map_err(faculty_error)?;

    Ok(Json(GroupResponse::from(group)))
}

/// Move a student between groups
pub async fn transfer_student(
    State(state): State<AppState>,
    Path((faculty_id, student_id)): Path<(String, String)>,
    AppJson(body): AppJson<TransferStudentRequest>,
) -> Result<Json<TransferStudentResponse>, AppError> {
    let faculty_id: FacultyId = parse_id(&faculty_id, "faculty")?;
    let student_id: StudentId = parse_id(&student_id, "student")?;
    let request = TransferStudentDto {
        from_group_id: parse_id(&body.from_group_id, "group")?,
        to_group_id: parse_id(&body.to_group_id, "group")?,
    };

    let result = state
        .faculty_service
        .transfer_student(faculty_id, student_id, request)
        .await
        .map_err(faculty_error)?;

    Ok(Json(TransferStudentResponse::from(result)))
}
