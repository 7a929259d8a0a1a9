//! Response DTOs
//!
//! Data structures for API response bodies.

use serde::Serialize;

use crate::application::services::{
    FacultyDto, FacultySummaryDto, GroupDto, TransferResultDto,
};

/// Group response
#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub id: String,
    pub faculty_id: String,
    pub name: String,
    pub student_ids: Vec<String>,
    pub student_count: usize,
    pub created_at: String,
}

impl From<GroupDto> for GroupResponse {
    fn from(dto: GroupDto) -> Self {
        Self {
            student_count: dto.student_ids.len(),
            id: dto.id,
            faculty_id: dto.faculty_id,
            name: dto.name,
            student_ids: dto.student_ids,
            created_at: dto.created_at,
        }
    }
}

/// Faculty response, groups included
#[derive(Debug, Serialize)]
pub struct FacultyResponse {
    pub id: String,
    pub name: String,
    pub groups: Vec<GroupResponse>,
    pub department_head_ids: Vec<String>,
    pub version: u64,
    pub created_at: String,
}

impl From<FacultyDto> for FacultyResponse {
    fn from(dto: FacultyDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            groups: dto.groups.into_iter().map(GroupResponse::from).collect(),
            department_head_ids: dto.department_head_ids,
            version: dto.version,
            created_at: dto.created_at,
        }
    }
}

/// Faculty list entry
#[derive(Debug, Serialize)]
pub struct FacultySummaryResponse {
    pub id: String,
    pub name: String,
    pub group_count: usize,
    pub department_head_count: usize,
    pub version: u64,
    pub created_at: String,
}

impl From<FacultySummaryDto> for FacultySummaryResponse {
    fn from(dto: FacultySummaryDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            group_count: dto.group_count,
            department_head_count: dto.department_head_count,
            version: dto.version,
            created_at: dto.created_at,
        }
    }
}

/// Split group response
#[derive(Debug, Serialize)]
pub struct SplitGroupResponse {
    pub groups: Vec<GroupResponse>,
}

/// Transfer student response
#[derive(Debug, Serialize)]
pub struct TransferStudentResponse {
    pub from: GroupResponse,
    pub to: GroupResponse,
}

impl From<TransferResultDto> for TransferStudentResponse {
    fn from(dto: TransferResultDto) -> Self {
        Self {
            from: dto.from.into(),
            to: dto.to.into(),
        }
    }
}
