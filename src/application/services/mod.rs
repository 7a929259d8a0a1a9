//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **FacultyService**: Faculties, groups, memberships, department heads,
//!   merge and split

pub mod faculty_service;

pub use faculty_service::{
    FacultyDto, FacultyError, FacultyService, FacultyServiceImpl, FacultySummaryDto, GroupDto,
    MergeGroupsDto, TransferResultDto, TransferStudentDto,
};
