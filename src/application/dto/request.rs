//! Request DTOs
//!
//! Data structures for API request bodies.
//! IDs arrive as decimal strings and are parsed by the handlers.

use serde::Deserialize;
use validator::Validate;

/// Create faculty request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFacultyRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// Rename faculty request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFacultyRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// Create group request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,
}

/// Rename group request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateGroupRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,
}

/// Merge groups request
#[derive(Debug, Deserialize)]
pub struct MergeGroupsRequest {
    pub group_ids: Vec<String>,

    /// Replace the sources with the merged group.
    #[serde(default)]
    pub remove_sources: bool,
}

/// Split group request
///
/// Signed so that a negative count reaches the domain check instead of
/// failing deserialization.
#[derive(Debug, Deserialize)]
pub struct SplitGroupRequest {
    pub number_of_groups: i64,
}

/// Transfer student request
#[derive(Debug, Deserialize)]
pub struct TransferStudentRequest {
    pub from_group_id: String,
    pub to_group_id: String,
}
