//! Domain error taxonomy.
//!
//! Every expected business-rule violation is a [`DomainError`] variant with a
//! stable string code. Callers branch on [`DomainError::code`] or
//! [`DomainError::kind`], never on the message.

use super::value_objects::{GroupId, GroupName, StudentId, UserId};

/// Broad category of a domain error, used by transports to pick a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    AlreadyExists,
    DoesNotExist,
    InvalidParameters,
    CountInsufficient,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("Faculty name must not be empty")]
    FacultyNameEmpty,

    #[error("Faculty name must be at most {max} characters")]
    FacultyNameTooLong { max: usize },

    #[error("Group name must not be empty")]
    GroupNameEmpty,

    #[error("Group name must be at most {max} characters")]
    GroupNameTooLong { max: usize },

    #[error("A group named '{0}' already exists in this faculty")]
    GroupNameAlreadyExists(GroupName),

    #[error("Group {0} does not exist in this faculty")]
    GroupDoesNotExist(GroupId),

    #[error("User {0} is already a department head of this faculty")]
    DepartmentHeadIdAlreadyExists(UserId),

    #[error("User {0} is not a department head of this faculty")]
    DepartmentHeadIdDoesNotExist(UserId),

    #[error("At least 2 distinct groups are required to merge, got {count}")]
    MergeGroupCountInsufficient { count: usize },

    #[error("Cannot split a group of {students} students into {parts} groups")]
    InvalidSplitGroupParameters { students: usize, parts: usize },

    #[error("Cannot transfer student {student_id} from group {group_id} to itself")]
    InvalidTransfer {
        student_id: StudentId,
        group_id: GroupId,
    },

    #[error("Student {student_id} is already in group {group_id}")]
    StudentAlreadyInGroup {
        student_id: StudentId,
        group_id: GroupId,
    },

    #[error("Student {student_id} is not in group {group_id}")]
    StudentNotInGroup {
        student_id: StudentId,
        group_id: GroupId,
    },
}

impl DomainError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::FacultyNameEmpty => "FacultyName.Empty",
            Self::FacultyNameTooLong { .. } => "FacultyName.TooLong",
            Self::GroupNameEmpty => "GroupName.Empty",
            Self::GroupNameTooLong { .. } => "GroupName.TooLong",
            Self::GroupNameAlreadyExists(_) => "Faculty.GroupNameAlreadyExists",
            Self::GroupDoesNotExist(_) => "Faculty.GroupDoesNotExist",
            Self::DepartmentHeadIdAlreadyExists(_) => "Faculty.DepartmentHeadIdAlreadyExists",
            Self::DepartmentHeadIdDoesNotExist(_) => "Faculty.DepartmentHeadIdDoesNotExist",
            Self::MergeGroupCountInsufficient { .. } => "Faculty.MergeGroupCountInsufficient",
            Self::InvalidSplitGroupParameters { .. } => "Faculty.InvalidSplitGroupParameters",
            Self::InvalidTransfer { .. } => "Faculty.InvalidTransfer",
            Self::StudentAlreadyInGroup { .. } => "Group.StudentAlreadyInGroup",
            Self::StudentNotInGroup { .. } => "Group.StudentNotInGroup",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FacultyNameEmpty
            | Self::FacultyNameTooLong { .. }
            | Self::GroupNameEmpty
            | Self::GroupNameTooLong { .. } => ErrorKind::Validation,
            Self::GroupDoesNotExist(_) | Self::StudentNotInGroup { .. } => ErrorKind::NotFound,
            Self::GroupNameAlreadyExists(_)
            | Self::DepartmentHeadIdAlreadyExists(_)
            | Self::StudentAlreadyInGroup { .. } => ErrorKind::AlreadyExists,
            Self::DepartmentHeadIdDoesNotExist(_) => ErrorKind::DoesNotExist,
            Self::InvalidSplitGroupParameters { .. } | Self::InvalidTransfer { .. } => {
                ErrorKind::InvalidParameters
            }
            Self::MergeGroupCountInsufficient { .. } => ErrorKind::CountInsufficient,
        }
    }
}
