//! Faculty Service
//!
//! Handles faculty, group, membership and department head operations.
//!
//! Every command loads the full aggregate, applies one domain operation to
//! the loaded copy and saves it back with a version check. A command that
//! fails never reaches the repository, so nothing is partially stored.

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexSet;

use crate::domain::{
    DomainError, Faculty, FacultyId, FacultyName, FacultyRepository, FacultySummary, Group,
    GroupId, GroupName, StudentId, UserId,
};
use crate::infrastructure::metrics::record_faculty_operation;
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Faculty service trait
#[async_trait]
pub trait FacultyService: Send + Sync {
    /// Create a new faculty with no groups
    async fn create_faculty(&self, name: String) -> Result<FacultyDto, FacultyError>;

    /// Get a faculty with its groups
    async fn get_faculty(&self, faculty_id: FacultyId) -> Result<FacultyDto, FacultyError>;

    /// Get a faculty header without loading its groups
    async fn get_faculty_summary(
        &self,
        faculty_id: FacultyId,
    ) -> Result<FacultySummaryDto, FacultyError>;

    /// List faculty summaries ordered by ID
    async fn list_faculties(&self) -> Result<Vec<FacultySummaryDto>, FacultyError>;

    /// Rename a faculty
    async fn rename_faculty(
        &self,
        faculty_id: FacultyId,
        name: String,
    ) -> Result<FacultyDto, FacultyError>;

    /// Delete a faculty and all of its groups
    async fn delete_faculty(&self, faculty_id: FacultyId) -> Result<(), FacultyError>;

    /// Add an empty group
    async fn add_group(&self, faculty_id: FacultyId, name: String) -> Result<GroupDto, FacultyError>;

    /// Get one group of a faculty
    async fn get_group(&self, faculty_id: FacultyId, group_id: GroupId)
        -> Result<GroupDto, FacultyError>;

    /// Rename a group
    async fn rename_group(
        &self,
        faculty_id: FacultyId,
        group_id: GroupId,
        name: String,
    ) -> Result<GroupDto, FacultyError>;

    /// Remove a group
    async fn remove_group(&self, faculty_id: FacultyId, group_id: GroupId)
        -> Result<(), FacultyError>;

    /// Enrol a student in a group
    async fn add_student(
        &self,
        faculty_id: FacultyId,
        group_id: GroupId,
        student_id: StudentId,
    ) -> Result<GroupDto, FacultyError>;

    /// Drop a student from a group
    async fn remove_student(
        &self,
        faculty_id: FacultyId,
        group_id: GroupId,
        student_id: StudentId,
    ) -> Result<GroupDto, FacultyError>;

    /// Move a student between two groups of the same faculty
    async fn transfer_student(
        &self,
        faculty_id: FacultyId,
        student_id: StudentId,
        request: TransferStudentDto,
    ) -> Result<TransferResultDto, FacultyError>;

    /// Assign a department head
    async fn add_department_head(
        &self,
        faculty_id: FacultyId,
        user_id: UserId,
    ) -> Result<FacultyDto, FacultyError>;

    /// Unassign a department head
    async fn remove_department_head(
        &self,
        faculty_id: FacultyId,
        user_id: UserId,
    ) -> Result<FacultyDto, FacultyError>;

    /// Merge groups into a new one, optionally removing the sources
    async fn merge_groups(
        &self,
        faculty_id: FacultyId,
        request: MergeGroupsDto,
    ) -> Result<GroupDto, FacultyError>;

    /// Split a group into equal-sized parts
    async fn split_group(
        &self,
        faculty_id: FacultyId,
        group_id: GroupId,
        number_of_groups: usize,
    ) -> Result<Vec<GroupDto>, FacultyError>;
}

/// Merge groups request
#[derive(Debug, Clone)]
pub struct MergeGroupsDto {
    pub group_ids: Vec<GroupId>,
    /// Remove the source groups in the same save as the merge.
    pub remove_sources: bool,
}

/// Transfer student request
#[derive(Debug, Clone, Copy)]
pub struct TransferStudentDto {
    pub from_group_id: GroupId,
    pub to_group_id: GroupId,
}

/// Group data transfer object
#[derive(Debug, Clone, PartialEq)]
pub struct GroupDto {
    pub id: String,
    pub faculty_id: String,
    pub name: String,
    pub student_ids: Vec<String>,
    pub created_at: String,
}

impl From<&Group> for GroupDto {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id().to_string(),
            faculty_id: group.faculty_id().to_string(),
            name: group.name().to_string(),
            student_ids: group.student_ids().iter().map(|s| s.to_string()).collect(),
            created_at: group.id().snowflake().created_at().to_rfc3339(),
        }
    }
}

/// Faculty data transfer object, groups included
#[derive(Debug, Clone, PartialEq)]
pub struct FacultyDto {
    pub id: String,
    pub name: String,
    pub groups: Vec<GroupDto>,
    pub department_head_ids: Vec<String>,
    pub version: u64,
    pub created_at: String,
}

impl From<&Faculty> for FacultyDto {
    fn from(faculty: &Faculty) -> Self {
        Self {
            id: faculty.id().to_string(),
            name: faculty.name().to_string(),
            groups: faculty.groups().iter().map(GroupDto::from).collect(),
            department_head_ids: faculty
                .department_head_ids()
                .iter()
                .map(|u| u.to_string())
                .collect(),
            version: faculty.version(),
            created_at: faculty.id().snowflake().created_at().to_rfc3339(),
        }
    }
}

/// Faculty summary data transfer object
#[derive(Debug, Clone, PartialEq)]
pub struct FacultySummaryDto {
    pub id: String,
    pub name: String,
    pub group_count: usize,
    pub department_head_count: usize,
    pub version: u64,
    pub created_at: String,
}

impl From<FacultySummary> for FacultySummaryDto {
    fn from(summary: FacultySummary) -> Self {
        Self {
            id: summary.id.to_string(),
            name: summary.name.to_string(),
            group_count: summary.group_count,
            department_head_count: summary.department_head_count,
            version: summary.version,
            created_at: summary.id.snowflake().created_at().to_rfc3339(),
        }
    }
}

/// Result of a student transfer: both groups after the move
#[derive(Debug, Clone, PartialEq)]
pub struct TransferResultDto {
    pub from: GroupDto,
    pub to: GroupDto,
}

/// Faculty service errors
#[derive(Debug, thiserror::Error)]
pub enum FacultyError {
    #[error("Faculty {0} not found")]
    NotFound(FacultyId),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Faculty {0} was modified by another request")]
    ConcurrencyConflict(FacultyId),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FacultyError {
    /// Stable string code of the error
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "Faculty.NotFound",
            Self::Domain(e) => e.code(),
            Self::ConcurrencyConflict(_) => "Faculty.ConcurrencyConflict",
            Self::Internal(_) => "Internal",
        }
    }

    fn outcome(&self) -> &'static str {
        match self {
            Self::NotFound(_) | Self::Domain(_) => "rejected",
            Self::ConcurrencyConflict(_) => "conflict",
            Self::Internal(_) => "error",
        }
    }

    fn from_storage(faculty_id: FacultyId, error: AppError) -> Self {
        match error {
            AppError::NotFound(_) => Self::NotFound(faculty_id),
            AppError::ConcurrencyConflict(_) => Self::ConcurrencyConflict(faculty_id),
            AppError::Domain(e) => Self::Domain(e),
            other => Self::Internal(other.to_string()),
        }
    }
}

/// FacultyService implementation
pub struct FacultyServiceImpl<R>
where
    R: FacultyRepository,
{
    faculty_repo: Arc<R>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<R> FacultyServiceImpl<R>
where
    R: FacultyRepository,
{
    pub fn new(faculty_repo: Arc<R>, id_generator: Arc<SnowflakeGenerator>) -> Self {
        Self {
            faculty_repo,
            id_generator,
        }
    }

    async fn load(&self, faculty_id: FacultyId) -> Result<Faculty, FacultyError> {
        self.faculty_repo
            .find_by_id_with_groups(faculty_id)
            .await
            .map_err(|e| FacultyError::from_storage(faculty_id, e))?
            .ok_or(FacultyError::NotFound(faculty_id))
    }

    /// Load, mutate and save one aggregate.
    ///
    /// `command` runs against the loaded copy; its output is returned along
    /// with the aggregate as saved.
    async fn execute<T, F>(
        &self,
        operation: &'static str,
        faculty_id: FacultyId,
        command: F,
    ) -> Result<(T, Faculty), FacultyError>
    where
        F: FnOnce(&mut Faculty, &SnowflakeGenerator) -> Result<T, DomainError> + Send,
        T: Send,
    {
        let result = async {
            let mut faculty = self.load(faculty_id).await?;
            let output = command(&mut faculty, &self.id_generator)?;
            let saved = self
                .faculty_repo
                .update(&faculty)
                .await
                .map_err(|e| FacultyError::from_storage(faculty_id, e))?;
            Ok::<_, FacultyError>((output, saved))
        }
        .await;

        self.record(operation, faculty_id, &result);
        result
    }

    fn record<T>(&self, operation: &'static str, faculty_id: FacultyId, result: &Result<T, FacultyError>) {
        match result {
            Ok(_) => {
                record_faculty_operation(operation, "ok");
                tracing::info!(operation, faculty_id = %faculty_id, "Faculty command applied");
            }
            Err(e @ FacultyError::Internal(_)) => {
                record_faculty_operation(operation, e.outcome());
                tracing::error!(operation, faculty_id = %faculty_id, error = %e, "Faculty command failed");
            }
            Err(e) => {
                record_faculty_operation(operation, e.outcome());
                tracing::debug!(
                    operation,
                    faculty_id = %faculty_id,
                    code = e.code(),
                    "Faculty command rejected: {}",
                    e
                );
            }
        }
    }
}

#[async_trait]
impl<R> FacultyService for FacultyServiceImpl<R>
where
    R: FacultyRepository + 'static,
{
    async fn create_faculty(&self, name: String) -> Result<FacultyDto, FacultyError> {
        let faculty_id = self.id_generator.next_faculty_id();
        let result = async {
            let name = FacultyName::new(&name)?;
            let faculty = Faculty::new(faculty_id, name);
            self.faculty_repo
                .create(&faculty)
                .await
                .map_err(|e| FacultyError::from_storage(faculty_id, e))
        }
        .await;

        self.record("create_faculty", faculty_id, &result);
        result.map(|f| FacultyDto::from(&f))
    }

    async fn get_faculty(&self, faculty_id: FacultyId) -> Result<FacultyDto, FacultyError> {
        let faculty = self.load(faculty_id).await?;
        Ok(FacultyDto::from(&faculty))
    }

    async fn get_faculty_summary(
        &self,
        faculty_id: FacultyId,
    ) -> Result<FacultySummaryDto, FacultyError> {
        self.faculty_repo
            .find_by_id(faculty_id)
            .await
            .map_err(|e| FacultyError::from_storage(faculty_id, e))?
            .map(FacultySummaryDto::from)
            .ok_or(FacultyError::NotFound(faculty_id))
    }

    async fn list_faculties(&self) -> Result<Vec<FacultySummaryDto>, FacultyError> {
        let summaries = self
            .faculty_repo
            .list()
            .await
            .map_err(|e| FacultyError::Internal(e.to_string()))?;

        Ok(summaries.into_iter().map(FacultySummaryDto::from).collect())
    }

    async fn rename_faculty(
        &self,
        faculty_id: FacultyId,
        name: String,
    ) -> Result<FacultyDto, FacultyError> {
        let (_, saved) = self
            .execute("rename_faculty", faculty_id, |faculty, _| {
                faculty.rename(FacultyName::new(&name)?);
                Ok(())
            })
            .await?;

        Ok(FacultyDto::from(&saved))
    }

    async fn delete_faculty(&self, faculty_id: FacultyId) -> Result<(), FacultyError> {
        let result = self
            .faculty_repo
            .delete(faculty_id)
            .await
            .map_err(|e| FacultyError::from_storage(faculty_id, e));

        self.record("delete_faculty", faculty_id, &result);
        result
    }

    async fn add_group(&self, faculty_id: FacultyId, name: String) -> Result<GroupDto, FacultyError> {
        let (group, _) = self
            .execute("add_group", faculty_id, |faculty, ids| {
                let name = GroupName::new(&name)?;
                faculty
                    .add_group(ids.next_group_id(), name)
                    .map(GroupDto::from)
            })
            .await?;

        Ok(group)
    }

    async fn get_group(
        &self,
        faculty_id: FacultyId,
        group_id: GroupId,
    ) -> Result<GroupDto, FacultyError> {
        let faculty = self.load(faculty_id).await?;
        faculty
            .get_group_by_id(group_id)
            .map(GroupDto::from)
            .ok_or(FacultyError::Domain(DomainError::GroupDoesNotExist(group_id)))
    }

    async fn rename_group(
        &self,
        faculty_id: FacultyId,
        group_id: GroupId,
        name: String,
    ) -> Result<GroupDto, FacultyError> {
        let (group, _) = self
            .execute("rename_group", faculty_id, |faculty, _| {
                let name = GroupName::new(&name)?;
                faculty.update_group(group_id, name).map(GroupDto::from)
            })
            .await?;

        Ok(group)
    }

    async fn remove_group(
        &self,
        faculty_id: FacultyId,
        group_id: GroupId,
    ) -> Result<(), FacultyError> {
        self.execute("remove_group", faculty_id, |faculty, _| {
            faculty.remove_group(group_id).map(|_| ())
        })
        .await?;

        Ok(())
    }

    async fn add_student(
        &self,
        faculty_id: FacultyId,
        group_id: GroupId,
        student_id: StudentId,
    ) -> Result<GroupDto, FacultyError> {
        let (group, _) = self
            .execute("add_student", faculty_id, |faculty, _| {
                faculty
                    .add_student_to_group(group_id, student_id)
                    .map(GroupDto::from)
            })
            .await?;

        Ok(group)
    }

    async fn remove_student(
        &self,
        faculty_id: FacultyId,
        group_id: GroupId,
        student_id: StudentId,
    ) -> Result<GroupDto, FacultyError> {
        let (group, _) = self
            .execute("remove_student", faculty_id, |faculty, _| {
                faculty
                    .remove_student_from_group(group_id, student_id)
                    .map(GroupDto::from)
            })
            .await?;

        Ok(group)
    }

    async fn transfer_student(
        &self,
        faculty_id: FacultyId,
        student_id: StudentId,
        request: TransferStudentDto,
    ) -> Result<TransferResultDto, FacultyError> {
        let TransferStudentDto {
            from_group_id,
            to_group_id,
        } = request;

        let (_, saved) = self
            .execute("transfer_student", faculty_id, |faculty, _| {
                faculty.transfer_student(student_id, from_group_id, to_group_id)
            })
            .await?;

        let group = |id| {
            saved
                .get_group_by_id(id)
                .map(GroupDto::from)
                .ok_or(FacultyError::Domain(DomainError::GroupDoesNotExist(id)))
        };

        Ok(TransferResultDto {
            from: group(from_group_id)?,
            to: group(to_group_id)?,
        })
    }

    async fn add_department_head(
        &self,
        faculty_id: FacultyId,
        user_id: UserId,
    ) -> Result<FacultyDto, FacultyError> {
        let (_, saved) = self
            .execute("add_department_head", faculty_id, |faculty, _| {
                faculty.add_department_head(user_id)
            })
            .await?;

        Ok(FacultyDto::from(&saved))
    }

    async fn remove_department_head(
        &self,
        faculty_id: FacultyId,
        user_id: UserId,
    ) -> Result<FacultyDto, FacultyError> {
        let (_, saved) = self
            .execute("remove_department_head", faculty_id, |faculty, _| {
                faculty.remove_department_head(user_id)
            })
            .await?;

        Ok(FacultyDto::from(&saved))
    }

    async fn merge_groups(
        &self,
        faculty_id: FacultyId,
        request: MergeGroupsDto,
    ) -> Result<GroupDto, FacultyError> {
        let MergeGroupsDto {
            group_ids,
            remove_sources,
        } = request;

        let (merged, _) = self
            .execute("merge_groups", faculty_id, |faculty, ids| {
                let merged = faculty
                    .merge_groups(&group_ids, || ids.next_group_id())
                    .map(GroupDto::from)?;

                if remove_sources {
                    let sources: IndexSet<GroupId> = group_ids.iter().copied().collect();
                    for source in sources {
                        faculty.remove_group(source)?;
                    }
                }

                Ok(merged)
            })
            .await?;

        Ok(merged)
    }

    async fn split_group(
        &self,
        faculty_id: FacultyId,
        group_id: GroupId,
        number_of_groups: usize,
    ) -> Result<Vec<GroupDto>, FacultyError> {
        let (parts, _) = self
            .execute("split_group", faculty_id, |faculty, ids| {
                faculty
                    .split_group(group_id, number_of_groups, || ids.next_group_id())
                    .map(|parts| parts.iter().map(GroupDto::from).collect::<Vec<_>>())
            })
            .await?;

        Ok(parts)
    }
}
