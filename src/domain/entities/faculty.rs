//! Faculty aggregate root and repository trait.
//!
//! A faculty owns its groups outright and references department heads by id
//! only. Every structural change to the groups goes through this type, which
//! checks all preconditions before touching any state: a failing call leaves
//! the aggregate exactly as it was.

use async_trait::async_trait;
use indexmap::IndexSet;

use super::group::Group;
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{FacultyId, FacultyName, GroupId, GroupName, StudentId, UserId};
use crate::shared::error::AppError;

/// Suffix appended to the name of a group produced by a merge.
pub const MERGED_GROUP_SUFFIX: &str = "-Merged";

/// Persisted state of one group, used to rebuild an aggregate.
#[derive(Debug, Clone)]
pub struct GroupSnapshot {
    pub id: GroupId,
    pub name: GroupName,
    pub student_ids: Vec<StudentId>,
}

/// Represents a faculty with its groups and department heads.
///
/// Maps to the `faculties` table plus its child tables:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - name: VARCHAR(100) NOT NULL
/// - version: BIGINT NOT NULL (optimistic concurrency)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Faculty {
    id: FacultyId,
    name: FacultyName,
    groups: Vec<Group>,
    department_head_ids: IndexSet<UserId>,
    /// Version the aggregate was loaded at. Only repositories change it.
    version: u64,
}

impl Faculty {
    /// Create a new faculty with no groups and no department heads.
    pub fn new(id: FacultyId, name: FacultyName) -> Self {
        Self {
            id,
            name,
            groups: Vec::new(),
            department_head_ids: IndexSet::new(),
            version: 0,
        }
    }

    /// Rebuild a faculty from storage.
    ///
    /// Groups are rebuilt from snapshots so each one is owned by this faculty.
    /// Duplicate student or department head ids collapse; duplicate group names
    /// are rejected.
    pub fn restore(
        id: FacultyId,
        name: FacultyName,
        groups: Vec<GroupSnapshot>,
        department_head_ids: Vec<UserId>,
        version: u64,
    ) -> Result<Self, DomainError> {
        let mut faculty = Self::new(id, name).with_version(version);

        for snapshot in groups {
            faculty.ensure_name_available(&snapshot.name, None)?;
            faculty.groups.push(Group::with_students(
                snapshot.id,
                id,
                snapshot.name,
                snapshot.student_ids.into_iter().collect(),
            ));
        }
        faculty.department_head_ids = department_head_ids.into_iter().collect();

        Ok(faculty)
    }

    /// Same aggregate at another persisted version.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    // ========== Getters ==========

    pub fn id(&self) -> FacultyId {
        self.id
    }

    pub fn name(&self) -> &FacultyName {
        &self.name
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn department_head_ids(&self) -> &IndexSet<UserId> {
        &self.department_head_ids
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn summary(&self) -> FacultySummary {
        FacultySummary {
            id: self.id,
            name: self.name.clone(),
            group_count: self.groups.len(),
            department_head_count: self.department_head_ids.len(),
            version: self.version,
        }
    }

    pub fn get_group_by_id(&self, group_id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id() == group_id)
    }

    /// Groups whose id is in `group_ids`, in faculty order.
    ///
    /// Unknown ids are skipped; compare lengths to detect them.
    pub fn get_groups_by_ids(&self, group_ids: &[GroupId]) -> Vec<&Group> {
        self.groups
            .iter()
            .filter(|g| group_ids.contains(&g.id()))
            .collect()
    }

    // ========== Faculty ==========

    pub fn rename(&mut self, name: FacultyName) {
        self.name = name;
    }

    pub fn add_department_head(&mut self, user_id: UserId) -> Result<(), DomainError> {
        if !self.department_head_ids.insert(user_id) {
            return Err(DomainError::DepartmentHeadIdAlreadyExists(user_id));
        }
        Ok(())
    }

    pub fn remove_department_head(&mut self, user_id: UserId) -> Result<(), DomainError> {
        if !self.department_head_ids.shift_remove(&user_id) {
            return Err(DomainError::DepartmentHeadIdDoesNotExist(user_id));
        }
        Ok(())
    }

    // ========== Groups ==========

    /// Add an empty group. Fails if a group with an equal name exists.
    pub fn add_group(&mut self, id: GroupId, name: GroupName) -> Result<&Group, DomainError> {
        self.ensure_name_available(&name, None)?;
        Ok(self.push_group(Group::new(id, self.id, name)))
    }

    /// Remove a group and return it. Its students are not touched elsewhere.
    pub fn remove_group(&mut self, group_id: GroupId) -> Result<Group, DomainError> {
        let index = self.group_index(group_id)?;
        Ok(self.groups.remove(index))
    }

    /// Rename a group, keeping names unique within the faculty.
    pub fn update_group(&mut self, group_id: GroupId, name: GroupName) -> Result<&Group, DomainError> {
        let index = self.group_index(group_id)?;
        self.ensure_name_available(&name, Some(group_id))?;

        let group = &mut self.groups[index];
        group.update_name(name);
        Ok(&*group)
    }

    pub fn add_student_to_group(
        &mut self,
        group_id: GroupId,
        student_id: StudentId,
    ) -> Result<&Group, DomainError> {
        let index = self.group_index(group_id)?;
        let group = &mut self.groups[index];
        group.add_student(student_id)?;
        Ok(&*group)
    }

    pub fn remove_student_from_group(
        &mut self,
        group_id: GroupId,
        student_id: StudentId,
    ) -> Result<&Group, DomainError> {
        let index = self.group_index(group_id)?;
        let group = &mut self.groups[index];
        group.remove_student(student_id)?;
        Ok(&*group)
    }

    /// Move a student from one group of this faculty to another.
    pub fn transfer_student(
        &mut self,
        student_id: StudentId,
        from: GroupId,
        to: GroupId,
    ) -> Result<(), DomainError> {
        if from == to {
            return Err(DomainError::InvalidTransfer {
                student_id,
                group_id: from,
            });
        }

        let from_index = self.group_index(from)?;
        let to_index = self.group_index(to)?;

        if !self.groups[from_index].has_student(student_id) {
            return Err(DomainError::StudentNotInGroup {
                student_id,
                group_id: from,
            });
        }
        if self.groups[to_index].has_student(student_id) {
            return Err(DomainError::StudentAlreadyInGroup {
                student_id,
                group_id: to,
            });
        }

        self.groups[from_index].remove_student(student_id)?;
        self.groups[to_index].add_student(student_id)
    }

    /// Combine two or more groups into a new one.
    ///
    /// The new group is named `{a}-{b}-...-Merged` and holds the union of
    /// the source memberships in source order. Repeated ids in `group_ids`
    /// count once. The source groups stay in the faculty.
    pub fn merge_groups(
        &mut self,
        group_ids: &[GroupId],
        mut next_group_id: impl FnMut() -> GroupId,
    ) -> Result<&Group, DomainError> {
        let distinct: IndexSet<GroupId> = group_ids.iter().copied().collect();
        if distinct.len() < 2 {
            return Err(DomainError::MergeGroupCountInsufficient {
                count: distinct.len(),
            });
        }

        let sources = distinct
            .iter()
            .map(|&id| {
                self.get_group_by_id(id)
                    .ok_or(DomainError::GroupDoesNotExist(id))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let joined = sources
            .iter()
            .map(|g| g.name().as_str())
            .collect::<Vec<_>>()
            .join("-");
        let name = GroupName::new(format!("{joined}{MERGED_GROUP_SUFFIX}"))?;
        self.ensure_name_available(&name, None)?;

        let student_ids: IndexSet<StudentId> = sources
            .iter()
            .flat_map(|g| g.student_ids().iter().copied())
            .collect();

        let merged = Group::with_students(next_group_id(), self.id, name, student_ids);
        Ok(self.push_group(merged))
    }

    /// Split a group into `number_of_groups` parts and remove the original.
    ///
    /// Parts are contiguous slices of the membership order named
    /// `{name}-Part1`, `{name}-Part2`, ... When the students do not divide
    /// evenly, the first `count % number_of_groups` parts take one extra
    /// student each, so nobody is dropped.
    pub fn split_group(
        &mut self,
        group_id: GroupId,
        number_of_groups: usize,
        mut next_group_id: impl FnMut() -> GroupId,
    ) -> Result<&[Group], DomainError> {
        let index = self.group_index(group_id)?;
        let source = &self.groups[index];
        let count = source.student_count();

        if number_of_groups < 2 || count < number_of_groups {
            return Err(DomainError::InvalidSplitGroupParameters {
                students: count,
                parts: number_of_groups,
            });
        }

        let base = count / number_of_groups;
        let remainder = count % number_of_groups;
        let mut members = source.student_ids().iter().copied();
        let mut parts = Vec::with_capacity(number_of_groups);

        for i in 0..number_of_groups {
            let name = GroupName::new(format!("{}-Part{}", source.name(), i + 1))?;
            self.ensure_name_available(&name, Some(group_id))?;

            let size = base + usize::from(i < remainder);
            let student_ids: IndexSet<StudentId> = members.by_ref().take(size).collect();
            parts.push((name, student_ids));
        }

        self.groups.remove(index);
        let start = self.groups.len();
        for (name, student_ids) in parts {
            let part = Group::with_students(next_group_id(), self.id, name, student_ids);
            self.groups.push(part);
        }

        Ok(&self.groups[start..])
    }

    // ========== Helpers ==========

    fn group_index(&self, group_id: GroupId) -> Result<usize, DomainError> {
        self.groups
            .iter()
            .position(|g| g.id() == group_id)
            .ok_or(DomainError::GroupDoesNotExist(group_id))
    }

    /// Fails if any group other than `except` is already called `name`.
    fn ensure_name_available(
        &self,
        name: &GroupName,
        except: Option<GroupId>,
    ) -> Result<(), DomainError> {
        let taken = self
            .groups
            .iter()
            .any(|g| g.name() == name && Some(g.id()) != except);

        if taken {
            return Err(DomainError::GroupNameAlreadyExists(name.clone()));
        }
        Ok(())
    }

    fn push_group(&mut self, group: Group) -> &Group {
        let index = self.groups.len();
        self.groups.push(group);
        &self.groups[index]
    }
}

/// Faculty header without its groups, for listings and cheap reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacultySummary {
    pub id: FacultyId,
    pub name: FacultyName,
    pub group_count: usize,
    pub department_head_count: usize,
    pub version: u64,
}

/// Repository trait for Faculty data access operations.
///
/// `update` is a compare-and-swap on [`Faculty::version`]: it fails with
/// [`AppError::ConcurrencyConflict`] when the stored version has moved on
/// since the aggregate was loaded, and returns the aggregate at its new
/// version otherwise.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FacultyRepository: Send + Sync {
    /// Find a faculty header by ID (groups not loaded).
    async fn find_by_id(&self, id: FacultyId) -> Result<Option<FacultySummary>, AppError>;

    /// Load the full aggregate, groups and memberships included.
    async fn find_by_id_with_groups(&self, id: FacultyId) -> Result<Option<Faculty>, AppError>;

    /// List all faculties ordered by ID.
    async fn list(&self) -> Result<Vec<FacultySummary>, AppError>;

    /// Persist a new faculty.
    async fn create(&self, faculty: &Faculty) -> Result<Faculty, AppError>;

    /// Persist a mutated faculty if nobody else saved it in between.
    async fn update(&self, faculty: &Faculty) -> Result<Faculty, AppError>;

    /// Delete a faculty with all of its groups.
    async fn delete(&self, id: FacultyId) -> Result<(), AppError>;
}
