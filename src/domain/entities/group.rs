//! Student group entity.
//!
//! Groups are owned by a [`Faculty`](super::Faculty) and can only be created,
//! renamed or destroyed through it. Membership edits go through the group
//! itself.

use indexmap::IndexSet;

use crate::domain::errors::DomainError;
use crate::domain::value_objects::{FacultyId, GroupId, GroupName, StudentId};

/// A group of students within one faculty.
///
/// Maps to the `faculty_groups` and `group_students` tables:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - faculty_id: BIGINT NOT NULL REFERENCES faculties(id)
/// - name: VARCHAR(50) NOT NULL, unique per faculty
/// - students: ordered rows in `group_students`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    id: GroupId,
    faculty_id: FacultyId,
    name: GroupName,
    /// Membership in insertion order; order drives how splits slice the group.
    student_ids: IndexSet<StudentId>,
}

impl Group {
    pub(super) fn new(id: GroupId, faculty_id: FacultyId, name: GroupName) -> Self {
        Self::with_students(id, faculty_id, name, IndexSet::new())
    }

    pub(super) fn with_students(
        id: GroupId,
        faculty_id: FacultyId,
        name: GroupName,
        student_ids: IndexSet<StudentId>,
    ) -> Self {
        Self {
            id,
            faculty_id,
            name,
            student_ids,
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn faculty_id(&self) -> FacultyId {
        self.faculty_id
    }

    pub fn name(&self) -> &GroupName {
        &self.name
    }

    pub fn student_ids(&self) -> &IndexSet<StudentId> {
        &self.student_ids
    }

    pub fn student_count(&self) -> usize {
        self.student_ids.len()
    }

    pub fn has_student(&self, student_id: StudentId) -> bool {
        self.student_ids.contains(&student_id)
    }

    /// Add a student to this group.
    pub fn add_student(&mut self, student_id: StudentId) -> Result<(), DomainError> {
        if !self.student_ids.insert(student_id) {
            return Err(DomainError::StudentAlreadyInGroup {
                student_id,
                group_id: self.id,
            });
        }
        Ok(())
    }

    /// Remove a student from this group, keeping the order of the others.
    pub fn remove_student(&mut self, student_id: StudentId) -> Result<(), DomainError> {
        if !self.student_ids.shift_remove(&student_id) {
            return Err(DomainError::StudentNotInGroup {
                student_id,
                group_id: self.id,
            });
        }
        Ok(())
    }

    /// Rename unconditionally. Uniqueness among siblings is the faculty's job.
    pub(super) fn update_name(&mut self, name: GroupName) {
        self.name = name;
    }
}
