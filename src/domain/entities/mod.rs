//! # Domain Entities
//!
//! - **Faculty**: aggregate root owning its groups and department-head ids
//! - **Group**: a set of students inside one faculty
//!
//! ## Repository Traits
//!
//! The `FacultyRepository` trait lives next to the aggregate it loads and
//! saves. Implementations are in the infrastructure layer.

mod faculty;
mod group;

pub use faculty::{
    Faculty, FacultyRepository, FacultySummary, GroupSnapshot, MERGED_GROUP_SUFFIX,
};
pub use group::Group;

#[cfg(test)]
pub use faculty::MockFacultyRepository;
