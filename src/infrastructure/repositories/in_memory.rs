//! In-Memory Faculty Repository
//!
//! Process-local storage backend. The default when no database is
//! configured, and the backend used by the test suite.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{Faculty, FacultyId, FacultyRepository, FacultySummary};
use crate::shared::error::AppError;

/// Thread-safe in-memory faculty repository.
///
/// Aggregates are stored by value; callers always get clones, so nothing
/// they do to a loaded aggregate is visible until `update` succeeds.
#[derive(Debug, Default)]
pub struct InMemoryFacultyRepository {
    faculties: DashMap<FacultyId, Faculty>,
}

impl InMemoryFacultyRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FacultyRepository for InMemoryFacultyRepository {
    async fn find_by_id(&self, id: FacultyId) -> Result<Option<FacultySummary>, AppError> {
        Ok(self.faculties.get(&id).map(|f| f.summary()))
    }

    async fn find_by_id_with_groups(&self, id: FacultyId) -> Result<Option<Faculty>, AppError> {
        Ok(self.faculties.get(&id).map(|f| f.value().clone()))
    }

    async fn list(&self) -> Result<Vec<FacultySummary>, AppError> {
        let mut summaries: Vec<_> = self.faculties.iter().map(|f| f.summary()).collect();
        summaries.sort_by_key(|s| s.id);
        Ok(summaries)
    }

    async fn create(&self, faculty: &Faculty) -> Result<Faculty, AppError> {
        match self.faculties.entry(faculty.id()) {
            Entry::Occupied(_) => Err(AppError::Conflict(format!(
                "Faculty with id {} already exists",
                faculty.id()
            ))),
            Entry::Vacant(slot) => {
                let stored = faculty.clone().with_version(1);
                slot.insert(stored.clone());
                Ok(stored)
            }
        }
    }

    async fn update(&self, faculty: &Faculty) -> Result<Faculty, AppError> {
        // The shard stays write-locked between the version check and the store.
        let mut current = self.faculties.get_mut(&faculty.id()).ok_or_else(|| {
            AppError::NotFound(format!("Faculty with id {} not found", faculty.id()))
        })?;

        if current.version() != faculty.version() {
            return Err(AppError::ConcurrencyConflict(format!(
                "Faculty {} was modified concurrently (loaded version {}, stored version {})",
                faculty.id(),
                faculty.version(),
                current.version()
            )));
        }

        let stored = faculty.clone().with_version(faculty.version() + 1);
        *current = stored.clone();
        Ok(stored)
    }

    async fn delete(&self, id: FacultyId) -> Result<(), AppError> {
        self.faculties
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Faculty with id {} not found", id)))
    }
}
