//! Faculty Repository Implementation
//!
//! PostgreSQL implementation of the FacultyRepository trait.
//! A faculty spans four tables: the `faculties` header row, its
//! `faculty_groups`, each group's `group_students`, and the
//! `faculty_department_heads`. Ordering inside the aggregate is kept in the
//! `position` columns.

use std::collections::HashMap;
use std::time::Instant;

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use crate::domain::{
    Faculty, FacultyId, FacultyName, FacultyRepository, FacultySummary, GroupId, GroupName,
    GroupSnapshot, StudentId, UserId,
};
use crate::infrastructure::database::PgUnitOfWork;
use crate::infrastructure::metrics::record_db_query;
use crate::shared::error::AppError;

/// Header row with child counts, used for summaries.
#[derive(Debug, sqlx::FromRow)]
struct FacultyRow {
    id: i64,
    name: String,
    version: i64,
    group_count: i64,
    department_head_count: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct GroupRow {
    id: i64,
    name: String,
}

#[derive(Debug, sqlx::FromRow)]
struct GroupStudentRow {
    group_id: i64,
    student_id: i64,
}

fn corrupt(id: i64, what: impl std::fmt::Display) -> AppError {
    AppError::Internal(format!("Stored faculty {} is invalid: {}", id, what))
}

fn stored_version(id: i64, version: i64) -> Result<u64, AppError> {
    u64::try_from(version).map_err(|_| corrupt(id, format!("negative version {}", version)))
}

fn db_version(version: u64) -> Result<i64, AppError> {
    i64::try_from(version)
        .map_err(|_| AppError::Internal(format!("Version {} does not fit the database", version)))
}

fn position(index: usize) -> Result<i32, AppError> {
    i32::try_from(index).map_err(|_| AppError::Internal(format!("Position {} out of range", index)))
}

impl FacultyRow {
    fn into_summary(self) -> Result<FacultySummary, AppError> {
        let name = FacultyName::new(&self.name).map_err(|e| corrupt(self.id, e))?;
        Ok(FacultySummary {
            id: FacultyId::new(self.id),
            name,
            group_count: self.group_count as usize,
            department_head_count: self.department_head_count as usize,
            version: stored_version(self.id, self.version)?,
        })
    }
}

const SELECT_SUMMARY: &str = r#"
    SELECT f.id, f.name, f.version,
           (SELECT COUNT(*) FROM faculty_groups g WHERE g.faculty_id = f.id) AS group_count,
           (SELECT COUNT(*) FROM faculty_department_heads h WHERE h.faculty_id = f.id)
               AS department_head_count
    FROM faculties f
"#;

/// PostgreSQL faculty repository implementation.
///
/// Every write runs in one transaction; `update` is guarded by the
/// `version` column.
#[derive(Clone)]
pub struct PgFacultyRepository {
    pool: PgPool,
    uow: PgUnitOfWork,
}

impl PgFacultyRepository {
    /// Create a new PgFacultyRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        let uow = PgUnitOfWork::new(pool.clone());
        Self { pool, uow }
    }

    /// Replace every child row of a faculty with the aggregate's current state.
    async fn write_children(conn: &mut PgConnection, faculty: &Faculty) -> Result<(), AppError> {
        let faculty_id = faculty.id().as_i64();

        // Students go with their groups through ON DELETE CASCADE.
        sqlx::query("DELETE FROM faculty_groups WHERE faculty_id = $1")
            .bind(faculty_id)
            .execute(&mut *conn)
            .await?;
        sqlx::query("DELETE FROM faculty_department_heads WHERE faculty_id = $1")
            .bind(faculty_id)
            .execute(&mut *conn)
            .await?;

        let mut group_ids = Vec::with_capacity(faculty.groups().len());
        let mut group_names = Vec::with_capacity(faculty.groups().len());
        let mut member_group_ids = Vec::new();
        let mut member_student_ids = Vec::new();
        let mut member_positions = Vec::new();

        for group in faculty.groups() {
            group_ids.push(group.id().as_i64());
            group_names.push(group.name().as_str().to_string());
            for (index, student_id) in group.student_ids().iter().enumerate() {
                member_group_ids.push(group.id().as_i64());
                member_student_ids.push(student_id.as_i64());
                member_positions.push(position(index)?);
            }
        }

        if !group_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO faculty_groups (id, faculty_id, name, position)
                SELECT g.id, $1, g.name, (g.ord - 1)::INTEGER
                FROM UNNEST($2::BIGINT[], $3::TEXT[]) WITH ORDINALITY AS g(id, name, ord)
                "#,
            )
            .bind(faculty_id)
            .bind(&group_ids)
            .bind(&group_names)
            .execute(&mut *conn)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    AppError::Conflict("Group with this ID already exists".to_string())
                }
                _ => AppError::Database(e),
            })?;
        }

        if !member_student_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO group_students (group_id, student_id, position)
                SELECT * FROM UNNEST($1::BIGINT[], $2::BIGINT[], $3::INTEGER[])
                "#,
            )
            .bind(&member_group_ids)
            .bind(&member_student_ids)
            .bind(&member_positions)
            .execute(&mut *conn)
            .await?;
        }

        let head_ids: Vec<i64> = faculty
            .department_head_ids()
            .iter()
            .map(|id| id.as_i64())
            .collect();
        if !head_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO faculty_department_heads (faculty_id, user_id, position)
                SELECT $1, h.user_id, (h.ord - 1)::INTEGER
                FROM UNNEST($2::BIGINT[]) WITH ORDINALITY AS h(user_id, ord)
                "#,
            )
            .bind(faculty_id)
            .bind(&head_ids)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    async fn load(conn: &mut PgConnection, id: FacultyId) -> Result<Option<Faculty>, AppError> {
        let header = sqlx::query_as::<_, (i64, String, i64)>(
            "SELECT id, name, version FROM faculties WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&mut *conn)
        .await?;

        let Some((raw_id, raw_name, raw_version)) = header else {
            return Ok(None);
        };

        let groups = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, name
            FROM faculty_groups
            WHERE faculty_id = $1
            ORDER BY position
            "#,
        )
        .bind(raw_id)
        .fetch_all(&mut *conn)
        .await?;

        let members = sqlx::query_as::<_, GroupStudentRow>(
            r#"
            SELECT gs.group_id, gs.student_id
            FROM group_students gs
            INNER JOIN faculty_groups g ON g.id = gs.group_id
            WHERE g.faculty_id = $1
            ORDER BY gs.group_id, gs.position
            "#,
        )
        .bind(raw_id)
        .fetch_all(&mut *conn)
        .await?;

        let heads = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT user_id
            FROM faculty_department_heads
            WHERE faculty_id = $1
            ORDER BY position
            "#,
        )
        .bind(raw_id)
        .fetch_all(&mut *conn)
        .await?;

        let mut students_by_group: HashMap<i64, Vec<StudentId>> = HashMap::new();
        for row in members {
            students_by_group
                .entry(row.group_id)
                .or_default()
                .push(StudentId::new(row.student_id));
        }

        let snapshots = groups
            .into_iter()
            .map(|g| {
                Ok(GroupSnapshot {
                    id: GroupId::new(g.id),
                    name: GroupName::new(&g.name).map_err(|e| corrupt(raw_id, e))?,
                    student_ids: students_by_group.remove(&g.id).unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        let faculty = Faculty::restore(
            FacultyId::new(raw_id),
            FacultyName::new(&raw_name).map_err(|e| corrupt(raw_id, e))?,
            snapshots,
            heads.into_iter().map(UserId::new).collect(),
            stored_version(raw_id, raw_version)?,
        )
        .map_err(|e| corrupt(raw_id, e))?;

        Ok(Some(faculty))
    }
}

#[async_trait]
impl FacultyRepository for PgFacultyRepository {
    /// Find a faculty header by its ID.
    async fn find_by_id(&self, id: FacultyId) -> Result<Option<FacultySummary>, AppError> {
        let started = Instant::now();
        let row = sqlx::query_as::<_, FacultyRow>(&format!("{} WHERE f.id = $1", SELECT_SUMMARY))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;
        record_db_query("select", "faculties", started.elapsed().as_secs_f64());

        row.map(FacultyRow::into_summary).transpose()
    }

    /// Load the whole aggregate from one snapshot of the database.
    async fn find_by_id_with_groups(&self, id: FacultyId) -> Result<Option<Faculty>, AppError> {
        let started = Instant::now();
        let mut ctx = self.uow.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(ctx.connection())
            .await?;

        let faculty = Self::load(ctx.connection(), id).await?;
        ctx.commit().await?;
        record_db_query("select", "faculty_aggregate", started.elapsed().as_secs_f64());

        Ok(faculty)
    }

    /// List all faculties ordered by ID.
    async fn list(&self) -> Result<Vec<FacultySummary>, AppError> {
        let started = Instant::now();
        let rows = sqlx::query_as::<_, FacultyRow>(&format!("{} ORDER BY f.id", SELECT_SUMMARY))
            .fetch_all(&self.pool)
            .await?;
        record_db_query("select", "faculties", started.elapsed().as_secs_f64());

        rows.into_iter().map(FacultyRow::into_summary).collect()
    }

    /// Create a new faculty together with any groups it already holds.
    async fn create(&self, faculty: &Faculty) -> Result<Faculty, AppError> {
        let started = Instant::now();
        let mut ctx = self.uow.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO faculties (id, name, version)
            VALUES ($1, $2, 1)
            "#,
        )
        .bind(faculty.id().as_i64())
        .bind(faculty.name().as_str())
        .execute(ctx.connection())
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(format!("Faculty with id {} already exists", faculty.id()))
            }
            _ => AppError::Database(e),
        })?;

        Self::write_children(ctx.connection(), faculty).await?;
        ctx.commit().await?;
        record_db_query("insert", "faculties", started.elapsed().as_secs_f64());

        Ok(faculty.clone().with_version(1))
    }

    /// Update a faculty if its stored version still matches.
    async fn update(&self, faculty: &Faculty) -> Result<Faculty, AppError> {
        let started = Instant::now();
        let mut ctx = self.uow.begin().await?;

        let new_version = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE faculties
            SET name = $2,
                version = version + 1,
                updated_at = NOW()
            WHERE id = $1 AND version = $3
            RETURNING version
            "#,
        )
        .bind(faculty.id().as_i64())
        .bind(faculty.name().as_str())
        .bind(db_version(faculty.version())?)
        .fetch_optional(ctx.connection())
        .await?;

        let Some(new_version) = new_version else {
            let exists = sqlx::query_scalar::<_, i64>("SELECT version FROM faculties WHERE id = $1")
                .bind(faculty.id().as_i64())
                .fetch_optional(ctx.connection())
                .await?;
            ctx.rollback().await?;

            return Err(match exists {
                Some(current) => AppError::ConcurrencyConflict(format!(
                    "Faculty {} was modified concurrently (loaded version {}, stored version {})",
                    faculty.id(),
                    faculty.version(),
                    current
                )),
                None => AppError::NotFound(format!("Faculty with id {} not found", faculty.id())),
            });
        };

        Self::write_children(ctx.connection(), faculty).await?;
        ctx.commit().await?;
        record_db_query("update", "faculties", started.elapsed().as_secs_f64());

        Ok(faculty
            .clone()
            .with_version(stored_version(faculty.id().as_i64(), new_version)?))
    }

    /// Delete a faculty; child rows cascade.
    async fn delete(&self, id: FacultyId) -> Result<(), AppError> {
        let started = Instant::now();
        let result = sqlx::query("DELETE FROM faculties WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;
        record_db_query("delete", "faculties", started.elapsed().as_secs_f64());

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Faculty with id {} not found", id)));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::snowflake::SnowflakeGenerator;

    fn engineering(ids: &SnowflakeGenerator) -> (Faculty, GroupId, GroupId) {
        let mut faculty = Faculty::new(
            ids.next_faculty_id(),
            FacultyName::new("Engineering").unwrap(),
        );
        let b = ids.next_group_id();
        let a = ids.next_group_id();
        faculty.add_group(b, GroupName::new("B").unwrap()).unwrap();
        faculty.add_group(a, GroupName::new("A").unwrap()).unwrap();
        for student in [3, 1, 2] {
            faculty.add_student_to_group(b, StudentId::new(student)).unwrap();
        }
        faculty.add_department_head(UserId::new(9)).unwrap();
        faculty.add_department_head(UserId::new(4)).unwrap();
        (faculty, b, a)
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_round_trip_keeps_insertion_order(pool: PgPool) {
        let repo = PgFacultyRepository::new(pool);
        let ids = SnowflakeGenerator::new(1);
        let (faculty, b, a) = engineering(&ids);

        repo.create(&faculty).await.unwrap();
        let loaded = repo
            .find_by_id_with_groups(faculty.id())
            .await
            .unwrap()
            .unwrap();

        let group_ids: Vec<_> = loaded.groups().iter().map(|g| g.id()).collect();
        assert_eq!(group_ids, vec![b, a]);
        let students: Vec<_> = loaded.groups()[0].student_ids().iter().copied().collect();
        assert_eq!(
            students,
            vec![StudentId::new(3), StudentId::new(1), StudentId::new(2)]
        );
        let heads: Vec<_> = loaded.department_head_ids().iter().copied().collect();
        assert_eq!(heads, vec![UserId::new(9), UserId::new(4)]);
        assert_eq!(loaded.version(), 1);

        let summary = repo.find_by_id(faculty.id()).await.unwrap().unwrap();
        assert_eq!(summary.group_count, 2);
        assert_eq!(summary.department_head_count, 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_update_rewrites_children(pool: PgPool) {
        let repo = PgFacultyRepository::new(pool);
        let ids = SnowflakeGenerator::new(1);
        let (faculty, b, a) = engineering(&ids);
        let mut current = repo.create(&faculty).await.unwrap();

        current.remove_group(a).unwrap();
        current.remove_student_from_group(b, StudentId::new(1)).unwrap();
        current.remove_department_head(UserId::new(9)).unwrap();
        let saved = repo.update(&current).await.unwrap();
        assert_eq!(saved.version(), 2);

        let loaded = repo
            .find_by_id_with_groups(faculty.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded, saved);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_stale_update_is_a_conflict(pool: PgPool) {
        let repo = PgFacultyRepository::new(pool);
        let ids = SnowflakeGenerator::new(1);
        let (faculty, _, _) = engineering(&ids);
        let created = repo.create(&faculty).await.unwrap();

        let mut first = created.clone();
        first.rename(FacultyName::new("Applied Engineering").unwrap());
        repo.update(&first).await.unwrap();

        let mut second = created;
        second.rename(FacultyName::new("Mechanical Engineering").unwrap());
        assert!(matches!(
            repo.update(&second).await,
            Err(AppError::ConcurrencyConflict(_))
        ));

        let stored = repo.find_by_id(faculty.id()).await.unwrap().unwrap();
        assert_eq!(stored.name.as_str(), "Applied Engineering");
        assert_eq!(stored.version, 2);

        repo.delete(faculty.id()).await.unwrap();
        assert!(matches!(
            repo.update(&second).await,
            Err(AppError::NotFound(_))
        ));
    }
}
