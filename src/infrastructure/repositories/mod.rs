//! Repository Implementations
//!
//! Concrete implementations of the domain's `FacultyRepository` port.
//!
//! ## Available Repositories
//!
//! - **PgFacultyRepository** - PostgreSQL storage, one transaction per save
//! - **InMemoryFacultyRepository** - process-local storage for development and tests
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use sqlx::PgPool;
//! use crate::infrastructure::repositories::PgFacultyRepository;
//!
//! fn setup_repository(pool: PgPool) -> PgFacultyRepository {
//!     PgFacultyRepository::new(pool)
//! }
//! ```

pub mod faculty_repository;
pub mod in_memory;

pub use faculty_repository::PgFacultyRepository;
pub use in_memory::InMemoryFacultyRepository;
