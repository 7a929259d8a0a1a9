//! # Domain Layer
//!
//! The domain layer holds the academic structure model: the Faculty
//! aggregate, its Groups, and the value objects they are built from.
//! It is independent of any external frameworks or infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: Faculty (aggregate root) and Group
//! - **value_objects**: ids, validated names, Snowflake
//! - **errors**: the domain error taxonomy with stable codes
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Every invariant is enforced inside the aggregate
//! - Failing operations never mutate state
//! - Repository traits define data access contracts

pub mod entities;
pub mod errors;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use errors::{DomainError, ErrorKind};
pub use value_objects::*;
