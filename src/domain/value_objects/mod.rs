//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! ## Value Objects
//!
//! - **Snowflake**: time-sortable 64-bit id with embedded timestamp
//! - **Ids**: `FacultyId`, `GroupId`, `StudentId`, `UserId`
//! - **Names**: `FacultyName`, `GroupName` (validated, compared by value)

mod ids;
mod names;
mod snowflake;

pub use ids::*;
pub use names::*;
pub use snowflake::*;
