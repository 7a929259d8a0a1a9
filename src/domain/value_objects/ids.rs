//! Typed identifiers.
//!
//! Students and department heads live in the user subsystem; the registry
//! only ever holds their keys. Keeping each key in its own newtype stops a
//! `StudentId` from being passed where a `GroupId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use super::snowflake::Snowflake;

macro_rules! snowflake_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn as_i64(&self) -> i64 {
                self.0
            }

            pub fn snowflake(&self) -> Snowflake {
                Snowflake::new(self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }
    };
}

snowflake_id!(
    /// Identifier of a faculty (aggregate root).
    FacultyId
);
snowflake_id!(
    /// Identifier of a student group, unique across faculties.
    GroupId
);
snowflake_id!(
    /// Key of a student in the user subsystem.
    StudentId
);
snowflake_id!(
    /// Key of a user in the user subsystem (department heads).
    UserId
);
