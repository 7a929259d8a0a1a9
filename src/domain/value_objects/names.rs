//! Validated name value objects.

use std::fmt;

use crate::domain::errors::DomainError;

/// Maximum length of a faculty name, in characters.
pub const FACULTY_NAME_MAX_LENGTH: usize = 100;

/// Maximum length of a group name, in characters.
pub const GROUP_NAME_MAX_LENGTH: usize = 50;

/// Name of a faculty (1-100 characters, trimmed).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FacultyName(String);

impl FacultyName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let value = raw.as_ref().trim();
        if value.is_empty() {
            return Err(DomainError::FacultyNameEmpty);
        }
        if value.chars().count() > FACULTY_NAME_MAX_LENGTH {
            return Err(DomainError::FacultyNameTooLong {
                max: FACULTY_NAME_MAX_LENGTH,
            });
        }
        Ok(Self(value.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Name of a student group (1-50 characters, trimmed).
///
/// Compared case-sensitively: `CS101` and `cs101` are different groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupName(String);

impl GroupName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let value = raw.as_ref().trim();
        if value.is_empty() {
            return Err(DomainError::GroupNameEmpty);
        }
        if value.chars().count() > GROUP_NAME_MAX_LENGTH {
            return Err(DomainError::GroupNameTooLong {
                max: GROUP_NAME_MAX_LENGTH,
            });
        }
        Ok(Self(value.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FacultyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Engineering" ; "plain")]
    #[test_case("  Engineering  " ; "surrounding whitespace")]
    fn test_faculty_name_valid(raw: &str) {
        let name = FacultyName::new(raw).unwrap();
        assert_eq!(name.as_str(), "Engineering");
    }

    #[test_case("", DomainError::FacultyNameEmpty ; "empty")]
    #[test_case("   ", DomainError::FacultyNameEmpty ; "blank")]
    #[test_case(&"x".repeat(101), DomainError::FacultyNameTooLong { max: 100 } ; "too long")]
    fn test_faculty_name_invalid(raw: &str, expected: DomainError) {
        assert_eq!(FacultyName::new(raw).unwrap_err(), expected);
    }

    #[test]
    fn test_faculty_name_at_limit() {
        assert!(FacultyName::new("x".repeat(100)).is_ok());
    }

    #[test_case("", DomainError::GroupNameEmpty ; "empty")]
    #[test_case(&"g".repeat(51), DomainError::GroupNameTooLong { max: 50 } ; "too long")]
    fn test_group_name_invalid(raw: &str, expected: DomainError) {
        assert_eq!(GroupName::new(raw).unwrap_err(), expected);
    }

    #[test]
    fn test_group_name_equality_is_by_value() {
        assert_eq!(GroupName::new("CS101").unwrap(), GroupName::new("CS101").unwrap());
        assert_ne!(GroupName::new("CS101").unwrap(), GroupName::new("cs101").unwrap());
    }

    #[test]
    fn test_length_counts_characters() {
        // 50 two-byte characters still fit
        assert!(GroupName::new("é".repeat(50)).is_ok());
    }
}
