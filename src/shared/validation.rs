//! Validation Utilities

use validator::ValidationErrors;

use super::error::{AppError, FieldError};

/// Convert validation errors to AppError
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let mut field_errors: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldError {
                field: field.to_string(),
                message: e.message.clone().map(|m| m.to_string()).unwrap_or_default(),
            })
        })
        .collect();
    field_errors.sort_by(|a, b| a.field.cmp(&b.field));

    let message = field_errors
        .first()
        .map(|e| format!("{}: {}", e.field, e.message))
        .unwrap_or_else(|| "Validation failed".into());

    AppError::Validation {
        message,
        errors: field_errors,
    }
}

/// Parse an ID path segment, rejecting anything that is not a decimal i64.
pub fn parse_id<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid {} ID", what)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GroupId;
    use validator::Validate;

    #[derive(Validate)]
    struct RenameBody {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(length(max = 3, message = "Code is too long"))]
        code: String,
    }

    #[test]
    fn test_validation_error_reports_every_field() {
        let err = RenameBody {
            name: String::new(),
            code: "ABCD".into(),
        }
        .validate()
        .unwrap_err();

        match validation_error(err) {
            AppError::Validation { message, errors } => {
                assert_eq!(message, "code: Code is too long");
                assert_eq!(
                    errors,
                    vec![
                        FieldError {
                            field: "code".into(),
                            message: "Code is too long".into(),
                        },
                        FieldError {
                            field: "name".into(),
                            message: "Name is required".into(),
                        },
                    ]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_id() {
        let id: GroupId = parse_id("42", "group").unwrap();
        assert_eq!(id, GroupId::new(42));
        assert!(matches!(
            parse_id::<GroupId>("abc", "group"),
            Err(AppError::BadRequest(_))
        ));
    }
}
