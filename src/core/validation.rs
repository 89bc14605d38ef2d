//! Validation utilities for user-provided fields
//!
//! Covers the required-field and numeric checks shared by the controller and
//! the interactive prompts.

/// A user-correctable input problem (empty field, bad number, unknown value)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Require a non-empty (after trimming) text field; returns the trimmed value
pub fn require_non_empty(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(format!("{} cannot be empty", field)));
    }
    Ok(trimmed.to_string())
}

/// Validate positive integer value
pub fn parse_positive_int(value: &str) -> Result<u32, ValidationError> {
    match value.trim().parse::<u32>() {
        Ok(0) => Err(ValidationError::new("value must be greater than 0")),
        Ok(n) => Ok(n),
        Err(_) => Err(ValidationError::new(format!(
            "'{}' is not a valid positive integer",
            value.trim()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_empty() {
        assert_eq!(
            require_non_empty("student name", "Ana").unwrap(),
            "Ana".to_string()
        );
        assert_eq!(
            require_non_empty("student name", "  Ana  ").unwrap(),
            "Ana".to_string()
        );
        assert!(require_non_empty("student name", "").is_err());
        assert!(require_non_empty("student name", "   ").is_err());
    }

    #[test]
    fn test_require_non_empty_error_names_field() {
        let err = require_non_empty("observation", " ").unwrap_err();
        assert!(err.message().contains("observation"));
    }

    #[test]
    fn test_parse_positive_int() {
        assert_eq!(parse_positive_int("5").unwrap(), 5);
        assert_eq!(parse_positive_int(" 100 ").unwrap(), 100);
        assert!(parse_positive_int("0").is_err());
        assert!(parse_positive_int("-5").is_err());
        assert!(parse_positive_int("not_a_number").is_err());
    }
}
