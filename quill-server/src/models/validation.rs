//! Validation error types

use std::fmt;

/// Validation error for domain models
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is absent or falsy
    Required { field: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { field } => {
                let mut chars = field.chars();
                match chars.next() {
                    Some(first) => write!(f, "{}{} is required", first.to_uppercase(), chars.as_str()),
                    None => write!(f, "field is required"),
                }
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::Required { field: "content" };
        assert_eq!(err.to_string(), "Content is required");
    }
}
