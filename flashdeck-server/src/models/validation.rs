//! Validation error types

use std::fmt;

/// Validation error for client-supplied shapes
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// Required text field is empty
    Empty { field: &'static str },

    /// Identifier is zero or negative
    NotPositive { field: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::NotPositive { field } => {
                write!(f, "{} must be a positive integer", field)
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
        let err = ValidationError::Empty { field: "name" };
        assert_eq!(err.to_string(), "name cannot be empty");

        let err = ValidationError::NotPositive { field: "id" };
        assert_eq!(err.to_string(), "id must be a positive integer");
    }
}
