//! Unified error handling for the resource access core

use crate::domain::{DatasetFilterError, RuleValidationError};
use thiserror::Error;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Short machine-readable tag, used as a metrics label and in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::Forbidden(_) => "forbidden",
            AppError::Conflict(_) => "conflict",
            AppError::Validation(_) => "validation",
            AppError::Internal(_) => "internal_error",
        }
    }
}

// Conversion from validation errors
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl From<DatasetFilterError> for AppError {
    fn from(err: DatasetFilterError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<RuleValidationError> for AppError {
    fn from(err: RuleValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FilterType;

    #[test]
    fn test_error_display() {
        let err = AppError::NotFound("Rule".to_string());
        assert_eq!(err.to_string(), "Not found: Rule");
    }

    #[test]
    fn test_error_conversion() {
        let err: AppError = anyhow::anyhow!("Something went wrong").into();
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(err.kind(), "internal_error");
    }

    #[test]
    fn test_dataset_filter_error_becomes_validation() {
        let err: AppError = DatasetFilterError::EmptyResourceSet {
            filter_type: FilterType::Host,
        }
        .into();
        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("host")));
    }
}
