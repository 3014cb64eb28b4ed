//! Closed outcome set returned by resource access use cases.
//!
//! Every service method funnels its internal `Result` through here, so no
//! collaborator error crosses the use case boundary unconverted.

use crate::error::{AppError, Result};
use crate::telemetry::metrics::record_use_case;
use serde::Serialize;
use tracing::{debug, error, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "body", rename_all = "snake_case")]
pub enum UseCaseResponse<T> {
    Success(T),
    NoContent,
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    InvalidArgument(String),
    Error(String),
}

impl<T> UseCaseResponse<T> {
    /// Outcome of a read or create operation.
    pub fn success(operation: &'static str, result: Result<T>) -> Self {
        match result {
            Ok(payload) => {
                record_use_case(operation, "success");
                UseCaseResponse::Success(payload)
            }
            Err(err) => Self::from_error(operation, err),
        }
    }

    fn from_error(operation: &'static str, err: AppError) -> Self {
        record_use_case(operation, err.kind());
        match err {
            AppError::Forbidden(msg) => {
                warn!(operation, "Forbidden: {}", msg);
                UseCaseResponse::Forbidden(msg)
            }
            AppError::NotFound(entity) => {
                debug!(operation, entity = %entity, "Entity not found");
                UseCaseResponse::NotFound(entity)
            }
            AppError::Conflict(msg) => {
                debug!(operation, "Conflict: {}", msg);
                UseCaseResponse::Conflict(msg)
            }
            AppError::BadRequest(msg) | AppError::Validation(msg) => {
                debug!(operation, "Invalid argument: {}", msg);
                UseCaseResponse::InvalidArgument(msg)
            }
            AppError::Internal(e) => {
                error!(operation, error = ?e, "Unexpected error in resource access use case");
                UseCaseResponse::Error(format!("Error while {}", operation.replace('_', " ")))
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UseCaseResponse::Success(_) | UseCaseResponse::NoContent)
    }

    /// Payload of a successful read, if any.
    pub fn payload(self) -> Option<T> {
        match self {
            UseCaseResponse::Success(payload) => Some(payload),
            _ => None,
        }
    }
}

impl UseCaseResponse<()> {
    /// Outcome of a mutation that returns nothing on success.
    pub fn no_content(operation: &'static str, result: Result<()>) -> Self {
        match result {
            Ok(()) => {
                record_use_case(operation, "no_content");
                UseCaseResponse::NoContent
            }
            Err(err) => Self::from_error(operation, err),
        }
    }
}
