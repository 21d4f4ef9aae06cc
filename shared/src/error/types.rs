//! Error type and axum integration

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and field details
///
/// This is the primary error type for Dayflow, providing:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional field-scoped messages for schema-validation failures
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Field-scoped error messages (populated only for validation-style
    /// failures, never for downstream persistence errors)
    pub field_errors: Option<HashMap<String, Vec<String>>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            field_errors: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field_errors: None,
        }
    }

    /// Attach a field-scoped message to this error
    pub fn with_field_error(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.field_errors
            .get_or_insert_with(HashMap::new)
            .entry(field.into())
            .or_default()
            .push(message.into());
        self
    }

    /// Attach a full field-error map (e.g. flattened schema output)
    pub fn with_field_errors(mut self, field_errors: HashMap<String, Vec<String>>) -> Self {
        self.field_errors = Some(field_errors);
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::NotFound, format!("{} not found", resource.into()))
    }

    /// Create a not authenticated error
    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create an invalid credentials error
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    /// Create an invalid token error
    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use crate::response::ActionResponse;

        let status = self.http_status();

        // Log system errors
        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        let body = ActionResponse::<()>::from_error(self);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_message() {
        let err = AppError::new(ErrorCode::EmployeeNotFound);
        assert_eq!(err.message, "Employee not found");
        assert!(err.field_errors.is_none());
    }

    #[test]
    fn test_with_field_error_accumulates() {
        let err = AppError::new(ErrorCode::ValidationFailed)
            .with_field_error("email", "Email is required")
            .with_field_error("email", "Invalid email address")
            .with_field_error("password", "Password is required");

        let fields = err.field_errors.unwrap();
        assert_eq!(fields["email"].len(), 2);
        assert_eq!(fields["password"], vec!["Password is required"]);
    }

    #[test]
    fn test_http_status() {
        assert_eq!(
            AppError::new(ErrorCode::EmailExists).http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::validation("bad input").http_status(),
            StatusCode::BAD_REQUEST
        );
    }
}
