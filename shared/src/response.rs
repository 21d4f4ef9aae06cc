//! Action response envelope
//!
//! Every API handler resolves to this uniform shape:
//!
//! ```json
//! {
//!     "success": true,
//!     "message": "Attendance created successfully",
//!     "data": { ... }
//! }
//! ```
//!
//! Failures carry `success: false` plus an optional `fieldErrors` map for
//! schema-validation failures. Internally handlers use
//! `Result<Json<ActionResponse<T>>, AppError>`, so success and failure are
//! distinct types rather than one loosely-typed bag.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Uniform response envelope returned by every action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse<T> {
    /// Whether the action succeeded; the only failure signal callers rely on
    pub success: bool,
    /// Human-readable message
    pub message: String,
    /// Response payload (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Field-scoped error messages (present only for validation failures)
    #[serde(rename = "fieldErrors", skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<HashMap<String, Vec<String>>>,
}

impl<T> ActionResponse<T> {
    /// Create a successful response
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            field_errors: None,
        }
    }

    /// Create a failure response with a flat message
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            field_errors: None,
        }
    }

    /// Create a failure response from an [`AppError`]
    pub fn from_error(err: AppError) -> Self {
        Self {
            success: false,
            message: err.message,
            data: None,
            field_errors: err.field_errors,
        }
    }
}

impl ActionResponse<()> {
    /// Create a successful response without data
    pub fn ok_empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            field_errors: None,
        }
    }
}

/// A page of results plus the total count over the same predicate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_success_serialization() {
        let resp = ActionResponse::ok("Created", serde_json::json!({"id": "a1"}));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Created");
        assert_eq!(json["data"]["id"], "a1");
        assert!(json.get("fieldErrors").is_none());
    }

    #[test]
    fn test_field_errors_camel_case() {
        let err = AppError::new(ErrorCode::ValidationFailed)
            .with_field_error("employeeId", "Employee ID must be digits only");
        let resp = ActionResponse::<()>::from_error(err);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(
            json["fieldErrors"]["employeeId"][0],
            "Employee ID must be digits only"
        );
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_flat_failure_has_no_field_errors() {
        let resp = ActionResponse::<()>::fail("Error creating attendance");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("fieldErrors").is_none());
    }
}
