//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 2xxx: Permission errors
/// - 3xxx: Employee/profile errors
/// - 4xxx: Attendance errors
/// - 5xxx: Leave errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Permission errors (2xxx)
    Permission,
    /// Employee/profile errors (3xxx)
    Employee,
    /// Attendance errors (4xxx)
    Attendance,
    /// Leave errors (5xxx)
    Leave,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            3000..4000 => Self::Employee,
            4000..5000 => Self::Attendance,
            5000..6000 => Self::Leave,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Employee => "employee",
            Self::Attendance => "attendance",
            Self::Leave => "leave",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCode::ValidationFailed.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::TokenExpired.category(), ErrorCategory::Auth);
        assert_eq!(ErrorCode::AdminRequired.category(), ErrorCategory::Permission);
        assert_eq!(ErrorCode::EmailExists.category(), ErrorCategory::Employee);
        assert_eq!(ErrorCode::AttendanceNotFound.category(), ErrorCategory::Attendance);
        assert_eq!(ErrorCode::InvalidLeaveRange.category(), ErrorCategory::Leave);
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }
}
