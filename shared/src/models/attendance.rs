//! Attendance model
//!
//! One row per (user, date); the mark operation upserts on that key.

use super::user::UserPublic;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-day presence status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,
    Absent,
    HalfDay,
    Leave,
}

impl AttendanceStatus {
    /// Parse from database string value
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "PRESENT" => Some(Self::Present),
            "ABSENT" => Some(Self::Absent),
            "HALF_DAY" => Some(Self::HalfDay),
            "LEAVE" => Some(Self::Leave),
            _ => None,
        }
    }

    /// Database string representation
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Present => "PRESENT",
            Self::Absent => "ABSENT",
            Self::HalfDay => "HALF_DAY",
            Self::Leave => "LEAVE",
        }
    }
}

/// Attendance record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Attendance record with the owner's public fields attached
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceWithUser {
    #[serde(flatten)]
    pub attendance: Attendance,
    pub user: UserPublic,
}

/// Partial update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceUpdate {
    pub status: Option<AttendanceStatus>,
    pub date: Option<NaiveDate>,
    pub user_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_db_roundtrip() {
        for s in [
            AttendanceStatus::Present,
            AttendanceStatus::Absent,
            AttendanceStatus::HalfDay,
            AttendanceStatus::Leave,
        ] {
            assert_eq!(AttendanceStatus::from_db(s.as_db()), Some(s));
        }
        assert_eq!(AttendanceStatus::from_db("half_day"), None);
    }

    #[test]
    fn test_half_day_serde() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::HalfDay).unwrap(),
            "\"HALF_DAY\""
        );
    }
}
