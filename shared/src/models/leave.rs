//! Leave model and lifecycle
//!
//! Lifecycle: created as PENDING, transitioned to APPROVED or REJECTED by an
//! admin update; an employee withdraws a leave by deleting it. Duration is
//! derived at read time, never stored.

use super::user::UserPublic;
use serde::{Deserialize, Serialize};

const DAY_MILLIS: i64 = 86_400_000;

/// Inclusive day count for a leave span.
///
/// `days = ceil((end - start) / 86_400_000) + 1`, so a same-day leave counts
/// as 1 and a partial-day difference rounds up before the inclusive +1.
/// Expects `end >= start` (validated at the API boundary).
pub fn leave_days(start_millis: i64, end_millis: i64) -> i64 {
    // Equivalent to `(end - start).div_ceil(DAY_MILLIS)`; spelled out because
    // signed `div_ceil` is feature-gated on this toolchain.
    let span = end_millis - start_millis;
    span / DAY_MILLIS + (span % DAY_MILLIS > 0) as i64 + 1
}

/// Leave type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveType {
    Sick,
    Casual,
    Annual,
    Unpaid,
}

impl LeaveType {
    /// Parse from database string value
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "SICK" => Some(Self::Sick),
            "CASUAL" => Some(Self::Casual),
            "ANNUAL" => Some(Self::Annual),
            "UNPAID" => Some(Self::Unpaid),
            _ => None,
        }
    }

    /// Database string representation
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Sick => "SICK",
            Self::Casual => "CASUAL",
            Self::Annual => "ANNUAL",
            Self::Unpaid => "UNPAID",
        }
    }
}

/// Leave lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    /// Parse from database string value
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Database string representation
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// APPROVED and REJECTED are terminal states
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

/// Leave record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leave {
    pub id: String,
    pub user_id: String,
    pub leave_type: LeaveType,
    /// Unix milliseconds
    pub start_date: i64,
    /// Unix milliseconds, `>= start_date`
    pub end_date: i64,
    pub reason: String,
    pub status: LeaveStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Leave {
    /// Derived inclusive duration in days
    pub fn duration_days(&self) -> i64 {
        leave_days(self.start_date, self.end_date)
    }
}

/// Leave record with the owner's public fields attached
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveWithUser {
    #[serde(flatten)]
    pub leave: Leave,
    pub user: UserPublic,
}

/// Partial update payload (admin); setting `status` to APPROVED or REJECTED
/// is the approve/reject transition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveUpdate {
    pub leave_type: Option<LeaveType>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub reason: Option<String>,
    pub status: Option<LeaveStatus>,
}

/// Per-year leave statistics for a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveStats {
    pub total: i64,
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    /// Sum of inclusive day counts over APPROVED leaves only
    pub total_days: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn millis(y: i32, m: u32, d: u32) -> i64 {
        chrono::Utc
            .with_ymd_and_hms(y, m, d, 0, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn test_same_day_leave_is_one_day() {
        let day = millis(2025, 1, 5);
        assert_eq!(leave_days(day, day), 1);
    }

    #[test]
    fn test_inclusive_three_day_span() {
        // 2025-01-05 .. 2025-01-07 = 3 days
        assert_eq!(leave_days(millis(2025, 1, 5), millis(2025, 1, 7)), 3);
    }

    #[test]
    fn test_partial_day_rounds_up() {
        // A span of one-and-a-half days ceils to 2, +1 inclusive = 3
        let start = millis(2025, 3, 1);
        assert_eq!(leave_days(start, start + DAY_MILLIS + DAY_MILLIS / 2), 3);
    }

    #[test]
    fn test_status_terminality() {
        assert!(!LeaveStatus::Pending.is_terminal());
        assert!(LeaveStatus::Approved.is_terminal());
        assert!(LeaveStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_type_db_roundtrip() {
        for t in [
            LeaveType::Sick,
            LeaveType::Casual,
            LeaveType::Annual,
            LeaveType::Unpaid,
        ] {
            assert_eq!(LeaveType::from_db(t.as_db()), Some(t));
        }
        // The legacy PAID variant from the superseded schema is not accepted
        assert_eq!(LeaveType::from_db("PAID"), None);
    }
}
