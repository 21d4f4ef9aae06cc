//! Dashboard aggregates
//!
//! GET /api/me/dashboard    — employee home: profile, recent rows, activity feed
//! GET /api/admin/overview  — admin home: headcount, today's attendance, pending leaves

use axum::extract::State;
use axum::{Extension, Json};
use chrono::Utc;
use serde::Serialize;
use shared::models::{Attendance, AttendanceStatus, Leave, Profile};
use shared::response::ActionResponse;

use crate::auth::session::SessionContext;
use crate::state::AppState;
use crate::{api::ApiResult, api::db_error, db};

/// One entry in the merged recent-activity feed
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ActivityItem {
    Attendance(Attendance),
    Leave(Leave),
}

impl ActivityItem {
    fn created_at(&self) -> i64 {
        match self {
            Self::Attendance(a) => a.created_at,
            Self::Leave(l) => l.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDashboard {
    pub profile: Option<Profile>,
    pub recent_attendance: Vec<Attendance>,
    pub recent_leaves: Vec<Leave>,
    pub activity: Vec<ActivityItem>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayBreakdown {
    pub present: i64,
    pub absent: i64,
    pub half_day: i64,
    pub leave: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOverview {
    pub employee_count: i64,
    pub today: TodayBreakdown,
    pub pending_leaves: i64,
}

pub async fn employee_dashboard(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
) -> ApiResult<EmployeeDashboard> {
    let recent_attendance =
        db::attendance::list_by_user(&state.pool, session.user_id(), None, None, 5)
            .await
            .map_err(db_error("Failed to fetch dashboard"))?;
    let recent_leaves = db::leaves::list_by_user(&state.pool, session.user_id(), 5)
        .await
        .map_err(db_error("Failed to fetch dashboard"))?;

    let activity = merge_activity(&recent_attendance, &recent_leaves);

    Ok(Json(ActionResponse::ok(
        "Dashboard fetched",
        EmployeeDashboard {
            profile: session.profile,
            recent_attendance,
            recent_leaves,
            activity,
        },
    )))
}

pub async fn admin_overview(State(state): State<AppState>) -> ApiResult<AdminOverview> {
    let employee_count = db::employees::count_all(&state.pool)
        .await
        .map_err(db_error("Failed to fetch overview"))?;

    let counts = db::attendance::today_counts(&state.pool, Utc::now().date_naive())
        .await
        .map_err(db_error("Failed to fetch overview"))?;
    let mut today = TodayBreakdown {
        present: 0,
        absent: 0,
        half_day: 0,
        leave: 0,
    };
    for (status, count) in counts {
        match status {
            AttendanceStatus::Present => today.present = count,
            AttendanceStatus::Absent => today.absent = count,
            AttendanceStatus::HalfDay => today.half_day = count,
            AttendanceStatus::Leave => today.leave = count,
        }
    }

    let pending_leaves = db::leaves::count_pending(&state.pool)
        .await
        .map_err(db_error("Failed to fetch overview"))?;

    Ok(Json(ActionResponse::ok(
        "Overview fetched",
        AdminOverview {
            employee_count,
            today,
            pending_leaves,
        },
    )))
}

/// Interleave the 3 most recent rows of each kind by creation time, newest
/// first, capped at 5 entries total.
fn merge_activity(attendance: &[Attendance], leaves: &[Leave]) -> Vec<ActivityItem> {
    let mut items: Vec<ActivityItem> = attendance
        .iter()
        .take(3)
        .cloned()
        .map(ActivityItem::Attendance)
        .chain(leaves.iter().take(3).cloned().map(ActivityItem::Leave))
        .collect();
    items.sort_by_key(|i| std::cmp::Reverse(i.created_at()));
    items.truncate(5);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::models::{LeaveStatus, LeaveType};

    fn attendance(id: &str, created_at: i64) -> Attendance {
        Attendance {
            id: id.into(),
            user_id: "u1".into(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            status: AttendanceStatus::Present,
            created_at,
            updated_at: created_at,
        }
    }

    fn leave(id: &str, created_at: i64) -> Leave {
        Leave {
            id: id.into(),
            user_id: "u1".into(),
            leave_type: LeaveType::Casual,
            start_date: created_at,
            end_date: created_at,
            reason: "family event out of town".into(),
            status: LeaveStatus::Pending,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn test_merge_newest_first_capped_at_five() {
        let attendance: Vec<_> = (0..4).map(|i| attendance(&format!("a{i}"), 100 - i)).collect();
        let leaves: Vec<_> = (0..4).map(|i| leave(&format!("l{i}"), 200 - i)).collect();

        let merged = merge_activity(&attendance, &leaves);
        assert_eq!(merged.len(), 5);
        // Leaves are newer, so they lead the feed
        assert!(matches!(merged[0], ActivityItem::Leave(ref l) if l.id == "l0"));
        let times: Vec<i64> = merged.iter().map(|i| i.created_at()).collect();
        let mut sorted = times.clone();
        sorted.sort_by_key(|t| std::cmp::Reverse(*t));
        assert_eq!(times, sorted);
    }

    #[test]
    fn test_merge_empty_inputs() {
        assert!(merge_activity(&[], &[]).is_empty());
    }

    #[test]
    fn test_activity_serialization_tag() {
        let item = ActivityItem::Attendance(attendance("a1", 1));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["kind"], "attendance");
        assert_eq!(json["id"], "a1");
    }
}
