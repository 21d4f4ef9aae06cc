//! Self-service handlers for the signed-in employee
//!
//! GET/PUT /api/me/profile        — own profile
//! GET     /api/me/attendance      — own attendance history
//! POST    /api/me/attendance/mark — mark own day
//! GET/POST /api/me/leaves         — own leaves / apply
//! DELETE  /api/me/leaves/{id}     — withdraw a request
//! GET     /api/me/leaves/stats    — per-year statistics

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use chrono::{Datelike, NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Attendance, AttendanceStatus, Leave, LeaveStats, LeaveType, Profile};
use shared::response::ActionResponse;
use shared::util::{new_id, now_millis};
use validator::Validate;

use crate::auth::session::SessionContext;
use crate::state::AppState;
use crate::validation::{phone_format, validate};
use crate::{api::ApiResult, api::db_error, db};

// ── Request types ──

#[derive(Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: Option<String>,
    #[validate(custom(function = phone_format))]
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Deserialize)]
pub struct AttendanceRangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct MarkOwnRequest {
    /// Defaults to today (UTC)
    pub date: Option<NaiveDate>,
    pub status: Option<AttendanceStatus>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplyLeaveRequest {
    pub leave_type: LeaveType,
    /// Unix milliseconds
    pub start_date: i64,
    pub end_date: i64,
    #[validate(length(
        min = 10,
        max = 500,
        message = "Reason must be between 10 and 500 characters"
    ))]
    pub reason: String,
}

#[derive(Deserialize)]
pub struct StatsQuery {
    pub year: Option<i32>,
}

// ── Profile ──

pub async fn get_own(Extension(session): Extension<SessionContext>) -> ApiResult<Profile> {
    let profile = session
        .profile
        .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound))?;
    Ok(Json(ActionResponse::ok("Profile fetched", profile)))
}

pub async fn update_own(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Profile> {
    validate(&req)?;

    let profile = db::profiles::update_own(
        &state.pool,
        session.user_id(),
        req.name.as_deref(),
        req.phone.as_deref(),
        req.address.as_deref(),
        now_millis(),
    )
    .await
    .map_err(db_error("Failed to update profile"))?
    .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound))?;

    Ok(Json(ActionResponse::ok("Profile updated successfully", profile)))
}

// ── Attendance ──

pub async fn own_attendance(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<AttendanceRangeQuery>,
) -> ApiResult<Vec<Attendance>> {
    let rows = db::attendance::list_by_user(
        &state.pool,
        session.user_id(),
        query.from,
        query.to,
        query.limit.unwrap_or(100).clamp(1, 500),
    )
    .await
    .map_err(db_error("Failed to fetch attendance records"))?;

    Ok(Json(ActionResponse::ok("Attendance fetched", rows)))
}

pub async fn mark_own_attendance(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Json(req): Json<MarkOwnRequest>,
) -> ApiResult<Attendance> {
    let date = req.date.unwrap_or_else(|| Utc::now().date_naive());
    let status = req.status.unwrap_or(AttendanceStatus::Present);

    let row = db::attendance::mark(
        &state.pool,
        &new_id(),
        session.user_id(),
        date,
        status,
        now_millis(),
    )
    .await
    .map_err(db_error("Failed to mark attendance"))?;

    Ok(Json(ActionResponse::ok("Attendance marked successfully", row)))
}

// ── Leaves ──

pub async fn own_leaves(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
) -> ApiResult<Vec<Leave>> {
    let rows = db::leaves::list_by_user(&state.pool, session.user_id(), 100)
        .await
        .map_err(db_error("Failed to fetch leave requests"))?;
    Ok(Json(ActionResponse::ok("Leaves fetched", rows)))
}

pub async fn apply_leave(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Json(req): Json<ApplyLeaveRequest>,
) -> ApiResult<Leave> {
    validate(&req)?;
    if req.end_date < req.start_date {
        return Err(AppError::new(ErrorCode::InvalidLeaveRange)
            .with_field_error("endDate", "End date must be on or after start date"));
    }

    // Status is forced to PENDING server-side regardless of caller input
    let leave = db::leaves::create(
        &state.pool,
        &new_id(),
        session.user_id(),
        req.leave_type,
        req.start_date,
        req.end_date,
        &req.reason,
        now_millis(),
    )
    .await
    .map_err(db_error("Failed to apply for leave"))?;

    Ok(Json(ActionResponse::ok(
        "Leave request submitted successfully",
        leave,
    )))
}

pub async fn cancel_leave(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let leave = db::leaves::find_by_id(&state.pool, &id)
        .await
        .map_err(db_error("Failed to cancel leave request"))?
        .ok_or_else(|| AppError::new(ErrorCode::LeaveNotFound))?;

    // Ownership check only; pending-state enforcement stays a client concern
    if leave.user_id != session.user_id() {
        return Err(AppError::permission_denied(
            "Cannot cancel another user's leave request",
        ));
    }

    db::leaves::delete(&state.pool, &id)
        .await
        .map_err(db_error("Failed to cancel leave request"))?;

    Ok(Json(ActionResponse::ok_empty(
        "Leave request cancelled successfully",
    )))
}

pub async fn own_leave_stats(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<StatsQuery>,
) -> ApiResult<LeaveStats> {
    let year = query.year.unwrap_or_else(|| Utc::now().date_naive().year());
    let (start, end) =
        year_bounds(year).ok_or_else(|| AppError::invalid_request("Invalid year"))?;

    let stats = db::leaves::stats_for_year(&state.pool, session.user_id(), start, end)
        .await
        .map_err(db_error("Failed to fetch leave statistics"))?;

    Ok(Json(ActionResponse::ok("Leave statistics fetched", stats)))
}

/// Millisecond bounds of a calendar year in UTC: `[Jan 1 year, Jan 1 year+1)`
fn year_bounds(year: i32) -> Option<(i64, i64)> {
    let start = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single()?;
    let end = Utc.with_ymd_and_hms(year + 1, 1, 1, 0, 0, 0).single()?;
    Some((start.timestamp_millis(), end.timestamp_millis()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_bounds_span_one_year() {
        let (start, end) = year_bounds(2025).unwrap();
        assert_eq!(start, 1_735_689_600_000); // 2025-01-01T00:00:00Z
        // 2025 is not a leap year
        assert_eq!(end - start, 365 * 86_400_000);
    }

    #[test]
    fn test_year_bounds_rejects_out_of_range() {
        assert!(year_bounds(300_000).is_none());
    }
}
