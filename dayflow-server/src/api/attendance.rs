//! Admin attendance management
//!
//! GET/POST /api/admin/attendance
//! POST /api/admin/attendance/mark
//! PUT/DELETE /api/admin/attendance/{id}
//! POST /api/admin/attendance/bulk-delete

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Attendance, AttendanceStatus, AttendanceUpdate, AttendanceWithUser, BulkDeleteOutcome,
};
use shared::response::{ActionResponse, Paged};
use shared::util::{new_id, now_millis};

use crate::state::AppState;
use crate::{api::ApiResult, api::db_error, db};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub user_id: Option<String>,
    pub status: Option<AttendanceStatus>,
    pub search: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// All three fields are required; absence is reported as a validation
/// failure rather than a deserialization error.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub user_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub status: Option<AttendanceStatus>,
}

#[derive(Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Paged<AttendanceWithUser>> {
    let (items, total) = db::attendance::list_with_filters(
        &state.pool,
        query.user_id.as_deref(),
        query.status,
        query.search.as_deref().filter(|s| !s.is_empty()),
        query.from,
        query.to,
        query.limit.unwrap_or(20).clamp(1, 100),
        query.offset.unwrap_or(0).max(0),
    )
    .await
    .map_err(db_error("Failed to fetch attendance records"))?;

    Ok(Json(ActionResponse::ok(
        "Attendance records fetched",
        Paged { items, total },
    )))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> ApiResult<AttendanceWithUser> {
    let (Some(user_id), Some(date), Some(status)) = (req.user_id, req.date, req.status) else {
        return Err(AppError::validation("User, date, and status are required"));
    };

    if db::users::find_by_id(&state.pool, &user_id)
        .await
        .map_err(db_error("Failed to create attendance record"))?
        .is_none()
    {
        return Err(AppError::new(ErrorCode::EmployeeNotFound));
    }

    let id = new_id();
    db::attendance::create(&state.pool, &id, &user_id, date, status, now_millis())
        .await
        .map_err(db_error("Failed to create attendance record"))?;

    let row = db::attendance::find_with_user(&state.pool, &id)
        .await
        .map_err(db_error("Failed to create attendance record"))?
        .ok_or_else(|| AppError::new(ErrorCode::AttendanceNotFound))?;

    Ok(Json(ActionResponse::ok(
        "Attendance created successfully",
        row,
    )))
}

pub async fn mark(
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> ApiResult<Attendance> {
    let (Some(user_id), Some(date), Some(status)) = (req.user_id, req.date, req.status) else {
        return Err(AppError::validation("User, date, and status are required"));
    };

    let row = db::attendance::mark(&state.pool, &new_id(), &user_id, date, status, now_millis())
        .await
        .map_err(db_error("Failed to mark attendance"))?;

    Ok(Json(ActionResponse::ok("Attendance marked successfully", row)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AttendanceUpdate>,
) -> ApiResult<AttendanceWithUser> {
    let updated = db::attendance::update(&state.pool, &id, &req, now_millis())
        .await
        .map_err(db_error("Failed to update attendance record"))?;
    if updated.is_none() {
        return Err(AppError::new(ErrorCode::AttendanceNotFound));
    }

    // Re-attach the owner relation; the owner may have changed
    let row = db::attendance::find_with_user(&state.pool, &id)
        .await
        .map_err(db_error("Failed to update attendance record"))?
        .ok_or_else(|| AppError::new(ErrorCode::AttendanceNotFound))?;

    Ok(Json(ActionResponse::ok(
        "Attendance updated successfully",
        row,
    )))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let deleted = db::attendance::delete(&state.pool, &id)
        .await
        .map_err(db_error("Failed to delete attendance record"))?;
    if !deleted {
        return Err(AppError::new(ErrorCode::AttendanceNotFound));
    }

    Ok(Json(ActionResponse::ok_empty(
        "Attendance deleted successfully",
    )))
}

pub async fn bulk_delete(
    State(state): State<AppState>,
    Json(req): Json<BulkDeleteRequest>,
) -> ApiResult<Vec<BulkDeleteOutcome>> {
    if req.ids.is_empty() {
        return Err(AppError::validation("No attendance ids provided"));
    }

    let outcomes = db::attendance::bulk_delete(&state.pool, &req.ids)
        .await
        .map_err(db_error("Failed to delete attendance records"))?;

    let deleted = outcomes.iter().filter(|o| o.is_deleted()).count();
    Ok(Json(ActionResponse::ok(
        format!("Deleted {deleted} of {} attendance records", req.ids.len()),
        outcomes,
    )))
}
