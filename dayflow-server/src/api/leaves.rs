//! Admin leave management
//!
//! GET/POST /api/admin/leaves
//! PUT/DELETE /api/admin/leaves/{id}
//! POST /api/admin/leaves/bulk-delete
//!
//! Setting `status` in the update payload to APPROVED or REJECTED is the
//! approve/reject transition; there is no guard against re-transitioning a
//! terminal leave, matching how the review workflow actually gets used
//! (admins correct mis-clicks by setting the other status).

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{BulkDeleteOutcome, Leave, LeaveStatus, LeaveType, LeaveUpdate, LeaveWithUser};
use shared::response::{ActionResponse, Paged};
use shared::util::{new_id, now_millis};
use validator::Validate;

use crate::state::AppState;
use crate::validation::validate;
use crate::{api::ApiResult, api::db_error, db};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub status: Option<LeaveStatus>,
    pub user_id: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub user_id: String,
    pub leave_type: LeaveType,
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
pub struct BulkDeleteRequest {
    pub ids: Vec<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Paged<LeaveWithUser>> {
    let (items, total) = db::leaves::list_all_with_user(
        &state.pool,
        query.status,
        query.user_id.as_deref(),
        query.limit.unwrap_or(20).clamp(1, 100),
        query.offset.unwrap_or(0).max(0),
    )
    .await
    .map_err(db_error("Failed to fetch leave requests"))?;

    Ok(Json(ActionResponse::ok(
        "Leave requests fetched",
        Paged { items, total },
    )))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> ApiResult<Leave> {
    validate(&req)?;
    if req.end_date < req.start_date {
        return Err(AppError::new(ErrorCode::InvalidLeaveRange)
            .with_field_error("endDate", "End date must be on or after start date"));
    }
    if db::users::find_by_id(&state.pool, &req.user_id)
        .await
        .map_err(db_error("Failed to create leave request"))?
        .is_none()
    {
        return Err(AppError::new(ErrorCode::EmployeeNotFound));
    }

    let leave = db::leaves::create(
        &state.pool,
        &new_id(),
        &req.user_id,
        req.leave_type,
        req.start_date,
        req.end_date,
        &req.reason,
        now_millis(),
    )
    .await
    .map_err(db_error("Failed to create leave request"))?;

    Ok(Json(ActionResponse::ok(
        "Leave request created successfully",
        leave,
    )))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<LeaveUpdate>,
) -> ApiResult<LeaveWithUser> {
    let existing = db::leaves::find_by_id(&state.pool, &id)
        .await
        .map_err(db_error("Failed to update leave request"))?
        .ok_or_else(|| AppError::new(ErrorCode::LeaveNotFound))?;

    // Validate the span the row would end up with, so a partial update of
    // one date against the stored other date is still caught here
    let (start, end) = merged_range(existing.start_date, existing.end_date, &req);
    if end < start {
        return Err(AppError::new(ErrorCode::InvalidLeaveRange)
            .with_field_error("endDate", "End date must be on or after start date"));
    }

    let updated = db::leaves::update(&state.pool, &id, &req, now_millis())
        .await
        .map_err(db_error("Failed to update leave request"))?;
    if updated.is_none() {
        return Err(AppError::new(ErrorCode::LeaveNotFound));
    }

    let row = db::leaves::find_with_user(&state.pool, &id)
        .await
        .map_err(db_error("Failed to update leave request"))?
        .ok_or_else(|| AppError::new(ErrorCode::LeaveNotFound))?;

    Ok(Json(ActionResponse::ok(
        "Leave request updated successfully",
        row,
    )))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let deleted = db::leaves::delete(&state.pool, &id)
        .await
        .map_err(db_error("Failed to delete leave request"))?;
    if !deleted {
        return Err(AppError::new(ErrorCode::LeaveNotFound));
    }

    Ok(Json(ActionResponse::ok_empty(
        "Leave request deleted successfully",
    )))
}

pub async fn bulk_delete(
    State(state): State<AppState>,
    Json(req): Json<BulkDeleteRequest>,
) -> ApiResult<Vec<BulkDeleteOutcome>> {
    if req.ids.is_empty() {
        return Err(AppError::validation("No leave ids provided"));
    }

    let outcomes = db::leaves::bulk_delete(&state.pool, &req.ids)
        .await
        .map_err(db_error("Failed to delete leave requests"))?;

    let deleted = outcomes.iter().filter(|o| o.is_deleted()).count();
    Ok(Json(ActionResponse::ok(
        format!("Deleted {deleted} of {} leave requests", req.ids.len()),
        outcomes,
    )))
}

/// The span a partial update would leave in place: supplied dates override
/// the stored ones field by field.
fn merged_range(stored_start: i64, stored_end: i64, update: &LeaveUpdate) -> (i64, i64) {
    (
        update.start_date.unwrap_or(stored_start),
        update.end_date.unwrap_or(stored_end),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400_000;

    #[test]
    fn test_merged_range_end_only_below_stored_start() {
        // Stored span: days 10..12; moving only the end below day 10 must
        // produce an invalid span rather than slipping through
        let update = LeaveUpdate {
            end_date: Some(8 * DAY),
            ..Default::default()
        };
        let (start, end) = merged_range(10 * DAY, 12 * DAY, &update);
        assert!(end < start);
    }

    #[test]
    fn test_merged_range_start_only_above_stored_end() {
        let update = LeaveUpdate {
            start_date: Some(15 * DAY),
            ..Default::default()
        };
        let (start, end) = merged_range(10 * DAY, 12 * DAY, &update);
        assert!(end < start);
    }

    #[test]
    fn test_merged_range_both_supplied_override_stored() {
        let update = LeaveUpdate {
            start_date: Some(20 * DAY),
            end_date: Some(25 * DAY),
            ..Default::default()
        };
        assert_eq!(merged_range(10 * DAY, 12 * DAY, &update), (20 * DAY, 25 * DAY));
    }

    #[test]
    fn test_merged_range_no_dates_keeps_stored_span() {
        let update = LeaveUpdate::default();
        assert_eq!(merged_range(10 * DAY, 12 * DAY, &update), (10 * DAY, 12 * DAY));
    }
}
