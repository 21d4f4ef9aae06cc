//! Admin employee management
//!
//! GET/POST /api/admin/employees
//! GET/PUT/DELETE /api/admin/employees/{id}
//! POST /api/admin/employees/bulk-delete

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    BulkDeleteOutcome, EmployeeCreate, EmployeeDetail, EmployeeRecord, EmployeeUpdate, Role,
};
use shared::response::{ActionResponse, Paged};

use crate::state::AppState;
use crate::validation::{employee_id_format, validate};
use crate::{api::ApiResult, api::db_error, db};
use validator::Validate;

#[derive(Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub role: Option<Role>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub email_verified: Option<bool>,
    pub image: Option<String>,
    pub role: Option<Role>,
    pub profile: Option<ProfilePayloadRequest>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePayloadRequest {
    #[validate(custom(function = employee_id_format))]
    pub employee_id: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[validate(range(min = 0, message = "Salary must be non-negative"))]
    pub salary: Option<i64>,
}

#[derive(Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Paged<EmployeeRecord>> {
    let (items, total) = db::employees::list_with_filters(
        &state.pool,
        query.search.as_deref().filter(|s| !s.is_empty()),
        query.role,
        query.limit.unwrap_or(20).clamp(1, 100),
        query.offset.unwrap_or(0).max(0),
    )
    .await
    .map_err(db_error("Failed to fetch employees"))?;

    Ok(Json(ActionResponse::ok(
        "Employees fetched",
        Paged { items, total },
    )))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> ApiResult<EmployeeDetail> {
    validate(&req)?;
    if let Some(profile) = &req.profile {
        validate(profile)?;
    }
    let email = req.email.trim().to_lowercase();

    if db::users::find_by_email(&state.pool, &email)
        .await
        .map_err(db_error("Failed to create employee"))?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::EmailExists)
            .with_field_error("email", "Email already registered"));
    }
    if let Some(employee_id) = req.profile.as_ref().and_then(|p| p.employee_id.as_deref())
        && db::profiles::find_by_employee_id(&state.pool, employee_id)
            .await
            .map_err(db_error("Failed to create employee"))?
            .is_some()
    {
        return Err(AppError::new(ErrorCode::EmployeeIdExists)
            .with_field_error("employeeId", "Employee ID already in use"));
    }

    let payload = EmployeeCreate {
        name: req.name,
        email,
        email_verified: req.email_verified,
        image: req.image,
        role: req.role,
        profile: req.profile.map(|p| shared::models::ProfilePayload {
            employee_id: p.employee_id,
            name: p.name,
            phone: p.phone,
            address: p.address,
            salary: p.salary,
        }),
    };

    let user_id = db::employees::create_with_profile(&state.pool, &payload)
        .await
        .map_err(db_error("Failed to create employee"))?;

    let detail = db::employees::get_detail(&state.pool, &user_id)
        .await
        .map_err(db_error("Failed to create employee"))?
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;

    tracing::info!(user_id = %user_id, "Employee created");
    Ok(Json(ActionResponse::ok("Employee created successfully", detail)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<EmployeeDetail> {
    let detail = db::employees::get_detail(&state.pool, &id)
        .await
        .map_err(db_error("Failed to fetch employee"))?
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;

    Ok(Json(ActionResponse::ok("Employee fetched", detail)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<EmployeeUpdate>,
) -> ApiResult<EmployeeDetail> {
    let updated = db::employees::update_with_profile(&state.pool, &id, &req)
        .await
        .map_err(db_error("Failed to update employee"))?;
    if !updated {
        return Err(AppError::new(ErrorCode::EmployeeNotFound));
    }

    let detail = db::employees::get_detail(&state.pool, &id)
        .await
        .map_err(db_error("Failed to update employee"))?
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;

    Ok(Json(ActionResponse::ok("Employee updated successfully", detail)))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let deleted = db::employees::delete_cascade(&state.pool, &id)
        .await
        .map_err(db_error("Failed to delete employee"))?;
    if !deleted {
        return Err(AppError::new(ErrorCode::EmployeeNotFound));
    }

    tracing::info!(user_id = %id, "Employee deleted");
    Ok(Json(ActionResponse::ok_empty("Employee deleted successfully")))
}

pub async fn bulk_delete(
    State(state): State<AppState>,
    Json(req): Json<BulkDeleteRequest>,
) -> ApiResult<Vec<BulkDeleteOutcome>> {
    if req.ids.is_empty() {
        return Err(AppError::validation("No employee ids provided"));
    }

    let outcomes = db::employees::bulk_delete_cascade(&state.pool, &req.ids)
        .await
        .map_err(db_error("Failed to delete employees"))?;

    let deleted = outcomes.iter().filter(|o| o.is_deleted()).count();
    tracing::info!(requested = req.ids.len(), deleted, "Employee bulk delete");
    Ok(Json(ActionResponse::ok(
        format!("Deleted {deleted} of {} employees", req.ids.len()),
        outcomes,
    )))
}
