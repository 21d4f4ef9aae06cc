//! API routes for dayflow-server

pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod employees;
pub mod health;
pub mod leaves;
pub mod profile;

use crate::auth::rate_limit::{signin_rate_limit, signup_rate_limit};
use crate::auth::session::{admin_middleware, session_middleware};
use crate::state::AppState;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router, middleware};
use shared::error::AppError;
use shared::response::ActionResponse;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Every handler resolves success and failure to distinct types: success is
/// the envelope with data, failure is an [`AppError`] that renders as the
/// envelope with `success: false`.
pub type ApiResult<T> = Result<Json<ActionResponse<T>>, AppError>;

/// Log the underlying database error and surface the per-action fallback
/// message.
pub(crate) fn db_error(fallback: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        tracing::error!(%e, "{fallback}");
        AppError::database(fallback)
    }
}

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Public auth endpoints, rate-limited per IP
    let signup = Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            signup_rate_limit,
        ));
    let signin = Router::new()
        .route("/api/auth/signin", post(auth::signin))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            signin_rate_limit,
        ));
    let public_auth = Router::new()
        .route("/api/auth/verify-email", post(auth::verify_email))
        .route("/api/auth/verify-token", post(auth::verify_token))
        .merge(signup)
        .merge(signin);

    // Self-service endpoints for the signed-in user
    let me = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/me/profile", get(profile::get_own).put(profile::update_own))
        .route("/api/me/attendance", get(profile::own_attendance))
        .route("/api/me/attendance/mark", post(profile::mark_own_attendance))
        .route("/api/me/leaves", get(profile::own_leaves).post(profile::apply_leave))
        .route("/api/me/leaves/stats", get(profile::own_leave_stats))
        .route("/api/me/leaves/{id}", delete(profile::cancel_leave))
        .route("/api/me/dashboard", get(dashboard::employee_dashboard))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    // Admin endpoints: session + role check
    let admin = Router::new()
        .route(
            "/api/admin/employees",
            get(employees::list).post(employees::create),
        )
        .route(
            "/api/admin/employees/{id}",
            get(employees::get).put(employees::update).delete(employees::remove),
        )
        .route("/api/admin/employees/bulk-delete", post(employees::bulk_delete))
        .route(
            "/api/admin/attendance",
            get(attendance::list).post(attendance::create),
        )
        .route("/api/admin/attendance/mark", post(attendance::mark))
        .route(
            "/api/admin/attendance/{id}",
            put(attendance::update).delete(attendance::remove),
        )
        .route("/api/admin/attendance/bulk-delete", post(attendance::bulk_delete))
        .route("/api/admin/leaves", get(leaves::list).post(leaves::create))
        .route(
            "/api/admin/leaves/{id}",
            put(leaves::update).delete(leaves::remove),
        )
        .route("/api/admin/leaves/bulk-delete", post(leaves::bulk_delete))
        .route("/api/admin/overview", get(dashboard::admin_overview))
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(public_auth)
        .merge(me)
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
