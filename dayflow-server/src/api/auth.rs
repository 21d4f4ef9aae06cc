//! Authentication handlers
//!
//! POST /api/auth/signup       — create account + profile, issue tokens
//! POST /api/auth/signin       — verify credentials, issue session token
//! POST /api/auth/verify-email — consume a verification token
//! POST /api/auth/verify-token — check a session token
//! GET  /api/auth/me           — current session context
//! POST /api/auth/logout       — stateless acknowledgement

use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{Profile, Role, User};
use shared::response::ActionResponse;
use shared::util::{new_id, now_millis};
use validator::Validate;

use crate::auth::session::{
    SessionContext, create_session_token, create_verification_token, decode_session_token,
    decode_verification_token,
};
use crate::state::AppState;
use crate::util::{hash_password, verify_password};
use crate::validation::{employee_id_format, password_strength, validate};
use crate::{api::ApiResult, api::db_error, db};

// ── Request / Response types ──

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom(function = employee_id_format))]
    pub employee_id: String,
    #[validate(custom(function = password_strength))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Deserialize, Validate)]
pub struct SigninRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Deserialize)]
pub struct TokenRequest {
    pub token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupData {
    pub user: User,
    pub token: String,
    /// Returned directly; there is no mail delivery in this deployment
    pub verification_token: String,
}

#[derive(Serialize)]
pub struct SigninData {
    pub user: User,
    pub token: String,
}

#[derive(Serialize)]
pub struct MeData {
    pub user: User,
    pub profile: Option<Profile>,
}

// ── POST /api/auth/signup ──

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<SignupData> {
    validate(&req)?;
    let email = req.email.trim().to_lowercase();

    // Proactive uniqueness checks so the caller gets field-scoped errors
    // instead of a constraint violation
    if db::users::find_by_email(&state.pool, &email)
        .await
        .map_err(db_error("Failed to create account"))?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::EmailExists)
            .with_field_error("email", "Email already registered"));
    }
    if db::profiles::find_by_employee_id(&state.pool, &req.employee_id)
        .await
        .map_err(db_error("Failed to create account"))?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::EmployeeIdExists)
            .with_field_error("employeeId", "Employee ID already in use"));
    }

    let hashed = hash_password(&req.password).map_err(|e| {
        tracing::error!(%e, "Password hash error");
        AppError::internal("Failed to create account")
    })?;

    let user_id = new_id();
    let now = now_millis();
    let role = if req.is_admin { Role::Admin } else { Role::Employee };
    db::users::create_with_profile(
        &state.pool,
        &user_id,
        &new_id(),
        &req.name,
        &email,
        &req.employee_id,
        role,
        &hashed,
        now,
    )
    .await
    .map_err(db_error("Failed to create account"))?;

    let token = issue_session_token(&user_id, role, &state.jwt_secret)?;
    let verification_token =
        create_verification_token(&email, &state.jwt_secret).map_err(|e| {
            tracing::error!(%e, "Token creation error");
            AppError::internal("Failed to create account")
        })?;

    tracing::info!(user_id = %user_id, email = %email, "Account created");

    let user = User {
        id: user_id,
        name: req.name,
        email,
        email_verified: false,
        image: None,
        role,
        created_at: now,
        updated_at: now,
    };
    Ok(Json(ActionResponse::ok(
        "Account created successfully",
        SignupData {
            user,
            token,
            verification_token,
        },
    )))
}

// ── POST /api/auth/signin ──

pub async fn signin(
    State(state): State<AppState>,
    Json(req): Json<SigninRequest>,
) -> ApiResult<SigninData> {
    validate(&req)?;
    let email = req.email.trim().to_lowercase();

    let user = db::users::find_by_email(&state.pool, &email)
        .await
        .map_err(db_error("Failed to sign in"))?
        .ok_or_else(|| {
            AppError::invalid_credentials()
                .with_field_error("email", "No account found with this email")
        })?;

    // Accounts created by an admin have no password until signup
    let Some(hash) = user.hashed_password.as_deref() else {
        return Err(AppError::invalid_credentials());
    };
    if !verify_password(&req.password, hash) {
        return Err(AppError::invalid_credentials());
    }

    let user = user.into_user();
    let token = issue_session_token(&user.id, user.role, &state.jwt_secret)?;

    tracing::info!(user_id = %user.id, "Signed in");
    Ok(Json(ActionResponse::ok(
        "Signed in successfully",
        SigninData { user, token },
    )))
}

// ── POST /api/auth/verify-email ──

pub async fn verify_email(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> ApiResult<()> {
    let claims = decode_verification_token(&req.token, &state.jwt_secret)?;

    let user = db::users::find_by_email(&state.pool, &claims.sub)
        .await
        .map_err(db_error("Failed to verify email"))?
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;

    db::users::set_email_verified(&state.pool, &user.id, now_millis())
        .await
        .map_err(db_error("Failed to verify email"))?;

    Ok(Json(ActionResponse::ok_empty("Email verified successfully")))
}

// ── POST /api/auth/verify-token ──

pub async fn verify_token(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> ApiResult<User> {
    let claims = decode_session_token(&req.token, &state.jwt_secret)?;

    let user = db::users::find_by_id(&state.pool, &claims.sub)
        .await
        .map_err(db_error("Failed to verify token"))?
        .ok_or_else(|| AppError::new(ErrorCode::SessionExpired))?;

    Ok(Json(ActionResponse::ok("Token is valid", user.into_user())))
}

// ── GET /api/auth/me ──

pub async fn me(Extension(session): Extension<SessionContext>) -> ApiResult<MeData> {
    Ok(Json(ActionResponse::ok(
        "Session active",
        MeData {
            user: session.user,
            profile: session.profile,
        },
    )))
}

// ── POST /api/auth/logout ──

/// Sessions are stateless JWTs; logout is client-side token disposal and the
/// server only acknowledges.
pub async fn logout() -> ApiResult<()> {
    Ok(Json(ActionResponse::ok_empty("Signed out successfully")))
}

fn issue_session_token(user_id: &str, role: Role, secret: &str) -> Result<String, AppError> {
    create_session_token(user_id, role, secret).map_err(|e| {
        tracing::error!(%e, "Token creation error");
        AppError::internal("Failed to create session")
    })
}
