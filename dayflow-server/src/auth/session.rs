//! JWT session authentication
//!
//! Sessions are 7-day HS256 tokens; email verification uses a separate
//! 24-hour token with a distinct purpose claim so the two are not
//! interchangeable. The session middleware hydrates a [`SessionContext`]
//! (full user record plus profile) once per request and inserts it as an
//! extension; handlers read the extension instead of re-fetching.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{Profile, Role, User};

use crate::db;
use crate::state::AppState;

const SESSION_EXPIRY_DAYS: i64 = 7;
const VERIFICATION_EXPIRY_HOURS: i64 = 24;

const PURPOSE_SESSION: &str = "session";
const PURPOSE_EMAIL_VERIFICATION: &str = "email_verification";

/// JWT claims for both session and verification tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID (session) or email (verification)
    pub sub: String,
    /// Token purpose: "session" | "email_verification"
    pub purpose: String,
    /// User role (session tokens only)
    pub role: Option<Role>,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Per-request session context, hydrated once at the request boundary
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user: User,
    pub profile: Option<Profile>,
}

impl SessionContext {
    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    pub fn is_admin(&self) -> bool {
        self.user.role.is_admin()
    }
}

/// Create a 7-day session token for a user
pub fn create_session_token(
    user_id: &str,
    role: Role,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        purpose: PURPOSE_SESSION.to_string(),
        role: Some(role),
        exp: (now + chrono::Duration::days(SESSION_EXPIRY_DAYS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    encode(&claims, secret)
}

/// Create a 24-hour email verification token
pub fn create_verification_token(
    email: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: email.to_string(),
        purpose: PURPOSE_EMAIL_VERIFICATION.to_string(),
        role: None,
        exp: (now + chrono::Duration::hours(VERIFICATION_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    encode(&claims, secret)
}

fn encode(claims: &Claims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    jsonwebtoken::encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Decode and verify a token of the given purpose
pub fn decode_token(token: &str, purpose_wanted: &str, secret: &str) -> Result<Claims, AppError> {
    let validation = Validation::default();
    let token_data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::new(ErrorCode::TokenExpired)
            }
            _ => AppError::new(ErrorCode::TokenInvalid),
        }
    })?;

    if token_data.claims.purpose != purpose_wanted {
        return Err(AppError::invalid_token("Wrong token purpose"));
    }
    Ok(token_data.claims)
}

/// Decode a session token
pub fn decode_session_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode_token(token, PURPOSE_SESSION, secret)
}

/// Decode an email verification token
pub fn decode_verification_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode_token(token, PURPOSE_EMAIL_VERIFICATION, secret)
}

fn bearer_token(request: &Request) -> Result<&str, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::with_message(ErrorCode::NotAuthenticated, "Missing Authorization header"))?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::with_message(ErrorCode::NotAuthenticated, "Invalid Authorization format"))
}

/// Middleware that verifies the session token and hydrates [`SessionContext`]
/// from the database (always-fresh role/profile data)
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request)?;
    let claims = decode_session_token(token, &state.jwt_secret)?;

    let (user, profile) = db::users::find_with_profile(&state.pool, &claims.sub)
        .await
        .map_err(|e| {
            tracing::error!("Session lookup failed: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::SessionExpired))?;

    request
        .extensions_mut()
        .insert(SessionContext { user, profile });

    Ok(next.run(request).await)
}

/// Middleware that requires an admin session (layered after
/// [`session_middleware`])
pub async fn admin_middleware(request: Request, next: Next) -> Result<Response, AppError> {
    let session = request
        .extensions()
        .get::<SessionContext>()
        .ok_or_else(AppError::not_authenticated)?;

    if !session.is_admin() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_session_token_roundtrip() {
        let token = create_session_token("user-1", Role::Employee, SECRET).unwrap();
        let claims = decode_session_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.role, Some(Role::Employee));
        assert_eq!(claims.purpose, "session");
        // 7-day expiry
        assert_eq!((claims.exp - claims.iat) as i64, SESSION_EXPIRY_DAYS * 86_400);
    }

    #[test]
    fn test_verification_token_roundtrip() {
        let token = create_verification_token("a@b.com", SECRET).unwrap();
        let claims = decode_verification_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "a@b.com");
        assert!(claims.role.is_none());
        // 24-hour expiry
        assert_eq!(
            (claims.exp - claims.iat) as i64,
            VERIFICATION_EXPIRY_HOURS * 3_600
        );
    }

    #[test]
    fn test_purposes_are_not_interchangeable() {
        let session = create_session_token("user-1", Role::Admin, SECRET).unwrap();
        assert!(decode_verification_token(&session, SECRET).is_err());

        let verify = create_verification_token("a@b.com", SECRET).unwrap();
        assert!(decode_session_token(&verify, SECRET).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_session_token("user-1", Role::Admin, SECRET).unwrap();
        let err = decode_session_token(&token, "other-secret").unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }
}
