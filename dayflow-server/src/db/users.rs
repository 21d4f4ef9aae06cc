use shared::models::{Profile, Role, User};
use sqlx::PgPool;

use super::profiles::ProfileRow;

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub image: Option<String>,
    pub role: String,
    /// NULL for admin-created accounts that have not signed up yet
    pub hashed_password: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl UserRow {
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            email_verified: self.email_verified,
            image: self.image,
            role: Role::from_db(&self.role).unwrap_or(Role::Employee),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Signup writes the user and their profile together; a failure on either
/// insert rolls both back.
#[allow(clippy::too_many_arguments)]
pub async fn create_with_profile(
    pool: &PgPool,
    user_id: &str,
    profile_id: &str,
    name: &str,
    email: &str,
    employee_id: &str,
    role: Role,
    hashed_password: &str,
    now: i64,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO users (id, name, email, email_verified, role, hashed_password, created_at, updated_at)
         VALUES ($1, $2, $3, FALSE, $4, $5, $6, $6)",
    )
    .bind(user_id)
    .bind(name)
    .bind(email)
    .bind(role.as_db())
    .bind(hashed_password)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO profiles (id, user_id, employee_id, name, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $5)",
    )
    .bind(profile_id)
    .bind(user_id)
    .bind(employee_id)
    .bind(name)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// User plus their profile, if one exists. Used to hydrate the session
/// context on every authenticated request.
pub async fn find_with_profile(
    pool: &PgPool,
    id: &str,
) -> Result<Option<(User, Option<Profile>)>, sqlx::Error> {
    let Some(user) = find_by_id(pool, id).await? else {
        return Ok(None);
    };

    let profile: Option<ProfileRow> = sqlx::query_as("SELECT * FROM profiles WHERE user_id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(Some((user.into_user(), profile.map(ProfileRow::into_profile))))
}

pub async fn set_email_verified(pool: &PgPool, id: &str, now: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET email_verified = TRUE, updated_at = $1 WHERE id = $2")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
