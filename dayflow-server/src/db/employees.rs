use shared::models::{
    BulkDeleteOutcome, EmployeeCreate, EmployeeDetail, EmployeeRecord, EmployeeUpdate, Profile,
    Role, User,
};
use shared::util::{new_id, now_millis};
use sqlx::PgPool;

use crate::util::fallback_employee_id;

use super::attendance::AttendanceRow;
use super::leaves::LeaveRow;

/// Flat row for the employee listing: user columns, left-joined profile
/// columns and activity counts.
#[derive(sqlx::FromRow)]
pub struct EmployeeRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub image: Option<String>,
    pub role: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub profile_id: Option<String>,
    pub employee_id: Option<String>,
    pub profile_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub salary: Option<i64>,
    pub profile_created_at: Option<i64>,
    pub profile_updated_at: Option<i64>,
    pub attendance_count: i64,
    pub leave_count: i64,
}

impl EmployeeRow {
    pub fn into_record(self) -> EmployeeRecord {
        let profile = match (self.profile_id, self.employee_id, self.profile_name) {
            (Some(id), Some(employee_id), Some(name)) => Some(Profile {
                id,
                user_id: self.id.clone(),
                employee_id,
                name,
                phone: self.phone,
                address: self.address,
                salary: self.salary,
                created_at: self.profile_created_at.unwrap_or(self.created_at),
                updated_at: self.profile_updated_at.unwrap_or(self.updated_at),
            }),
            _ => None,
        };
        EmployeeRecord {
            user: User {
                id: self.id,
                name: self.name,
                email: self.email,
                email_verified: self.email_verified,
                image: self.image,
                role: Role::from_db(&self.role).unwrap_or(Role::Employee),
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            profile,
            attendance_count: self.attendance_count,
            leave_count: self.leave_count,
        }
    }
}

const RECORD_SELECT: &str =
    "SELECT u.id, u.name, u.email, u.email_verified, u.image, u.role, u.created_at, u.updated_at,
            p.id AS profile_id, p.employee_id, p.name AS profile_name, p.phone, p.address,
            p.salary, p.created_at AS profile_created_at, p.updated_at AS profile_updated_at,
            (SELECT COUNT(*) FROM attendance a WHERE a.user_id = u.id) AS attendance_count,
            (SELECT COUNT(*) FROM leaves l WHERE l.user_id = u.id) AS leave_count
     FROM users u
     LEFT JOIN profiles p ON p.user_id = u.id";

/// Listing with a free-text search over name, email, employee ID and phone,
/// plus an optional role filter.
pub async fn list_with_filters(
    pool: &PgPool,
    search: Option<&str>,
    role: Option<Role>,
    limit: i64,
    offset: i64,
) -> Result<(Vec<EmployeeRecord>, i64), sqlx::Error> {
    const FILTER: &str = "($1::TEXT IS NULL
            OR u.name ILIKE '%' || $1 || '%'
            OR u.email ILIKE '%' || $1 || '%'
            OR p.employee_id ILIKE '%' || $1 || '%'
            OR COALESCE(p.phone, '') ILIKE '%' || $1 || '%')
           AND ($2::TEXT IS NULL OR u.role = $2)";

    let rows: Vec<EmployeeRow> = sqlx::query_as(&format!(
        "{RECORD_SELECT}
         WHERE {FILTER}
         ORDER BY u.created_at DESC
         LIMIT $3 OFFSET $4"
    ))
    .bind(search)
    .bind(role.map(|r| r.as_db()))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let (total,): (i64,) = sqlx::query_as(&format!(
        "SELECT COUNT(*)
         FROM users u
         LEFT JOIN profiles p ON p.user_id = u.id
         WHERE {FILTER}"
    ))
    .bind(search)
    .bind(role.map(|r| r.as_db()))
    .fetch_one(pool)
    .await?;

    Ok((rows.into_iter().map(EmployeeRow::into_record).collect(), total))
}

pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Detail view: the record plus the 10 most recent attendance and leave rows.
pub async fn get_detail(pool: &PgPool, id: &str) -> Result<Option<EmployeeDetail>, sqlx::Error> {
    let row: Option<EmployeeRow> =
        sqlx::query_as(&format!("{RECORD_SELECT} WHERE u.id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    let Some(row) = row else {
        return Ok(None);
    };

    let attendance: Vec<AttendanceRow> = sqlx::query_as(
        "SELECT * FROM attendance WHERE user_id = $1 ORDER BY date DESC LIMIT 10",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let leaves: Vec<LeaveRow> = sqlx::query_as(
        "SELECT * FROM leaves WHERE user_id = $1 ORDER BY created_at DESC LIMIT 10",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(Some(EmployeeDetail {
        record: row.into_record(),
        attendance: attendance.into_iter().map(AttendanceRow::into_attendance).collect(),
        leaves: leaves.into_iter().map(LeaveRow::into_leave).collect(),
    }))
}

/// Create a user and optionally their profile in one transaction. The
/// account has no password until the employee signs up.
pub async fn create_with_profile(
    pool: &PgPool,
    create: &EmployeeCreate,
) -> Result<String, sqlx::Error> {
    let user_id = new_id();
    let now = now_millis();
    let role = create.role.unwrap_or(Role::Employee);

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO users (id, name, email, email_verified, image, role, hashed_password, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, NULL, $7, $7)",
    )
    .bind(&user_id)
    .bind(&create.name)
    .bind(&create.email)
    .bind(create.email_verified.unwrap_or(false))
    .bind(create.image.as_deref())
    .bind(role.as_db())
    .bind(now)
    .execute(&mut *tx)
    .await?;

    if let Some(payload) = &create.profile {
        let employee_id = payload
            .employee_id
            .clone()
            .unwrap_or_else(fallback_employee_id);
        sqlx::query(
            "INSERT INTO profiles (id, user_id, employee_id, name, phone, address, salary, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)",
        )
        .bind(new_id())
        .bind(&user_id)
        .bind(&employee_id)
        .bind(payload.name.as_deref().unwrap_or(&create.name))
        .bind(payload.phone.as_deref())
        .bind(payload.address.as_deref())
        .bind(payload.salary)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(user_id)
}

/// Update user fields and upsert the profile payload in one transaction, so
/// updating a profile-less user creates the profile instead of failing.
pub async fn update_with_profile(
    pool: &PgPool,
    id: &str,
    update: &EmployeeUpdate,
) -> Result<bool, sqlx::Error> {
    let now = now_millis();
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "UPDATE users
         SET name = COALESCE($2, name),
             email = COALESCE($3, email),
             email_verified = COALESCE($4, email_verified),
             image = COALESCE($5, image),
             role = COALESCE($6, role),
             updated_at = $7
         WHERE id = $1",
    )
    .bind(id)
    .bind(update.name.as_deref())
    .bind(update.email.as_deref())
    .bind(update.email_verified)
    .bind(update.image.as_deref())
    .bind(update.role.map(|r| r.as_db()))
    .bind(now)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    if let Some(payload) = &update.profile {
        sqlx::query(
            "INSERT INTO profiles (id, user_id, employee_id, name, phone, address, salary, created_at, updated_at)
             VALUES ($1, $2, $3, COALESCE($4, ''), $5, $6, $7, $8, $8)
             ON CONFLICT (user_id) DO UPDATE SET
                 employee_id = COALESCE($9, profiles.employee_id),
                 name = COALESCE($4, profiles.name),
                 phone = COALESCE($5, profiles.phone),
                 address = COALESCE($6, profiles.address),
                 salary = COALESCE($7, profiles.salary),
                 updated_at = $8",
        )
        .bind(new_id())
        .bind(id)
        .bind(payload.employee_id.clone().unwrap_or_else(fallback_employee_id))
        .bind(payload.name.as_deref())
        .bind(payload.phone.as_deref())
        .bind(payload.address.as_deref())
        .bind(payload.salary)
        .bind(now)
        .bind(payload.employee_id.as_deref())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(true)
}

/// Remove an employee and every dependent row in one transaction:
/// attendance, then leaves, then profile, then the user itself.
pub async fn delete_cascade(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM attendance WHERE user_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM leaves WHERE user_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM profiles WHERE user_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}

/// Cascade delete for a batch of ids in a single transaction, reporting a
/// per-id outcome in request order.
pub async fn bulk_delete_cascade(
    pool: &PgPool,
    ids: &[String],
) -> Result<Vec<BulkDeleteOutcome>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let found: Vec<(String,)> = sqlx::query_as("SELECT id FROM users WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(&mut *tx)
        .await?;
    let found: std::collections::HashSet<String> = found.into_iter().map(|(id,)| id).collect();

    sqlx::query("DELETE FROM attendance WHERE user_id = ANY($1)")
        .bind(ids)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM leaves WHERE user_id = ANY($1)")
        .bind(ids)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM profiles WHERE user_id = ANY($1)")
        .bind(ids)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM users WHERE id = ANY($1)")
        .bind(ids)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(BulkDeleteOutcome::tag_all(ids, &found))
}
