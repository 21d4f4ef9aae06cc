use chrono::NaiveDate;
use shared::models::{
    Attendance, AttendanceStatus, AttendanceUpdate, AttendanceWithUser, BulkDeleteOutcome,
    UserPublic,
};
use sqlx::PgPool;

#[derive(sqlx::FromRow)]
pub struct AttendanceRow {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl AttendanceRow {
    pub fn into_attendance(self) -> Attendance {
        Attendance {
            id: self.id,
            user_id: self.user_id,
            date: self.date,
            status: AttendanceStatus::from_db(&self.status).unwrap_or(AttendanceStatus::Absent),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Attendance row joined with the owner's public user fields
#[derive(sqlx::FromRow)]
pub struct AttendanceUserRow {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub user_name: String,
    pub user_email: String,
    pub user_image: Option<String>,
}

impl AttendanceUserRow {
    pub fn into_with_user(self) -> AttendanceWithUser {
        let user = UserPublic {
            id: self.user_id.clone(),
            name: self.user_name,
            email: self.user_email,
            image: self.user_image,
        };
        AttendanceWithUser {
            attendance: Attendance {
                id: self.id,
                user_id: self.user_id,
                date: self.date,
                status: AttendanceStatus::from_db(&self.status)
                    .unwrap_or(AttendanceStatus::Absent),
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            user,
        }
    }
}

const WITH_USER_SELECT: &str =
    "SELECT a.id, a.user_id, a.date, a.status, a.created_at, a.updated_at,
            u.name AS user_name, u.email AS user_email, u.image AS user_image
     FROM attendance a
     JOIN users u ON u.id = a.user_id";

pub async fn create(
    pool: &PgPool,
    id: &str,
    user_id: &str,
    date: NaiveDate,
    status: AttendanceStatus,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO attendance (id, user_id, date, status, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $5)",
    )
    .bind(id)
    .bind(user_id)
    .bind(date)
    .bind(status.as_db())
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_with_user(
    pool: &PgPool,
    id: &str,
) -> Result<Option<AttendanceWithUser>, sqlx::Error> {
    let row: Option<AttendanceUserRow> =
        sqlx::query_as(&format!("{WITH_USER_SELECT} WHERE a.id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(AttendanceUserRow::into_with_user))
}

/// Upsert on (user_id, date): marking an already-marked day overwrites the
/// status in place.
pub async fn mark(
    pool: &PgPool,
    id: &str,
    user_id: &str,
    date: NaiveDate,
    status: AttendanceStatus,
    now: i64,
) -> Result<Attendance, sqlx::Error> {
    let row: AttendanceRow = sqlx::query_as(
        "INSERT INTO attendance (id, user_id, date, status, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $5)
         ON CONFLICT (user_id, date)
         DO UPDATE SET status = EXCLUDED.status, updated_at = EXCLUDED.updated_at
         RETURNING *",
    )
    .bind(id)
    .bind(user_id)
    .bind(date)
    .bind(status.as_db())
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row.into_attendance())
}

pub async fn update(
    pool: &PgPool,
    id: &str,
    update: &AttendanceUpdate,
    now: i64,
) -> Result<Option<Attendance>, sqlx::Error> {
    let row: Option<AttendanceRow> = sqlx::query_as(
        "UPDATE attendance
         SET status = COALESCE($2, status),
             date = COALESCE($3, date),
             user_id = COALESCE($4, user_id),
             updated_at = $5
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(update.status.map(|s| s.as_db()))
    .bind(update.date)
    .bind(update.user_id.as_deref())
    .bind(now)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(AttendanceRow::into_attendance))
}

pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM attendance WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Bulk delete with a per-id outcome; ids that matched no row are reported
/// rather than silently skipped.
pub async fn bulk_delete(
    pool: &PgPool,
    ids: &[String],
) -> Result<Vec<BulkDeleteOutcome>, sqlx::Error> {
    let deleted: Vec<(String,)> = sqlx::query_as(
        "DELETE FROM attendance WHERE id = ANY($1) RETURNING id",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    let deleted = deleted.into_iter().map(|(id,)| id).collect();
    Ok(BulkDeleteOutcome::tag_all(ids, &deleted))
}

/// Admin listing: optional user/status/date-range filters plus a free-text
/// search over the owner's name and email, newest first, with the total
/// count for pagination.
#[allow(clippy::too_many_arguments)]
pub async fn list_with_filters(
    pool: &PgPool,
    user_id: Option<&str>,
    status: Option<AttendanceStatus>,
    search: Option<&str>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    limit: i64,
    offset: i64,
) -> Result<(Vec<AttendanceWithUser>, i64), sqlx::Error> {
    const FILTER: &str = "($1::TEXT IS NULL OR a.user_id = $1)
           AND ($2::TEXT IS NULL OR a.status = $2)
           AND ($3::TEXT IS NULL
                OR u.name ILIKE '%' || $3 || '%'
                OR u.email ILIKE '%' || $3 || '%')
           AND ($4::DATE IS NULL OR a.date >= $4)
           AND ($5::DATE IS NULL OR a.date <= $5)";

    let rows: Vec<AttendanceUserRow> = sqlx::query_as(&format!(
        "{WITH_USER_SELECT}
         WHERE {FILTER}
         ORDER BY a.date DESC, a.created_at DESC
         LIMIT $6 OFFSET $7"
    ))
    .bind(user_id)
    .bind(status.map(|s| s.as_db()))
    .bind(search)
    .bind(from)
    .bind(to)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let (total,): (i64,) = sqlx::query_as(&format!(
        "SELECT COUNT(*)
         FROM attendance a
         JOIN users u ON u.id = a.user_id
         WHERE {FILTER}"
    ))
    .bind(user_id)
    .bind(status.map(|s| s.as_db()))
    .bind(search)
    .bind(from)
    .bind(to)
    .fetch_one(pool)
    .await?;

    Ok((
        rows.into_iter().map(AttendanceUserRow::into_with_user).collect(),
        total,
    ))
}

/// Self-service listing: a user's own records, optionally bounded by a
/// date range, newest first.
pub async fn list_by_user(
    pool: &PgPool,
    user_id: &str,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    limit: i64,
) -> Result<Vec<Attendance>, sqlx::Error> {
    let rows: Vec<AttendanceRow> = sqlx::query_as(
        "SELECT * FROM attendance
         WHERE user_id = $1
           AND ($2::DATE IS NULL OR date >= $2)
           AND ($3::DATE IS NULL OR date <= $3)
         ORDER BY date DESC
         LIMIT $4",
    )
    .bind(user_id)
    .bind(from)
    .bind(to)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(AttendanceRow::into_attendance).collect())
}

/// Today's status breakdown for the admin overview.
pub async fn today_counts(
    pool: &PgPool,
    today: NaiveDate,
) -> Result<Vec<(AttendanceStatus, i64)>, sqlx::Error> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT status, COUNT(*) FROM attendance WHERE date = $1 GROUP BY status",
    )
    .bind(today)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(status, count)| AttendanceStatus::from_db(&status).map(|s| (s, count)))
        .collect())
}
