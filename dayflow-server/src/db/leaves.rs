use shared::models::{
    BulkDeleteOutcome, Leave, LeaveStats, LeaveStatus, LeaveType, LeaveUpdate, LeaveWithUser,
    UserPublic, leave_days,
};
use sqlx::PgPool;

#[derive(sqlx::FromRow)]
pub struct LeaveRow {
    pub id: String,
    pub user_id: String,
    pub leave_type: String,
    pub start_date: i64,
    pub end_date: i64,
    pub reason: String,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl LeaveRow {
    pub fn into_leave(self) -> Leave {
        Leave {
            id: self.id,
            user_id: self.user_id,
            leave_type: LeaveType::from_db(&self.leave_type).unwrap_or(LeaveType::Unpaid),
            start_date: self.start_date,
            end_date: self.end_date,
            reason: self.reason,
            status: LeaveStatus::from_db(&self.status).unwrap_or(LeaveStatus::Pending),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Leave row joined with the owner's public user fields
#[derive(sqlx::FromRow)]
pub struct LeaveUserRow {
    pub id: String,
    pub user_id: String,
    pub leave_type: String,
    pub start_date: i64,
    pub end_date: i64,
    pub reason: String,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub user_name: String,
    pub user_email: String,
    pub user_image: Option<String>,
}

impl LeaveUserRow {
    pub fn into_with_user(self) -> LeaveWithUser {
        let user = UserPublic {
            id: self.user_id.clone(),
            name: self.user_name,
            email: self.user_email,
            image: self.user_image,
        };
        LeaveWithUser {
            leave: LeaveRow {
                id: self.id,
                user_id: self.user_id,
                leave_type: self.leave_type,
                start_date: self.start_date,
                end_date: self.end_date,
                reason: self.reason,
                status: self.status,
                created_at: self.created_at,
                updated_at: self.updated_at,
            }
            .into_leave(),
            user,
        }
    }
}

const WITH_USER_SELECT: &str =
    "SELECT l.id, l.user_id, l.leave_type, l.start_date, l.end_date, l.reason, l.status,
            l.created_at, l.updated_at,
            u.name AS user_name, u.email AS user_email, u.image AS user_image
     FROM leaves l
     JOIN users u ON u.id = l.user_id";

/// New requests always start PENDING regardless of caller input.
pub async fn create(
    pool: &PgPool,
    id: &str,
    user_id: &str,
    leave_type: LeaveType,
    start_date: i64,
    end_date: i64,
    reason: &str,
    now: i64,
) -> Result<Leave, sqlx::Error> {
    let row: LeaveRow = sqlx::query_as(
        "INSERT INTO leaves (id, user_id, leave_type, start_date, end_date, reason, status, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, 'PENDING', $7, $7)
         RETURNING *",
    )
    .bind(id)
    .bind(user_id)
    .bind(leave_type.as_db())
    .bind(start_date)
    .bind(end_date)
    .bind(reason)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row.into_leave())
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Leave>, sqlx::Error> {
    let row: Option<LeaveRow> = sqlx::query_as("SELECT * FROM leaves WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(LeaveRow::into_leave))
}

pub async fn find_with_user(pool: &PgPool, id: &str) -> Result<Option<LeaveWithUser>, sqlx::Error> {
    let row: Option<LeaveUserRow> =
        sqlx::query_as(&format!("{WITH_USER_SELECT} WHERE l.id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(LeaveUserRow::into_with_user))
}

pub async fn list_by_user(pool: &PgPool, user_id: &str, limit: i64) -> Result<Vec<Leave>, sqlx::Error> {
    let rows: Vec<LeaveRow> = sqlx::query_as(
        "SELECT * FROM leaves WHERE user_id = $1 ORDER BY start_date DESC LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(LeaveRow::into_leave).collect())
}

/// Admin listing: optional status/user filters, newest first, with the
/// total count for pagination.
pub async fn list_all_with_user(
    pool: &PgPool,
    status: Option<LeaveStatus>,
    user_id: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<(Vec<LeaveWithUser>, i64), sqlx::Error> {
    const FILTER: &str = "($1::TEXT IS NULL OR l.status = $1)
           AND ($2::TEXT IS NULL OR l.user_id = $2)";

    let rows: Vec<LeaveUserRow> = sqlx::query_as(&format!(
        "{WITH_USER_SELECT}
         WHERE {FILTER}
         ORDER BY l.created_at DESC
         LIMIT $3 OFFSET $4"
    ))
    .bind(status.map(|s| s.as_db()))
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let (total,): (i64,) = sqlx::query_as(&format!(
        "SELECT COUNT(*) FROM leaves l WHERE {FILTER}"
    ))
    .bind(status.map(|s| s.as_db()))
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok((rows.into_iter().map(LeaveUserRow::into_with_user).collect(), total))
}

pub async fn count_pending(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM leaves WHERE status = 'PENDING'")
            .fetch_one(pool)
            .await?;
    Ok(count)
}

pub async fn update(
    pool: &PgPool,
    id: &str,
    update: &LeaveUpdate,
    now: i64,
) -> Result<Option<Leave>, sqlx::Error> {
    let row: Option<LeaveRow> = sqlx::query_as(
        "UPDATE leaves
         SET leave_type = COALESCE($2, leave_type),
             start_date = COALESCE($3, start_date),
             end_date = COALESCE($4, end_date),
             reason = COALESCE($5, reason),
             status = COALESCE($6, status),
             updated_at = $7
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(update.leave_type.map(|t| t.as_db()))
    .bind(update.start_date)
    .bind(update.end_date)
    .bind(update.reason.as_deref())
    .bind(update.status.map(|s| s.as_db()))
    .bind(now)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(LeaveRow::into_leave))
}

pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM leaves WHERE id = $1")
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
    let deleted: Vec<(String,)> =
        sqlx::query_as("DELETE FROM leaves WHERE id = ANY($1) RETURNING id")
            .bind(ids)
            .fetch_all(pool)
            .await?;

    let deleted = deleted.into_iter().map(|(id,)| id).collect();
    Ok(BulkDeleteOutcome::tag_all(ids, &deleted))
}

/// Per-year statistics: fetch the year's (status, span) rows and fold in
/// application code so day counting stays in one place.
pub async fn stats_for_year(
    pool: &PgPool,
    user_id: &str,
    year_start_millis: i64,
    year_end_millis: i64,
) -> Result<LeaveStats, sqlx::Error> {
    let rows: Vec<(String, i64, i64)> = sqlx::query_as(
        "SELECT status, start_date, end_date FROM leaves
         WHERE user_id = $1 AND start_date >= $2 AND start_date < $3",
    )
    .bind(user_id)
    .bind(year_start_millis)
    .bind(year_end_millis)
    .fetch_all(pool)
    .await?;

    let parsed: Vec<(LeaveStatus, i64, i64)> = rows
        .into_iter()
        .filter_map(|(status, start, end)| {
            LeaveStatus::from_db(&status).map(|s| (s, start, end))
        })
        .collect();

    Ok(fold_stats(&parsed))
}

/// Inclusive day totals are summed over APPROVED leaves only.
pub fn fold_stats(rows: &[(LeaveStatus, i64, i64)]) -> LeaveStats {
    let mut stats = LeaveStats {
        total: 0,
        pending: 0,
        approved: 0,
        rejected: 0,
        total_days: 0,
    };
    for &(status, start, end) in rows {
        stats.total += 1;
        match status {
            LeaveStatus::Pending => stats.pending += 1,
            LeaveStatus::Approved => {
                stats.approved += 1;
                stats.total_days += leave_days(start, end);
            }
            LeaveStatus::Rejected => stats.rejected += 1,
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400_000;

    #[test]
    fn test_fold_stats_counts_and_days() {
        let t0 = 1_735_689_600_000; // 2025-01-01T00:00:00Z
        let rows = vec![
            (LeaveStatus::Approved, t0, t0 + 2 * DAY), // 3 days
            (LeaveStatus::Approved, t0, t0),           // 1 day
            (LeaveStatus::Pending, t0, t0 + 9 * DAY),  // not counted in days
            (LeaveStatus::Rejected, t0, t0 + DAY),
        ];
        let stats = fold_stats(&rows);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.approved, 2);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.total_days, 4);
    }

    #[test]
    fn test_fold_stats_empty() {
        let stats = fold_stats(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.total_days, 0);
    }
}
