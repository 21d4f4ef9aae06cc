use shared::models::Profile;
use sqlx::PgPool;

#[derive(sqlx::FromRow)]
pub struct ProfileRow {
    pub id: String,
    pub user_id: String,
    pub employee_id: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub salary: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ProfileRow {
    pub fn into_profile(self) -> Profile {
        Profile {
            id: self.id,
            user_id: self.user_id,
            employee_id: self.employee_id,
            name: self.name,
            phone: self.phone,
            address: self.address,
            salary: self.salary,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

pub async fn find_by_employee_id(
    pool: &PgPool,
    employee_id: &str,
) -> Result<Option<Profile>, sqlx::Error> {
    let row: Option<ProfileRow> = sqlx::query_as("SELECT * FROM profiles WHERE employee_id = $1")
        .bind(employee_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(ProfileRow::into_profile))
}

/// Self-service update: only name, phone and address are writable by the
/// owner. Employee ID and salary stay admin-only.
pub async fn update_own(
    pool: &PgPool,
    user_id: &str,
    name: Option<&str>,
    phone: Option<&str>,
    address: Option<&str>,
    now: i64,
) -> Result<Option<Profile>, sqlx::Error> {
    let row: Option<ProfileRow> = sqlx::query_as(
        "UPDATE profiles
         SET name = COALESCE($2, name),
             phone = COALESCE($3, phone),
             address = COALESCE($4, address),
             updated_at = $5
         WHERE user_id = $1
         RETURNING *",
    )
    .bind(user_id)
    .bind(name)
    .bind(phone)
    .bind(address)
    .bind(now)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(ProfileRow::into_profile))
}
