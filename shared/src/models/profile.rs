//! Profile model
//!
//! The HR-specific extension of a user record: employee ID, phone, address,
//! salary. One-to-one with [`super::User`].

use serde::{Deserialize, Serialize};

/// Employee profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub user_id: String,
    /// Externally assigned business identifier, digits-only, at most 7 digits
    pub employee_id: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub salary: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Profile payload supplied when creating or updating an employee
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePayload {
    pub employee_id: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub salary: Option<i64>,
}
