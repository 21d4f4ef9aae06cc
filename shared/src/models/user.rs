//! User model and role

use serde::{Deserialize, Serialize};

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    /// Parse from database string value
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "ADMIN" => Some(Self::Admin),
            "EMPLOYEE" => Some(Self::Employee),
            _ => None,
        }
    }

    /// Database string representation
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Employee => "EMPLOYEE",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// User record (without password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub image: Option<String>,
    pub role: Role,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Public projection of a user attached to attendance/leave rows
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPublic {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_db_roundtrip() {
        assert_eq!(Role::from_db("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::from_db("EMPLOYEE"), Some(Role::Employee));
        assert_eq!(Role::from_db("manager"), None);
        assert_eq!(Role::from_db(Role::Admin.as_db()), Some(Role::Admin));
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Employee).unwrap(), "\"EMPLOYEE\"");
    }
}
