//! Employee composition types
//!
//! An "employee" is a user plus their HR profile and activity counts; the
//! detail view additionally carries recent attendance and leave rows.

use super::attendance::Attendance;
use super::leave::Leave;
use super::profile::{Profile, ProfilePayload};
use super::user::{Role, User};
use serde::{Deserialize, Serialize};

/// Employee list entry: user + profile + activity counts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    #[serde(flatten)]
    pub user: User,
    pub profile: Option<Profile>,
    pub attendance_count: i64,
    pub leave_count: i64,
}

/// Employee detail: record plus recent activity rows
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDetail {
    #[serde(flatten)]
    pub record: EmployeeRecord,
    pub attendance: Vec<Attendance>,
    pub leaves: Vec<Leave>,
}

/// Create employee payload (admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeCreate {
    pub name: String,
    pub email: String,
    pub email_verified: Option<bool>,
    pub image: Option<String>,
    pub role: Option<Role>,
    pub profile: Option<ProfilePayload>,
}

/// Update employee payload (admin); the profile payload is applied as an
/// upsert so updating a profile-less user cannot fail
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub email_verified: Option<bool>,
    pub image: Option<String>,
    pub role: Option<Role>,
    pub profile: Option<ProfilePayload>,
}

/// Tagged per-id outcome of a bulk delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum BulkDeleteOutcome {
    Deleted { id: String },
    NotFound { id: String },
}

impl BulkDeleteOutcome {
    pub fn id(&self) -> &str {
        match self {
            Self::Deleted { id } | Self::NotFound { id } => id,
        }
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted { .. })
    }

    /// One tagged outcome per requested id, in request order, given the set
    /// of ids the delete actually removed.
    pub fn tag_all(
        ids: &[String],
        deleted: &std::collections::HashSet<String>,
    ) -> Vec<Self> {
        ids.iter()
            .map(|id| {
                if deleted.contains(id) {
                    Self::Deleted { id: id.clone() }
                } else {
                    Self::NotFound { id: id.clone() }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_outcome_tagging() {
        let json = serde_json::to_value(BulkDeleteOutcome::Deleted { id: "a".into() }).unwrap();
        assert_eq!(json["outcome"], "deleted");
        assert_eq!(json["id"], "a");

        let json = serde_json::to_value(BulkDeleteOutcome::NotFound { id: "b".into() }).unwrap();
        assert_eq!(json["outcome"], "notFound");
    }

    #[test]
    fn test_tag_all_preserves_request_order() {
        let ids: Vec<String> = ["a", "b", "c"].into_iter().map(String::from).collect();
        let deleted = std::collections::HashSet::from(["a".to_string(), "c".to_string()]);

        let outcomes = BulkDeleteOutcome::tag_all(&ids, &deleted);
        assert_eq!(
            outcomes,
            vec![
                BulkDeleteOutcome::Deleted { id: "a".into() },
                BulkDeleteOutcome::NotFound { id: "b".into() },
                BulkDeleteOutcome::Deleted { id: "c".into() },
            ]
        );
    }
}
