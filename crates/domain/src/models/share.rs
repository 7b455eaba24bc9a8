//! Project share (invitation) domain models.
//!
//! A share grants a non-owner user a role on a project. It is created pending
//! by an inviter, accepted or declined by the invited user, and revoked by
//! deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::role::{validate_invitable_role, ProjectRole};

/// Status of a project share.
///
/// State machine: `pending --accept--> accepted`,
/// `pending --decline--> declined`, any state `--revoke--> (deleted)`.
/// Declined is terminal except via revoke and re-invite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareStatus {
    Pending,
    Accepted,
    Declined,
}

impl ShareStatus {
    /// Whether an accept transition from this state succeeds.
    /// Accepting an already-accepted share is an idempotent no-op.
    pub fn can_accept(&self) -> bool {
        matches!(self, ShareStatus::Pending | ShareStatus::Accepted)
    }

    /// Whether a decline transition from this state is allowed.
    pub fn can_decline(&self) -> bool {
        matches!(self, ShareStatus::Pending)
    }
}

impl std::fmt::Display for ShareStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShareStatus::Pending => write!(f, "pending"),
            ShareStatus::Accepted => write!(f, "accepted"),
            ShareStatus::Declined => write!(f, "declined"),
        }
    }
}

/// A grant of project access to an invited user.
///
/// `user_id` is resolved from the invited email at creation when an account
/// already exists under it; otherwise it stays null and is bound on accept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectShare {
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: Option<Uuid>,
    pub email: String,
    pub role: ProjectRole,
    pub status: ShareStatus,
    /// Inviter, if the inviting account still exists.
    pub invited_by: Option<Uuid>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectShare {
    /// Whether this share currently grants its role.
    pub fn is_effective(&self) -> bool {
        self.status == ShareStatus::Accepted
    }

    /// Whether the given email may accept this share.
    pub fn can_be_accepted_by(&self, email: &str) -> bool {
        shared::validation::emails_match(&self.email, email)
    }
}

/// Request to invite a collaborator to a project.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateShareRequest {
    /// Email address of the invitee.
    #[validate(email(message = "Invalid email address"))]
    #[validate(length(max = 255, message = "Email must be at most 255 characters"))]
    pub email: String,

    /// Role to grant on acceptance ("contributor", "knowledge_manager" or "read_only").
    #[validate(custom(function = "validate_invitable_role"))]
    pub role: String,
}

/// Share response (for listing/getting).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ShareResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    pub email: String,
    pub role: ProjectRole,
    pub status: ShareStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invited_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<ProjectShare> for ShareResponse {
    fn from(share: ProjectShare) -> Self {
        Self {
            id: share.id,
            project_id: share.project_id,
            user_id: share.user_id,
            email: share.email,
            role: share.role,
            status: share.status,
            invited_by: share.invited_by,
            accepted_at: share.accepted_at,
            created_at: share.created_at,
        }
    }
}

/// Query parameters for listing shares.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct ListSharesQuery {
    /// Filter by status: "pending", "accepted", "declined", "all" (default: "all").
    pub status: Option<String>,

    /// Page number (default: 1).
    pub page: Option<i64>,

    /// Items per page (default: 50, max: 100).
    pub per_page: Option<i64>,
}

impl ListSharesQuery {
    /// Parsed status filter, or None for "all".
    pub fn status_filter(&self) -> Option<ShareStatus> {
        match self.status.as_deref() {
            Some("pending") => Some(ShareStatus::Pending),
            Some("accepted") => Some(ShareStatus::Accepted),
            Some("declined") => Some(ShareStatus::Declined),
            _ => None,
        }
    }

    pub fn page_params(&self) -> shared::pagination::PageParams {
        shared::pagination::PageParams {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Response for listing shares.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListSharesResponse {
    pub shares: Vec<ShareResponse>,
    pub pagination: shared::pagination::Pagination,
    pub summary: ShareSummary,
}

/// Summary counts for a project's shares.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ShareSummary {
    pub pending: i64,
    pub accepted: i64,
    pub declined: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_share(status: ShareStatus) -> ProjectShare {
        ProjectShare {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            user_id: None,
            email: "invitee@example.com".to_string(),
            role: ProjectRole::ReadOnly,
            status,
            invited_by: Some(Uuid::new_v4()),
            accepted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_transitions() {
        assert!(ShareStatus::Pending.can_accept());
        assert!(ShareStatus::Pending.can_decline());
        // Re-accepting is a no-op success, not an error
        assert!(ShareStatus::Accepted.can_accept());
        assert!(!ShareStatus::Accepted.can_decline());
        assert!(!ShareStatus::Declined.can_accept());
        assert!(!ShareStatus::Declined.can_decline());
    }

    #[test]
    fn test_only_accepted_share_is_effective() {
        assert!(!test_share(ShareStatus::Pending).is_effective());
        assert!(test_share(ShareStatus::Accepted).is_effective());
        assert!(!test_share(ShareStatus::Declined).is_effective());
    }

    #[test]
    fn test_can_be_accepted_by_case_insensitive() {
        let share = test_share(ShareStatus::Pending);
        assert!(share.can_be_accepted_by("INVITEE@example.com"));
        assert!(!share.can_be_accepted_by("other@example.com"));
    }

    #[test]
    fn test_create_share_request_validation() {
        let valid = CreateShareRequest {
            email: "collaborator@example.com".to_string(),
            role: "contributor".to_string(),
        };
        assert!(valid.validate().is_ok());
    }

    #[test]
    fn test_create_share_invalid_email() {
        let invalid = CreateShareRequest {
            email: "not-an-email".to_string(),
            role: "read_only".to_string(),
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_create_share_owner_role_rejected() {
        let invalid = CreateShareRequest {
            email: "collaborator@example.com".to_string(),
            role: "owner".to_string(),
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_list_shares_query_status_filter() {
        let query = ListSharesQuery {
            status: Some("accepted".to_string()),
            page: None,
            per_page: None,
        };
        assert_eq!(query.status_filter(), Some(ShareStatus::Accepted));

        let all = ListSharesQuery::default();
        assert_eq!(all.status_filter(), None);
    }

    #[test]
    fn test_share_status_serialization() {
        assert_eq!(
            serde_json::to_string(&ShareStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&ShareStatus::Accepted).unwrap(),
            "\"accepted\""
        );
        assert_eq!(
            serde_json::to_string(&ShareStatus::Declined).unwrap(),
            "\"declined\""
        );
    }
}
