//! Invitation validation for project sharing.

use thiserror::Error;

use crate::models::role::ProjectRole;
use shared::validation::{emails_match, validate_email};

#[derive(Debug, Error, PartialEq)]
pub enum ShareError {
    #[error("role '{0}' cannot be granted through a share")]
    InvalidRole(String),

    #[error("invalid invitee email address")]
    InvalidEmail,

    #[error("cannot share a project with yourself")]
    SelfInvite,
}

/// Validates an invitation before it reaches the share table.
///
/// Returns the parsed role on success. Owner is never invitable; ownership
/// only moves through project transfer.
pub fn validate_invitation(
    inviter_email: &str,
    invitee_email: &str,
    role: &str,
) -> Result<ProjectRole, ShareError> {
    let role: ProjectRole = role
        .parse()
        .map_err(|_| ShareError::InvalidRole(role.to_string()))?;
    if !role.is_invitable() {
        return Err(ShareError::InvalidRole(role.to_string()));
    }

    if validate_email(invitee_email).is_err() {
        return Err(ShareError::InvalidEmail);
    }

    if emails_match(inviter_email, invitee_email) {
        return Err(ShareError::SelfInvite);
    }

    Ok(role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_invitation() {
        let role = validate_invitation("owner@example.com", "collab@example.com", "contributor")
            .expect("invitation should validate");
        assert_eq!(role, ProjectRole::Contributor);
    }

    #[test]
    fn test_all_invitable_roles_accepted() {
        for role in ["contributor", "knowledge_manager", "read_only"] {
            assert!(validate_invitation("a@example.com", "b@example.com", role).is_ok());
        }
    }

    #[test]
    fn test_owner_role_rejected() {
        assert_eq!(
            validate_invitation("a@example.com", "b@example.com", "owner"),
            Err(ShareError::InvalidRole("owner".to_string()))
        );
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert_eq!(
            validate_invitation("a@example.com", "b@example.com", "admin"),
            Err(ShareError::InvalidRole("admin".to_string()))
        );
    }

    #[test]
    fn test_invalid_email_rejected() {
        assert_eq!(
            validate_invitation("a@example.com", "not-an-email", "contributor"),
            Err(ShareError::InvalidEmail)
        );
    }

    #[test]
    fn test_self_invite_rejected_case_insensitively() {
        assert_eq!(
            validate_invitation("Owner@Example.com", "owner@example.com", "read_only"),
            Err(ShareError::SelfInvite)
        );
    }
}
