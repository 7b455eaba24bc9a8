//! Project role model and the fixed capability matrix.
//!
//! This is the single canonical definition of roles; the resolver, the
//! capability sets, DTO validation, and the database enum mapping all use it.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Role a user holds on a project.
///
/// `Owner` is never produced by an invitation; it exists only through project
/// ownership. The other roles are granted through accepted shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectRole {
    Owner,
    Contributor,
    KnowledgeManager,
    ReadOnly,
}

/// Roles allowed to create and update course records.
pub const EDIT_COURSE_ROLES: &[ProjectRole] = &[ProjectRole::Owner, ProjectRole::Contributor];

/// Roles allowed to invite collaborators and list a project's shares.
pub const MANAGE_SHARE_ROLES: &[ProjectRole] = &[ProjectRole::Owner, ProjectRole::Contributor];

/// Roles allowed to view course records.
pub const VIEW_COURSE_ROLES: &[ProjectRole] = &[
    ProjectRole::Owner,
    ProjectRole::Contributor,
    ProjectRole::KnowledgeManager,
    ProjectRole::ReadOnly,
];

/// Roles whose project-level access grants course conversation history.
/// KnowledgeManager is included; customers without any project role go
/// through the subscription path instead.
pub const CONVERSATION_ROLES: &[ProjectRole] = &[
    ProjectRole::Owner,
    ProjectRole::Contributor,
    ProjectRole::KnowledgeManager,
    ProjectRole::ReadOnly,
];

impl ProjectRole {
    /// Whether this role may be granted through an invitation.
    pub fn is_invitable(&self) -> bool {
        !matches!(self, ProjectRole::Owner)
    }

    /// Whether the role grants course-edit rights.
    pub fn can_edit_courses(&self) -> bool {
        EDIT_COURSE_ROLES.contains(self)
    }

    /// Whether the role grants course-view rights.
    pub fn can_view_courses(&self) -> bool {
        VIEW_COURSE_ROLES.contains(self)
    }
}

impl FromStr for ProjectRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(ProjectRole::Owner),
            "contributor" => Ok(ProjectRole::Contributor),
            "knowledge_manager" => Ok(ProjectRole::KnowledgeManager),
            "read_only" => Ok(ProjectRole::ReadOnly),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl std::fmt::Display for ProjectRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectRole::Owner => write!(f, "owner"),
            ProjectRole::Contributor => write!(f, "contributor"),
            ProjectRole::KnowledgeManager => write!(f, "knowledge_manager"),
            ProjectRole::ReadOnly => write!(f, "read_only"),
        }
    }
}

/// Validate a role value supplied in an invitation request.
pub fn validate_invitable_role(role: &str) -> Result<(), validator::ValidationError> {
    match ProjectRole::from_str(role) {
        Ok(parsed) if parsed.is_invitable() => Ok(()),
        _ => {
            let mut err = validator::ValidationError::new("invalid_role");
            err.message =
                Some("Role must be 'contributor', 'knowledge_manager' or 'read_only'".into());
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [
            ProjectRole::Owner,
            ProjectRole::Contributor,
            ProjectRole::KnowledgeManager,
            ProjectRole::ReadOnly,
        ] {
            let parsed: ProjectRole = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_role_parse_case_insensitive() {
        assert_eq!(
            "Knowledge_Manager".parse::<ProjectRole>().unwrap(),
            ProjectRole::KnowledgeManager
        );
    }

    #[test]
    fn test_role_parse_unknown() {
        assert!("superadmin".parse::<ProjectRole>().is_err());
    }

    #[test]
    fn test_owner_is_not_invitable() {
        assert!(!ProjectRole::Owner.is_invitable());
        assert!(ProjectRole::Contributor.is_invitable());
        assert!(ProjectRole::KnowledgeManager.is_invitable());
        assert!(ProjectRole::ReadOnly.is_invitable());
    }

    #[test]
    fn test_edit_course_roles() {
        assert!(ProjectRole::Owner.can_edit_courses());
        assert!(ProjectRole::Contributor.can_edit_courses());
        assert!(!ProjectRole::KnowledgeManager.can_edit_courses());
        assert!(!ProjectRole::ReadOnly.can_edit_courses());
    }

    #[test]
    fn test_view_course_roles_include_everyone() {
        for role in [
            ProjectRole::Owner,
            ProjectRole::Contributor,
            ProjectRole::KnowledgeManager,
            ProjectRole::ReadOnly,
        ] {
            assert!(role.can_view_courses());
        }
    }

    #[test]
    fn test_conversation_roles_include_knowledge_manager() {
        assert!(CONVERSATION_ROLES.contains(&ProjectRole::KnowledgeManager));
    }

    #[test]
    fn test_validate_invitable_role() {
        assert!(validate_invitable_role("contributor").is_ok());
        assert!(validate_invitable_role("knowledge_manager").is_ok());
        assert!(validate_invitable_role("read_only").is_ok());
        assert!(validate_invitable_role("owner").is_err());
        assert!(validate_invitable_role("superadmin").is_err());
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(
            serde_json::to_string(&ProjectRole::KnowledgeManager).unwrap(),
            "\"knowledge_manager\""
        );
        let parsed: ProjectRole = serde_json::from_str("\"read_only\"").unwrap();
        assert_eq!(parsed, ProjectRole::ReadOnly);
    }
}
