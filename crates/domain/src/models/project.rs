//! Project domain models.
//!
//! A project is a creator's top-level container for courses and knowledge.
//! Ownership is fixed at creation and never transferred through sharing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A creator's project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a new project.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,
}

/// Request to update a project (owner only).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: Option<String>,

    pub is_active: Option<bool>,
}

/// Project response, annotated with the caller's effective role.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ProjectResponse {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub is_active: bool,
    pub role: super::ProjectRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectResponse {
    pub fn from_project(project: Project, role: super::ProjectRole) -> Self {
        Self {
            id: project.id,
            name: project.name,
            owner_id: project.owner_id,
            is_active: project.is_active,
            role,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectRole;

    #[test]
    fn test_create_project_request_validation() {
        let valid = CreateProjectRequest {
            name: "Launch Course Studio".to_string(),
        };
        assert!(valid.validate().is_ok());
    }

    #[test]
    fn test_create_project_empty_name() {
        let invalid = CreateProjectRequest {
            name: String::new(),
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_create_project_overlong_name() {
        let invalid = CreateProjectRequest {
            name: "x".repeat(201),
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_update_project_partial() {
        let update = UpdateProjectRequest {
            name: None,
            is_active: Some(false),
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_project_response_carries_role() {
        let project = Project {
            id: Uuid::new_v4(),
            name: "Studio".to_string(),
            owner_id: Uuid::new_v4(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let response = ProjectResponse::from_project(project.clone(), ProjectRole::Owner);
        assert_eq!(response.id, project.id);
        assert_eq!(response.role, ProjectRole::Owner);
    }
}
