//! Project share entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{ProjectRole, ProjectShare, ShareStatus};

/// Database enum for project_role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "project_role", rename_all = "snake_case")]
pub enum ProjectRoleDb {
    Owner,
    Contributor,
    KnowledgeManager,
    ReadOnly,
}

impl From<ProjectRoleDb> for ProjectRole {
    fn from(db: ProjectRoleDb) -> Self {
        match db {
            ProjectRoleDb::Owner => Self::Owner,
            ProjectRoleDb::Contributor => Self::Contributor,
            ProjectRoleDb::KnowledgeManager => Self::KnowledgeManager,
            ProjectRoleDb::ReadOnly => Self::ReadOnly,
        }
    }
}

impl From<ProjectRole> for ProjectRoleDb {
    fn from(role: ProjectRole) -> Self {
        match role {
            ProjectRole::Owner => Self::Owner,
            ProjectRole::Contributor => Self::Contributor,
            ProjectRole::KnowledgeManager => Self::KnowledgeManager,
            ProjectRole::ReadOnly => Self::ReadOnly,
        }
    }
}

/// Database enum for share_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "share_status", rename_all = "lowercase")]
pub enum ShareStatusDb {
    Pending,
    Accepted,
    Declined,
}

impl From<ShareStatusDb> for ShareStatus {
    fn from(db: ShareStatusDb) -> Self {
        match db {
            ShareStatusDb::Pending => Self::Pending,
            ShareStatusDb::Accepted => Self::Accepted,
            ShareStatusDb::Declined => Self::Declined,
        }
    }
}

impl From<ShareStatus> for ShareStatusDb {
    fn from(status: ShareStatus) -> Self {
        match status {
            ShareStatus::Pending => Self::Pending,
            ShareStatus::Accepted => Self::Accepted,
            ShareStatus::Declined => Self::Declined,
        }
    }
}

/// Database row mapping for the project_shares table.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectShareEntity {
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: Option<Uuid>,
    pub email: String,
    pub role: ProjectRoleDb,
    pub status: ShareStatusDb,
    pub invited_by: Option<Uuid>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProjectShareEntity> for ProjectShare {
    fn from(entity: ProjectShareEntity) -> Self {
        Self {
            id: entity.id,
            project_id: entity.project_id,
            user_id: entity.user_id,
            email: entity.email,
            role: entity.role.into(),
            status: entity.status.into(),
            invited_by: entity.invited_by,
            accepted_at: entity.accepted_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_db_enum() {
        for role in [
            ProjectRole::Owner,
            ProjectRole::Contributor,
            ProjectRole::KnowledgeManager,
            ProjectRole::ReadOnly,
        ] {
            let db: ProjectRoleDb = role.into();
            assert_eq!(ProjectRole::from(db), role);
        }
    }

    #[test]
    fn test_status_round_trips_through_db_enum() {
        for status in [
            ShareStatus::Pending,
            ShareStatus::Accepted,
            ShareStatus::Declined,
        ] {
            let db: ShareStatusDb = status.into();
            assert_eq!(ShareStatus::from(db), status);
        }
    }
}
