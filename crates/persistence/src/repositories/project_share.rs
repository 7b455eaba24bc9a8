//! Repository for project share database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{ProjectRoleDb, ProjectShareEntity, ShareStatusDb};

const SHARE_COLUMNS: &str = "id, project_id, user_id, email, role, status, invited_by, \
                             accepted_at, created_at, updated_at";

/// Repository for project share operations.
#[derive(Clone)]
pub struct ProjectShareRepository {
    pool: PgPool,
}

impl ProjectShareRepository {
    /// Creates a new project share repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a pending invitation for an email address.
    ///
    /// `user_id` is the account already registered under that email, if any;
    /// unregistered invitees are stored with a null user id and bound on
    /// accept.
    pub async fn create(
        &self,
        project_id: Uuid,
        email: &str,
        user_id: Option<Uuid>,
        role: ProjectRoleDb,
        invited_by: Uuid,
    ) -> Result<ProjectShareEntity, sqlx::Error> {
        sqlx::query_as::<_, ProjectShareEntity>(&format!(
            r#"
            INSERT INTO project_shares (project_id, email, user_id, role, invited_by)
            VALUES ($1, LOWER($2), $3, $4, $5)
            RETURNING {SHARE_COLUMNS}
            "#,
        ))
        .bind(project_id)
        .bind(email)
        .bind(user_id)
        .bind(role)
        .bind(invited_by)
        .fetch_one(&self.pool)
        .await
    }

    /// Finds a share by ID.
    pub async fn find_by_id(
        &self,
        share_id: Uuid,
    ) -> Result<Option<ProjectShareEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProjectShareEntity>(&format!(
            r#"
            SELECT {SHARE_COLUMNS}
            FROM project_shares
            WHERE id = $1
            "#,
        ))
        .bind(share_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Finds a share by ID scoped to a project.
    pub async fn find_by_id_and_project(
        &self,
        share_id: Uuid,
        project_id: Uuid,
    ) -> Result<Option<ProjectShareEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProjectShareEntity>(&format!(
            r#"
            SELECT {SHARE_COLUMNS}
            FROM project_shares
            WHERE id = $1 AND project_id = $2
            "#,
        ))
        .bind(share_id)
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Finds the most recent share for an email on a project.
    pub async fn find_by_project_and_email(
        &self,
        project_id: Uuid,
        email: &str,
    ) -> Result<Option<ProjectShareEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProjectShareEntity>(&format!(
            r#"
            SELECT {SHARE_COLUMNS}
            FROM project_shares
            WHERE project_id = $1 AND LOWER(email) = LOWER($2)
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        ))
        .bind(project_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    /// Role from any accepted share for (project, user).
    ///
    /// Duplicate accepted rows are tolerated; the most recent one wins, and
    /// since all duplicates grant access any of them would do.
    pub async fn accepted_role(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ProjectRoleDb>, sqlx::Error> {
        let row: Option<(ProjectRoleDb,)> = sqlx::query_as(
            r#"
            SELECT role
            FROM project_shares
            WHERE project_id = $1 AND user_id = $2 AND status = 'accepted'
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(role,)| role))
    }

    /// Lists shares for a project, optionally filtered by status.
    pub async fn list_by_project(
        &self,
        project_id: Uuid,
        status: Option<ShareStatusDb>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProjectShareEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProjectShareEntity>(&format!(
            r#"
            SELECT {SHARE_COLUMNS}
            FROM project_shares
            WHERE project_id = $1 AND ($2::share_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        ))
        .bind(project_id)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    /// Counts shares for a project, optionally filtered by status.
    pub async fn count_by_project(
        &self,
        project_id: Uuid,
        status: Option<ShareStatusDb>,
    ) -> Result<i64, sqlx::Error> {
        let result: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM project_shares
            WHERE project_id = $1 AND ($2::share_status IS NULL OR status = $2)
            "#,
        )
        .bind(project_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    /// Lists pending invitations addressed to an email.
    pub async fn list_pending_for_email(
        &self,
        email: &str,
    ) -> Result<Vec<ProjectShareEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProjectShareEntity>(&format!(
            r#"
            SELECT {SHARE_COLUMNS}
            FROM project_shares
            WHERE LOWER(email) = LOWER($1) AND status = 'pending'
            ORDER BY created_at DESC
            "#,
        ))
        .bind(email)
        .fetch_all(&self.pool)
        .await
    }

    /// Re-issues an existing invitation with a new role.
    ///
    /// Resets the share to pending regardless of its current status and
    /// clears any previous acceptance, so role changes for accepted
    /// collaborators take effect only once they re-accept.
    pub async fn reissue(
        &self,
        share_id: Uuid,
        user_id: Option<Uuid>,
        role: ProjectRoleDb,
        invited_by: Uuid,
    ) -> Result<Option<ProjectShareEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProjectShareEntity>(&format!(
            r#"
            UPDATE project_shares
            SET role = $3, status = 'pending', invited_by = $4,
                user_id = $2, accepted_at = NULL, updated_at = NOW()
            WHERE id = $1
            RETURNING {SHARE_COLUMNS}
            "#,
        ))
        .bind(share_id)
        .bind(user_id)
        .bind(role)
        .bind(invited_by)
        .fetch_optional(&self.pool)
        .await
    }

    /// Marks a share as accepted and binds it to the accepting user.
    ///
    /// Idempotent: re-accepting an accepted share succeeds and keeps the
    /// original acceptance timestamp. Returns the updated row, or None if
    /// the share was declined or missing.
    pub async fn accept(
        &self,
        share_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ProjectShareEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProjectShareEntity>(&format!(
            r#"
            UPDATE project_shares
            SET status = 'accepted',
                user_id = $2,
                accepted_at = COALESCE(accepted_at, NOW()),
                updated_at = NOW()
            WHERE id = $1 AND status IN ('pending', 'accepted')
            RETURNING {SHARE_COLUMNS}
            "#,
        ))
        .bind(share_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Marks a pending share as declined.
    ///
    /// Returns true if the share was declined, false if it was not pending.
    pub async fn decline(&self, share_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE project_shares
            SET status = 'declined', updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(share_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Revokes a share by deleting it.
    ///
    /// Returns true if a share was deleted. Access loss is immediate since
    /// every resolution re-reads the share table.
    pub async fn delete(&self, share_id: Uuid, project_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM project_shares
            WHERE id = $1 AND project_id = $2
            "#,
        )
        .bind(share_id)
        .bind(project_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Gets share summary counts for a project.
    pub async fn summary_counts(
        &self,
        project_id: Uuid,
    ) -> Result<ShareSummaryCounts, sqlx::Error> {
        let result: (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'pending') as pending,
                COUNT(*) FILTER (WHERE status = 'accepted') as accepted,
                COUNT(*) FILTER (WHERE status = 'declined') as declined
            FROM project_shares
            WHERE project_id = $1
            "#,
        )
        .bind(project_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(ShareSummaryCounts {
            pending: result.0,
            accepted: result.1,
            declined: result.2,
        })
    }
}

/// Summary counts for shares.
#[derive(Debug, Clone)]
pub struct ShareSummaryCounts {
    pub pending: i64,
    pub accepted: i64,
    pub declined: i64,
}
