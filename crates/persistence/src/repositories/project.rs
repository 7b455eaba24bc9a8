//! Repository for project database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ProjectEntity;

/// Repository for project operations.
#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    /// Creates a new project repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a new project owned by the given user.
    pub async fn create(&self, name: &str, owner_id: Uuid) -> Result<ProjectEntity, sqlx::Error> {
        sqlx::query_as::<_, ProjectEntity>(
            r#"
            INSERT INTO projects (name, owner_id)
            VALUES ($1, $2)
            RETURNING id, name, owner_id, is_active, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Finds a project by ID.
    pub async fn find_by_id(
        &self,
        project_id: Uuid,
    ) -> Result<Option<ProjectEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProjectEntity>(
            r#"
            SELECT id, name, owner_id, is_active, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Owner of the project, or None if the project does not exist.
    pub async fn owner_of(&self, project_id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT owner_id FROM projects WHERE id = $1
            "#,
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(owner_id,)| owner_id))
    }

    /// Lists projects the user owns or holds an accepted share on.
    pub async fn list_accessible_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProjectEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProjectEntity>(
            r#"
            SELECT DISTINCT p.id, p.name, p.owner_id, p.is_active, p.created_at, p.updated_at
            FROM projects p
            LEFT JOIN project_shares s
                ON s.project_id = p.id AND s.user_id = $1 AND s.status = 'accepted'
            WHERE p.owner_id = $1 OR s.id IS NOT NULL
            ORDER BY p.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    /// Counts projects the user owns or holds an accepted share on.
    pub async fn count_accessible_by_user(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let result: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(DISTINCT p.id)
            FROM projects p
            LEFT JOIN project_shares s
                ON s.project_id = p.id AND s.user_id = $1 AND s.status = 'accepted'
            WHERE p.owner_id = $1 OR s.id IS NOT NULL
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    /// Updates project fields; unset fields keep their current value.
    pub async fn update(
        &self,
        project_id: Uuid,
        name: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<Option<ProjectEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProjectEntity>(
            r#"
            UPDATE projects
            SET name = COALESCE($2, name),
                is_active = COALESCE($3, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, owner_id, is_active, created_at, updated_at
            "#,
        )
        .bind(project_id)
        .bind(name)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await
    }

    /// Deletes a project.
    ///
    /// Returns true if a project was deleted. Shares, courses, enrollments
    /// and subscriptions go with it via ON DELETE CASCADE.
    pub async fn delete(&self, project_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM projects WHERE id = $1
            "#,
        )
        .bind(project_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
