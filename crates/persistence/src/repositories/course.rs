//! Repository for course database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::CourseEntity;

/// Repository for course operations.
#[derive(Clone)]
pub struct CourseRepository {
    pool: PgPool,
}

impl CourseRepository {
    /// Creates a new course repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a new course under a project.
    pub async fn create(
        &self,
        project_id: Uuid,
        title: &str,
        description: Option<&str>,
    ) -> Result<CourseEntity, sqlx::Error> {
        sqlx::query_as::<_, CourseEntity>(
            r#"
            INSERT INTO courses (project_id, title, description)
            VALUES ($1, $2, $3)
            RETURNING id, project_id, title, description, is_active, created_at, updated_at
            "#,
        )
        .bind(project_id)
        .bind(title)
        .bind(description)
        .fetch_one(&self.pool)
        .await
    }

    /// Finds a course by ID.
    pub async fn find_by_id(&self, course_id: Uuid) -> Result<Option<CourseEntity>, sqlx::Error> {
        sqlx::query_as::<_, CourseEntity>(
            r#"
            SELECT id, project_id, title, description, is_active, created_at, updated_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Project owning the course, or None if the course does not exist.
    pub async fn project_of(&self, course_id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT project_id FROM courses WHERE id = $1
            "#,
        )
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(project_id,)| project_id))
    }

    /// Lists courses for a project.
    pub async fn list_by_project(
        &self,
        project_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CourseEntity>, sqlx::Error> {
        sqlx::query_as::<_, CourseEntity>(
            r#"
            SELECT id, project_id, title, description, is_active, created_at, updated_at
            FROM courses
            WHERE project_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(project_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    /// Counts courses for a project.
    pub async fn count_by_project(&self, project_id: Uuid) -> Result<i64, sqlx::Error> {
        let result: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM courses WHERE project_id = $1
            "#,
        )
        .bind(project_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    /// Updates course fields; unset fields keep their current value.
    pub async fn update(
        &self,
        course_id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<Option<CourseEntity>, sqlx::Error> {
        sqlx::query_as::<_, CourseEntity>(
            r#"
            UPDATE courses
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                is_active = COALESCE($4, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, project_id, title, description, is_active, created_at, updated_at
            "#,
        )
        .bind(course_id)
        .bind(title)
        .bind(description)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await
    }

    /// Deletes a course.
    ///
    /// Returns true if a course was deleted.
    pub async fn delete(&self, course_id: Uuid, project_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM courses
            WHERE id = $1 AND project_id = $2
            "#,
        )
        .bind(course_id)
        .bind(project_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
