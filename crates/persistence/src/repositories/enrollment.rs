//! Repository for enrollment database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::EnrollmentEntity;

/// Repository for enrollment operations.
#[derive(Clone)]
pub struct EnrollmentRepository {
    pool: PgPool,
}

impl EnrollmentRepository {
    /// Creates a new enrollment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets the enrollment for (user, course), creating it if missing.
    ///
    /// Enrollment is unique per user and course; concurrent callers converge
    /// on the same row.
    pub async fn get_or_create(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<EnrollmentEntity, sqlx::Error> {
        sqlx::query_as::<_, EnrollmentEntity>(
            r#"
            INSERT INTO enrollments (user_id, course_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, course_id) DO UPDATE
            SET user_id = EXCLUDED.user_id
            RETURNING id, user_id, course_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Finds the enrollment for (user, course).
    pub async fn find_by_user_and_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<EnrollmentEntity>, sqlx::Error> {
        sqlx::query_as::<_, EnrollmentEntity>(
            r#"
            SELECT id, user_id, course_id, created_at
            FROM enrollments
            WHERE user_id = $1 AND course_id = $2
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await
    }
}
