//! Repository for subscription database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::SubscriptionEntity;

/// Repository for subscription operations.
#[derive(Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    /// Creates a new subscription repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records a subscription period against an enrollment.
    ///
    /// The table is append-only; renewals create new rows.
    pub async fn create(
        &self,
        enrollment_id: Uuid,
        begins_at: Option<DateTime<Utc>>,
        ends_at: Option<DateTime<Utc>>,
        is_paid: bool,
    ) -> Result<SubscriptionEntity, sqlx::Error> {
        sqlx::query_as::<_, SubscriptionEntity>(
            r#"
            INSERT INTO subscriptions (enrollment_id, begins_at, ends_at, is_paid)
            VALUES ($1, $2, $3, $4)
            RETURNING id, enrollment_id, begins_at, ends_at, is_paid, created_at
            "#,
        )
        .bind(enrollment_id)
        .bind(begins_at)
        .bind(ends_at)
        .bind(is_paid)
        .fetch_one(&self.pool)
        .await
    }

    /// All subscription rows for the user's enrollment in a course.
    ///
    /// Ordered by creation time so the lifecycle evaluator's tie-break is
    /// deterministic.
    pub async fn list_for_user_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Vec<SubscriptionEntity>, sqlx::Error> {
        sqlx::query_as::<_, SubscriptionEntity>(
            r#"
            SELECT s.id, s.enrollment_id, s.begins_at, s.ends_at, s.is_paid, s.created_at
            FROM subscriptions s
            JOIN enrollments e ON e.id = s.enrollment_id
            WHERE e.user_id = $1 AND e.course_id = $2
            ORDER BY s.created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_all(&self.pool)
        .await
    }
}
