//! Enrollment entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Enrollment;

/// Database row mapping for the enrollments table.
#[derive(Debug, Clone, FromRow)]
pub struct EnrollmentEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<EnrollmentEntity> for Enrollment {
    fn from(entity: EnrollmentEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            course_id: entity.course_id,
            created_at: entity.created_at,
        }
    }
}
