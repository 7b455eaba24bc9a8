//! Subscription entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Subscription;

/// Database row mapping for the subscriptions table.
///
/// Rows are append-only; renewals and refunds create new rows rather than
/// mutating existing ones.
#[derive(Debug, Clone, FromRow)]
pub struct SubscriptionEntity {
    pub id: Uuid,
    pub enrollment_id: Uuid,
    pub begins_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
}

impl From<SubscriptionEntity> for Subscription {
    fn from(entity: SubscriptionEntity) -> Self {
        Self {
            id: entity.id,
            enrollment_id: entity.enrollment_id,
            begins_at: entity.begins_at,
            ends_at: entity.ends_at,
            is_paid: entity.is_paid,
            created_at: entity.created_at,
        }
    }
}
