//! Subscription (paid period) domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A paid time window attached to an enrollment.
///
/// Renewals append new rows; rows are never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub enrollment_id: Uuid,
    /// Start of the paid window. Null sorts as earliest when selecting the
    /// current record.
    pub begins_at: Option<DateTime<Utc>>,
    /// End of the paid window; null means unbounded.
    pub ends_at: Option<DateTime<Utc>>,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// Whether this subscription is active at the given instant.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.is_paid && self.ends_at.map_or(true, |end| end > now)
    }
}

/// Request to record a paid period (purchase/renewal callback surface).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateSubscriptionRequest {
    pub begins_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub is_paid: bool,
}

/// Current status of an enrollment's subscription history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Expired,
    None,
}

/// Evaluator verdict returned to subscription-status callers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SubscriptionStatusResponse {
    pub status: SubscriptionStatus,
    /// The authoritative current record, when any subscription exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<Subscription>,
}
