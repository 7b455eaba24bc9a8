//! Enrollment domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's record of joining a course.
///
/// One row per (user, course) pairing ever attempted; not itself proof of
/// payment. Paid access is determined by the enrollment's subscriptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub created_at: DateTime<Utc>,
}
