//! Enrollment and subscription routes.
//!
//! Any authenticated user can enroll in a course and record paid periods for
//! their own enrollment; conversation access is decided per request from
//! project role or current subscription state.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    CreateSubscriptionRequest, Enrollment, Subscription, SubscriptionStatusResponse,
};
use domain::services::{evaluate_status, select_current};
use persistence::repositories::{CourseRepository, EnrollmentRepository, SubscriptionRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_subscription_recorded;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ConversationAccessResponse {
    pub can_access: bool,
}

/// GET /api/v1/courses/:course_id/conversation-access
///
/// A single yes/no evaluated at request time; never cached, so revoking a
/// share or expiring a subscription takes effect immediately.
pub async fn conversation_access(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(course_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let can_access = state
        .resolver
        .can_access_conversations(auth.user_id, course_id, Utc::now())
        .await;

    Ok(Json(ConversationAccessResponse { can_access }))
}

/// POST /api/v1/courses/:course_id/enroll
///
/// Idempotent: re-enrolling returns the existing enrollment.
pub async fn enroll(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(course_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let courses = CourseRepository::new(state.pool.clone());
    if courses.find_by_id(course_id).await?.is_none() {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    let enrollments = EnrollmentRepository::new(state.pool.clone());
    let entity = enrollments.get_or_create(auth.user_id, course_id).await?;

    info!(
        user_id = %auth.user_id,
        course_id = %course_id,
        enrollment_id = %entity.id,
        "Enrolled in course"
    );

    Ok((StatusCode::CREATED, Json(Enrollment::from(entity))))
}

/// GET /api/v1/courses/:course_id/subscription
///
/// Evaluates the caller's subscription history for this course into a
/// status verdict plus the authoritative current record.
pub async fn subscription_status(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(course_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let courses = CourseRepository::new(state.pool.clone());
    if courses.find_by_id(course_id).await?.is_none() {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    let repo = SubscriptionRepository::new(state.pool.clone());
    let subscriptions: Vec<Subscription> = repo
        .list_for_user_course(auth.user_id, course_id)
        .await?
        .into_iter()
        .map(Subscription::from)
        .collect();

    let now = Utc::now();
    Ok(Json(SubscriptionStatusResponse {
        status: evaluate_status(&subscriptions, now),
        current: select_current(&subscriptions, now).cloned(),
    }))
}

/// POST /api/v1/courses/:course_id/subscriptions
///
/// Records a paid period for the caller's enrollment, creating the
/// enrollment if needed. History is append-only; renewals add rows.
pub async fn record_subscription(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(course_id): Path<Uuid>,
    Json(request): Json<CreateSubscriptionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;
    shared::validation::validate_period_window(request.begins_at, request.ends_at)
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let courses = CourseRepository::new(state.pool.clone());
    if courses.find_by_id(course_id).await?.is_none() {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    let enrollments = EnrollmentRepository::new(state.pool.clone());
    let enrollment = enrollments.get_or_create(auth.user_id, course_id).await?;

    let repo = SubscriptionRepository::new(state.pool.clone());
    let entity = repo
        .create(
            enrollment.id,
            request.begins_at,
            request.ends_at,
            request.is_paid,
        )
        .await?;

    record_subscription_recorded();
    info!(
        user_id = %auth.user_id,
        course_id = %course_id,
        subscription_id = %entity.id,
        is_paid = entity.is_paid,
        "Recorded subscription period"
    );

    Ok((StatusCode::CREATED, Json(Subscription::from(entity))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_conversation_access_response_serialization() {
        let json = serde_json::to_value(ConversationAccessResponse { can_access: true }).unwrap();
        assert_eq!(json, serde_json::json!({ "can_access": true }));
    }

    #[test]
    fn test_inverted_period_window_rejected() {
        let now = Utc::now();
        let result = shared::validation::validate_period_window(
            Some(now),
            Some(now - Duration::days(1)),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_open_period_window_accepted() {
        assert!(shared::validation::validate_period_window(Some(Utc::now()), None).is_ok());
    }
}
