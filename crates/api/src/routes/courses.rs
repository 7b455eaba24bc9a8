//! Course routes.
//!
//! Courses live inside a project; course-scoped routes first resolve the
//! owning project, then check the caller's role on that project.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::role::{EDIT_COURSE_ROLES, VIEW_COURSE_ROLES};
use domain::models::{Course, CreateCourseRequest, UpdateCourseRequest};
use persistence::repositories::CourseRepository;
use shared::pagination::{PageParams, Pagination};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

#[derive(Debug, Deserialize)]
pub struct ListCoursesQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListCoursesResponse {
    pub courses: Vec<Course>,
    pub pagination: Pagination,
}

/// POST /api/v1/projects/:project_id/courses
pub async fn create_course(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(project_id): Path<Uuid>,
    Json(request): Json<CreateCourseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    if !state
        .resolver
        .has_capability(auth.user_id, project_id, EDIT_COURSE_ROLES)
        .await
    {
        return Err(require_view_or_hide(&state, &auth, project_id).await);
    }

    let courses = CourseRepository::new(state.pool.clone());
    let entity = courses
        .create(project_id, &request.title, request.description.as_deref())
        .await?;

    info!(
        user_id = %auth.user_id,
        project_id = %project_id,
        course_id = %entity.id,
        "Created course"
    );

    Ok((StatusCode::CREATED, Json(Course::from(entity))))
}

/// GET /api/v1/projects/:project_id/courses
pub async fn list_courses(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(project_id): Path<Uuid>,
    Query(query): Query<ListCoursesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if !state
        .resolver
        .has_capability(auth.user_id, project_id, VIEW_COURSE_ROLES)
        .await
    {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    let params = PageParams {
        page: query.page,
        per_page: query.per_page,
    };

    let courses = CourseRepository::new(state.pool.clone());
    let entities = courses
        .list_by_project(project_id, params.per_page(), params.offset())
        .await?;
    let total = courses.count_by_project(project_id).await?;

    Ok(Json(ListCoursesResponse {
        courses: entities.into_iter().map(Course::from).collect(),
        pagination: Pagination::new(params.page(), params.per_page(), total),
    }))
}

/// GET /api/v1/courses/:course_id
pub async fn get_course(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(course_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let courses = CourseRepository::new(state.pool.clone());
    let entity = courses
        .find_by_id(course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    if !state
        .resolver
        .has_capability(auth.user_id, entity.project_id, VIEW_COURSE_ROLES)
        .await
    {
        // Hide existence from users with no project relationship
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    Ok(Json(Course::from(entity)))
}

/// PATCH /api/v1/courses/:course_id
pub async fn update_course(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(course_id): Path<Uuid>,
    Json(request): Json<UpdateCourseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let courses = CourseRepository::new(state.pool.clone());
    let project_id = courses
        .project_of(course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    if !state
        .resolver
        .has_capability(auth.user_id, project_id, EDIT_COURSE_ROLES)
        .await
    {
        return Err(require_view_or_hide(&state, &auth, project_id).await);
    }

    let entity = courses
        .update(
            course_id,
            request.title.as_deref(),
            request.description.as_deref(),
            request.is_active,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    info!(user_id = %auth.user_id, course_id = %course_id, "Updated course");

    Ok(Json(Course::from(entity)))
}

/// DELETE /api/v1/courses/:course_id
pub async fn delete_course(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(course_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let courses = CourseRepository::new(state.pool.clone());
    let project_id = courses
        .project_of(course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    if !state
        .resolver
        .has_capability(auth.user_id, project_id, EDIT_COURSE_ROLES)
        .await
    {
        return Err(require_view_or_hide(&state, &auth, project_id).await);
    }

    if !courses.delete(course_id, project_id).await? {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    info!(user_id = %auth.user_id, course_id = %course_id, "Deleted course");

    Ok(StatusCode::NO_CONTENT)
}

/// Picks the failure for a caller without edit capability: 403 when they can
/// at least see the project, 404 when they have no relationship to it.
async fn require_view_or_hide(state: &AppState, auth: &UserAuth, project_id: Uuid) -> ApiError {
    if state
        .resolver
        .has_capability(auth.user_id, project_id, VIEW_COURSE_ROLES)
        .await
    {
        ApiError::Forbidden("You may not edit courses in this project".to_string())
    } else {
        ApiError::NotFound("Project not found".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_courses_query_pagination_clamps() {
        let params = PageParams {
            page: Some(0),
            per_page: Some(500),
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), 100);
    }

    #[test]
    fn test_update_course_request_accepts_partial_payload() {
        let request = UpdateCourseRequest {
            title: None,
            description: None,
            is_active: Some(false),
        };
        assert!(request.validate().is_ok());
    }
}
