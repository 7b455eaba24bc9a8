//! Project routes.
//!
//! Projects are the top-level containers. The caller becomes owner at
//! creation; all other access arrives through shares.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    CreateProjectRequest, Project, ProjectResponse, ProjectRole, UpdateProjectRequest,
};
use persistence::repositories::ProjectRepository;
use shared::pagination::{PageParams, Pagination};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Response for listing projects.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListProjectsResponse {
    pub projects: Vec<ProjectResponse>,
    pub pagination: Pagination,
}

/// POST /api/v1/projects
///
/// Create a new project owned by the caller.
pub async fn create_project(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<CreateProjectRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let repo = ProjectRepository::new(state.pool.clone());
    let entity = repo.create(&request.name, auth.user_id).await?;

    info!(
        user_id = %auth.user_id,
        project_id = %entity.id,
        "Created project"
    );

    let project: Project = entity.into();
    Ok((
        StatusCode::CREATED,
        Json(ProjectResponse::from_project(project, ProjectRole::Owner)),
    ))
}

/// GET /api/v1/projects
///
/// List projects the caller owns or holds an accepted share on, with the
/// caller's effective role on each.
pub async fn list_projects(
    State(state): State<AppState>,
    auth: UserAuth,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ProjectRepository::new(state.pool.clone());

    let entities = repo
        .list_accessible_by_user(auth.user_id, params.per_page(), params.offset())
        .await?;
    let total = repo.count_accessible_by_user(auth.user_id).await?;

    let mut projects = Vec::with_capacity(entities.len());
    for entity in entities {
        let project: Project = entity.into();
        let role = if project.owner_id == auth.user_id {
            ProjectRole::Owner
        } else {
            state
                .resolver
                .resolve_role(auth.user_id, project.id)
                .await
                .ok_or_else(|| ApiError::Internal("Listed project without a role".to_string()))?
        };
        projects.push(ProjectResponse::from_project(project, role));
    }

    Ok(Json(ListProjectsResponse {
        projects,
        pagination: Pagination::new(params.page(), params.per_page(), total),
    }))
}

/// GET /api/v1/projects/:project_id
///
/// Get a project. Any project role suffices.
pub async fn get_project(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let role = state
        .resolver
        .resolve_role(auth.user_id, project_id)
        .await
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let repo = ProjectRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(ProjectResponse::from_project(entity.into(), role)))
}

/// PATCH /api/v1/projects/:project_id
///
/// Update project name or active flag. Owner only.
pub async fn update_project(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(project_id): Path<Uuid>,
    Json(request): Json<UpdateProjectRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;
    require_owner(&state, auth.user_id, project_id).await?;

    let repo = ProjectRepository::new(state.pool.clone());
    let entity = repo
        .update(project_id, request.name.as_deref(), request.is_active)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    info!(
        user_id = %auth.user_id,
        project_id = %project_id,
        "Updated project"
    );

    Ok(Json(ProjectResponse::from_project(
        entity.into(),
        ProjectRole::Owner,
    )))
}

/// DELETE /api/v1/projects/:project_id
///
/// Delete a project and everything under it. Owner only.
pub async fn delete_project(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_owner(&state, auth.user_id, project_id).await?;

    let repo = ProjectRepository::new(state.pool.clone());
    if !repo.delete(project_id).await? {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    info!(
        user_id = %auth.user_id,
        project_id = %project_id,
        "Deleted project"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Rejects callers who are not the project owner.
///
/// Distinguishes "project missing" (404) from "not yours" (403).
pub(crate) async fn require_owner(
    state: &AppState,
    user_id: Uuid,
    project_id: Uuid,
) -> Result<(), ApiError> {
    match state.resolver.resolve_role(user_id, project_id).await {
        Some(ProjectRole::Owner) => Ok(()),
        Some(_) => Err(ApiError::Forbidden(
            "Only the project owner may do this".to_string(),
        )),
        None => Err(ApiError::NotFound("Project not found".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_project_request_rejects_empty_name() {
        let request = CreateProjectRequest {
            name: String::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_list_response_serialization() {
        let response = ListProjectsResponse {
            projects: vec![],
            pagination: Pagination::new(1, 50, 0),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["pagination"]["total"], 0);
        assert!(json["projects"].as_array().unwrap().is_empty());
    }
}
