//! Project share (invitation) routes.
//!
//! Covers the full share lifecycle: invite, list, accept, decline, revoke.
//! Invitations are keyed by email; the invited account is bound on accept.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use domain::models::role::MANAGE_SHARE_ROLES;
use domain::models::{
    CreateShareRequest, ListSharesQuery, ListSharesResponse, ProjectShare, ShareResponse,
    ShareStatus, ShareSummary,
};
use domain::services::validate_invitation;
use persistence::repositories::{ProjectRepository, ProjectShareRepository, UserRepository};
use shared::pagination::Pagination;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::{record_share_accepted, record_share_created};
use crate::routes::projects::require_owner;

/// POST /api/v1/projects/:project_id/shares
///
/// Invite a collaborator by email. Owner or contributor only. Re-inviting an
/// email that already has a share re-issues the invitation with the new role
/// and resets it to pending, so a role change takes effect on re-accept.
pub async fn create_share(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(project_id): Path<Uuid>,
    Json(request): Json<CreateShareRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;
    require_share_manager(&state, &auth, project_id).await?;

    let role = validate_invitation(&auth.email, &request.email, &request.role)?;

    let projects = ProjectRepository::new(state.pool.clone());
    let project = projects
        .find_by_id(project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    // Bind the invitee's account up front when the email is already
    // registered; unregistered invitees are bound on accept.
    let users = UserRepository::new(state.pool.clone());
    let invitee_id = users.find_by_email(&request.email).await?.map(|u| u.id);

    let shares = ProjectShareRepository::new(state.pool.clone());
    let entity = match shares
        .find_by_project_and_email(project_id, &request.email)
        .await?
    {
        Some(existing) => shares
            .reissue(existing.id, invitee_id, role.into(), auth.user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Share not found".to_string()))?,
        None => {
            shares
                .create(project_id, &request.email, invitee_id, role.into(), auth.user_id)
                .await?
        }
    };

    record_share_created();
    info!(
        user_id = %auth.user_id,
        project_id = %project_id,
        share_id = %entity.id,
        role = %role,
        "Created share invitation"
    );

    // Notify off the request path; a failed email never fails the share
    let email = state.email.clone();
    let invitee = request.email.clone();
    let project_name = project.name.clone();
    let accept_url = format!(
        "{}/invitations/{}",
        state.config.server.app_base_url, entity.id
    );
    tokio::spawn(async move {
        if let Err(e) = email
            .send_invitation_email(&invitee, &project_name, &role.to_string(), &accept_url)
            .await
        {
            warn!(to = %invitee, error = %e, "Failed to send invitation email");
        }
    });

    let share: ProjectShare = entity.into();
    Ok((StatusCode::CREATED, Json(ShareResponse::from(share))))
}

/// GET /api/v1/projects/:project_id/shares
///
/// List a project's shares with status filter, pagination, and summary
/// counts. Owner or contributor only.
pub async fn list_shares(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(project_id): Path<Uuid>,
    Query(query): Query<ListSharesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require_share_manager(&state, &auth, project_id).await?;

    let shares = ProjectShareRepository::new(state.pool.clone());
    let params = query.page_params();
    let status = query.status_filter().map(Into::into);

    let entities = shares
        .list_by_project(project_id, status, params.per_page(), params.offset())
        .await?;
    let total = shares.count_by_project(project_id, status).await?;
    let counts = shares.summary_counts(project_id).await?;

    let shares: Vec<ShareResponse> = entities
        .into_iter()
        .map(|entity| ShareResponse::from(ProjectShare::from(entity)))
        .collect();

    Ok(Json(ListSharesResponse {
        shares,
        pagination: Pagination::new(params.page(), params.per_page(), total),
        summary: ShareSummary {
            pending: counts.pending,
            accepted: counts.accepted,
            declined: counts.declined,
        },
    }))
}

/// GET /api/v1/shares
///
/// List pending invitations addressed to the caller's email.
pub async fn list_my_invitations(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<impl IntoResponse, ApiError> {
    let shares = ProjectShareRepository::new(state.pool.clone());
    let entities = shares.list_pending_for_email(&auth.email).await?;

    let invitations: Vec<ShareResponse> = entities
        .into_iter()
        .map(|entity| ShareResponse::from(ProjectShare::from(entity)))
        .collect();

    Ok(Json(serde_json::json!({ "shares": invitations })))
}

/// POST /api/v1/shares/:share_id/accept
///
/// Accept an invitation. Only the account whose email matches the invitation
/// may accept; matching is case-insensitive. Accepting twice is an idempotent
/// success.
pub async fn accept_share(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(share_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let shares = ProjectShareRepository::new(state.pool.clone());
    let entity = shares
        .find_by_id(share_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))?;

    let share: ProjectShare = entity.into();
    if !share.can_be_accepted_by(&auth.email) {
        return Err(ApiError::Forbidden(
            "This invitation was issued to a different email address".to_string(),
        ));
    }

    if !share.status.can_accept() {
        return Err(ApiError::Conflict(
            "This invitation has been declined".to_string(),
        ));
    }

    let already_accepted = share.status == ShareStatus::Accepted;
    let updated = shares
        .accept(share_id, auth.user_id)
        .await?
        .ok_or_else(|| {
            // Lost a race with a decline or revoke between read and update
            ApiError::Conflict("This invitation is no longer open".to_string())
        })?;

    if !already_accepted {
        record_share_accepted();
    }
    info!(
        user_id = %auth.user_id,
        share_id = %share_id,
        project_id = %updated.project_id,
        "Accepted share invitation"
    );

    Ok(Json(ShareResponse::from(ProjectShare::from(updated))))
}

/// POST /api/v1/shares/:share_id/decline
///
/// Decline a pending invitation. Declining is terminal unless the owner
/// revokes and re-invites.
pub async fn decline_share(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(share_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let shares = ProjectShareRepository::new(state.pool.clone());
    let entity = shares
        .find_by_id(share_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))?;

    let share: ProjectShare = entity.into();
    if !share.can_be_accepted_by(&auth.email) {
        return Err(ApiError::Forbidden(
            "This invitation was issued to a different email address".to_string(),
        ));
    }

    if !shares.decline(share_id).await? {
        return Err(ApiError::Conflict(
            "Only a pending invitation can be declined".to_string(),
        ));
    }

    info!(
        user_id = %auth.user_id,
        share_id = %share_id,
        "Declined share invitation"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/projects/:project_id/shares/:share_id
///
/// Revoke a share. Owner only; works in any share state, and access loss is
/// immediate because every check re-reads current state.
pub async fn revoke_share(
    State(state): State<AppState>,
    auth: UserAuth,
    Path((project_id, share_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    require_owner(&state, auth.user_id, project_id).await?;

    if !ProjectShareRepository::new(state.pool.clone())
        .delete(share_id, project_id)
        .await?
    {
        return Err(ApiError::NotFound("Share not found".to_string()));
    }

    info!(
        user_id = %auth.user_id,
        project_id = %project_id,
        share_id = %share_id,
        "Revoked share"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Rejects callers who may not manage the project's shares.
async fn require_share_manager(
    state: &AppState,
    auth: &UserAuth,
    project_id: Uuid,
) -> Result<(), ApiError> {
    match state.resolver.resolve_role(auth.user_id, project_id).await {
        Some(role) if MANAGE_SHARE_ROLES.contains(&role) => Ok(()),
        Some(_) => Err(ApiError::Forbidden(
            "You may not manage shares on this project".to_string(),
        )),
        None => Err(ApiError::NotFound("Project not found".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_share_request_validation() {
        let valid = CreateShareRequest {
            email: "collab@example.com".to_string(),
            role: "knowledge_manager".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_role = CreateShareRequest {
            email: "collab@example.com".to_string(),
            role: "owner".to_string(),
        };
        assert!(bad_role.validate().is_err());
    }

    #[test]
    fn test_list_shares_query_defaults() {
        let query = ListSharesQuery::default();
        assert_eq!(query.status_filter(), None);
        assert_eq!(query.page_params().page(), 1);
        assert_eq!(query.page_params().per_page(), 50);
    }
}
