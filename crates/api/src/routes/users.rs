//! Current-user profile routes.
//!
//! Profiles are provisioned lazily by the auth middleware; these routes only
//! read and update the row for the authenticated account.

use axum::{extract::State, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use persistence::repositories::UserRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateProfileRequest {
    /// New display name; null clears it.
    #[validate(length(max = 100, message = "Display name must be at most 100 characters"))]
    pub display_name: Option<String>,
}

/// GET /api/v1/me
pub async fn get_profile(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<impl IntoResponse, ApiError> {
    let users = UserRepository::new(state.pool.clone());
    let user = users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ProfileResponse {
        id: user.id,
        email: user.email,
        display_name: user.display_name,
        created_at: user.created_at,
    }))
}

/// PATCH /api/v1/me
pub async fn update_profile(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let users = UserRepository::new(state.pool.clone());
    if !users
        .update_display_name(auth.user_id, request.display_name.as_deref())
        .await?
    {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let user = users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    info!(user_id = %auth.user_id, "Updated profile");

    Ok(Json(ProfileResponse {
        id: user.id,
        email: user.email,
        display_name: user.display_name,
        created_at: user.created_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_profile_request_validation() {
        let valid = UpdateProfileRequest {
            display_name: Some("Ada".to_string()),
        };
        assert!(valid.validate().is_ok());

        let overlong = UpdateProfileRequest {
            display_name: Some("n".repeat(101)),
        };
        assert!(overlong.validate().is_err());
    }

    #[test]
    fn test_profile_response_omits_missing_display_name() {
        let json = serde_json::to_value(ProfileResponse {
            id: Uuid::new_v4(),
            email: "creator@example.com".to_string(),
            display_name: None,
            created_at: Utc::now(),
        })
        .unwrap();
        assert!(json.get("display_name").is_none());
    }
}
