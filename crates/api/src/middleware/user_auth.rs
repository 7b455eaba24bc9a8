//! User JWT authentication middleware.
//!
//! Validates bearer tokens minted by the external identity provider and
//! stores the caller's identity in request extensions.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::app::AppState;
use crate::config::JwtAuthConfig;
use shared::jwt::JwtConfig;

/// Authenticated user information extracted from JWT.
///
/// The email claim rides along because the sharing flow matches invitations
/// against it.
#[derive(Debug, Clone)]
pub struct UserAuth {
    /// User ID from the JWT subject claim.
    pub user_id: Uuid,
    /// Account email from the email claim.
    pub email: String,
    /// JWT ID (jti) for session tracking.
    pub jti: String,
}

impl UserAuth {
    /// Validates an access token and returns user authentication info.
    pub fn validate(jwt_config: &JwtConfig, token: &str) -> Result<Self, String> {
        let claims = jwt_config
            .validate_token(token)
            .map_err(|e| format!("Invalid token: {}", e))?;

        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| "Invalid user ID in token".to_string())?;

        Ok(UserAuth {
            user_id,
            email: claims.email,
            jti: claims.jti,
        })
    }

    /// Creates a JwtConfig from JwtAuthConfig.
    ///
    /// Without a private key the config is validate-only, which is the
    /// normal production shape: the identity provider signs, we verify.
    pub fn create_jwt_config(config: &JwtAuthConfig) -> Result<JwtConfig, String> {
        let result = if config.private_key.is_empty() {
            JwtConfig::validate_only(
                &config.public_key,
                config.access_token_expiry_secs,
                config.leeway_secs,
            )
        } else {
            JwtConfig::with_leeway(
                &config.private_key,
                &config.public_key,
                config.access_token_expiry_secs,
                config.leeway_secs,
            )
        };
        result.map_err(|e| format!("Failed to initialize JWT config: {}", e))
    }
}

/// Middleware that requires JWT user authentication.
///
/// Rejects requests without a valid Bearer token. On success the [`UserAuth`]
/// is stored in request extensions for downstream handlers and the user's
/// profile row is upserted from the token claims.
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return unauthorized_response("Missing or invalid Authorization header");
        }
    };

    let jwt_config = match UserAuth::create_jwt_config(&state.config.jwt) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to create JWT config: {}", e);
            return internal_error_response("Authentication service unavailable");
        }
    };

    match UserAuth::validate(&jwt_config, token) {
        Ok(auth) => {
            // Lazily provision the profile row so foreign keys resolve
            let users = persistence::repositories::UserRepository::new(state.pool.clone());
            if let Err(e) = users.ensure_exists(auth.user_id, &auth.email).await {
                tracing::error!(user_id = %auth.user_id, error = %e, "Failed to upsert user profile");
                return internal_error_response("Failed to resolve user profile");
            }

            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!("JWT validation failed: {}", e);
            unauthorized_response("Invalid or expired token")
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

fn internal_error_response(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": message
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_response() {
        let response = unauthorized_response("Missing or invalid Authorization header");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_internal_error_response() {
        let response = internal_error_response("Authentication service unavailable");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_user_auth_clone() {
        let auth = UserAuth {
            user_id: Uuid::new_v4(),
            email: "creator@example.com".to_string(),
            jti: "test_jti".to_string(),
        };
        let cloned = auth.clone();
        assert_eq!(auth.user_id, cloned.user_id);
        assert_eq!(auth.email, cloned.email);
    }

    #[test]
    fn test_create_jwt_config_rejects_bad_keys() {
        let config = JwtAuthConfig {
            public_key: "not a pem".to_string(),
            private_key: "not a pem".to_string(),
            access_token_expiry_secs: 3600,
            leeway_secs: 30,
        };
        assert!(UserAuth::create_jwt_config(&config).is_err());
    }
}
