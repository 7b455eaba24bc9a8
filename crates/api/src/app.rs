use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use domain::services::AccessResolver;
use persistence::store::PgAccessStore;

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_user_auth, security_headers_middleware, trace_id,
};
use crate::routes::{courses, enrollments, health, projects, shares, users};
use crate::services::EmailService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub email: EmailService,
    pub resolver: Arc<AccessResolver<PgAccessStore>>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);
    let email = EmailService::new(config.email.clone());
    let resolver = Arc::new(AccessResolver::new(PgAccessStore::new(pool.clone())));

    let state = AppState {
        pool,
        config: config.clone(),
        email,
        resolver,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Authenticated routes under /api/v1
    let protected_routes = Router::new()
        // Profile
        .route("/api/v1/me", get(users::get_profile))
        .route("/api/v1/me", patch(users::update_profile))
        // Projects
        .route("/api/v1/projects", post(projects::create_project))
        .route("/api/v1/projects", get(projects::list_projects))
        .route("/api/v1/projects/:project_id", get(projects::get_project))
        .route(
            "/api/v1/projects/:project_id",
            patch(projects::update_project),
        )
        .route(
            "/api/v1/projects/:project_id",
            delete(projects::delete_project),
        )
        // Shares
        .route(
            "/api/v1/projects/:project_id/shares",
            post(shares::create_share),
        )
        .route(
            "/api/v1/projects/:project_id/shares",
            get(shares::list_shares),
        )
        .route(
            "/api/v1/projects/:project_id/shares/:share_id",
            delete(shares::revoke_share),
        )
        .route("/api/v1/shares", get(shares::list_my_invitations))
        .route("/api/v1/shares/:share_id/accept", post(shares::accept_share))
        .route(
            "/api/v1/shares/:share_id/decline",
            post(shares::decline_share),
        )
        // Courses
        .route(
            "/api/v1/projects/:project_id/courses",
            post(courses::create_course),
        )
        .route(
            "/api/v1/projects/:project_id/courses",
            get(courses::list_courses),
        )
        .route("/api/v1/courses/:course_id", get(courses::get_course))
        .route("/api/v1/courses/:course_id", patch(courses::update_course))
        .route("/api/v1/courses/:course_id", delete(courses::delete_course))
        // Enrollment, subscriptions and conversation access
        .route(
            "/api/v1/courses/:course_id/conversation-access",
            get(enrollments::conversation_access),
        )
        .route("/api/v1/courses/:course_id/enroll", post(enrollments::enroll))
        .route(
            "/api/v1/courses/:course_id/subscription",
            get(enrollments::subscription_status),
        )
        .route(
            "/api/v1/courses/:course_id/subscriptions",
            post(enrollments::record_subscription),
        )
        // Auth runs first (outermost layer = runs first)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
