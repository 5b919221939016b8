use axum::{
    error_handling::HandleErrorLayer,
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::error::ApiError;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_admin, require_member, trace_id,
};
use crate::routes::{content, events, health, notifications, profiles, stars};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
}

/// Convert errors surfaced by the timeout layer into the JSON error body.
///
/// Timeout expiry is advisory: the client gets a retryable 408, in-flight
/// storage writes are not assumed rolled back.
async fn handle_middleware_error(err: tower::BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        ApiError::Timeout
    } else {
        ApiError::Internal(format!("Middleware failure: {}", err))
    }
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
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

    // Member routes (identity headers stamped by the upstream gateway)
    let member_routes = Router::new()
        .route("/api/v1/content/:kind", post(content::create_content))
        .route(
            "/api/v1/content/:kind/:item_id",
            get(content::get_content).delete(content::delete_content),
        )
        .route(
            "/api/v1/content/:kind/:item_id/star",
            post(stars::toggle_star),
        )
        .route(
            "/api/v1/notifications/active",
            get(notifications::active_notifications),
        )
        .route("/api/v1/profiles/me", get(profiles::get_own_profile))
        .route("/api/v1/profiles/:user_id", get(profiles::get_profile))
        .route_layer(middleware::from_fn(require_member));

    // Admin routes (require the admin role)
    let admin_routes = Router::new()
        .route(
            "/api/v1/admin/events",
            post(events::create_event).get(events::list_events),
        )
        .route(
            "/api/v1/admin/events/:event_id",
            get(events::get_event)
                .patch(events::update_event)
                .delete(events::delete_event),
        )
        .route(
            "/api/v1/admin/events/:event_id/occurrences",
            get(events::list_occurrences),
        )
        .route(
            "/api/v1/admin/content/:kind/:item_id/review",
            post(content::review_content),
        )
        .route_layer(middleware::from_fn(require_admin));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(member_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.server.request_timeout_secs,
                ))),
        )
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn test_timeout_expiry_returns_retryable_408() {
        let err: tower::BoxError = Box::new(tower::timeout::error::Elapsed::new());
        let response = handle_middleware_error(err).await.into_response();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);

        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .unwrap();
        let body = String::from_utf8_lossy(&body);
        assert!(body.contains("took too long"), "body: {body}");
    }

    #[tokio::test]
    async fn test_other_middleware_errors_are_internal() {
        let err: tower::BoxError = "connection reset".into();
        let response = handle_middleware_error(err).await.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
