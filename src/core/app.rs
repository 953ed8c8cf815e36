use std::sync::Arc;

use axum::{http::StatusCode, middleware::from_fn_with_state, routing::get, Router};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::core::config::{AuthConfig, DashboardConfig};
use crate::core::error::AppError;
use crate::core::middleware;
use crate::features::auth::{require_admin, routes as auth_routes, GuardState};
use crate::features::lookup::routes as lookup_routes;
use crate::features::users::routes as users_routes;
use crate::modules::admin_api::AdminApiConnector;

/// Simple health check endpoint (no auth required)
async fn health_check() -> StatusCode {
    StatusCode::OK
}

async fn not_found() -> AppError {
    AppError::NotFound("The page you are looking for does not exist.".to_string())
}

/// Assemble the dashboard: guarded views, public auth and health routes, and
/// the request-id and tracing layers around everything.
pub fn build_router(
    connector: Arc<dyn AdminApiConnector>,
    auth: &AuthConfig,
    dashboard: &DashboardConfig,
) -> Router {
    let guard = Arc::new(GuardState::new(connector, auth));
    let settings = Arc::new(dashboard.clone());

    // Every dashboard view requires a verified admin
    let protected_routes = Router::new()
        .merge(users_routes::routes(Arc::clone(&settings)))
        .merge(lookup_routes::routes(settings))
        .route_layer(from_fn_with_state(Arc::clone(&guard), require_admin));

    Router::new()
        .merge(protected_routes)
        .merge(auth_routes::public_routes(guard))
        .route("/health", get(health_check))
        .fallback(not_found)
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}
