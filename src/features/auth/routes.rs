use crate::features::auth::guard::GuardState;
use crate::features::auth::handlers;
use axum::{routing::get, Router};
use std::sync::Arc;

/// Routes reachable without an admin session
pub fn public_routes(state: Arc<GuardState>) -> Router {
    Router::new()
        .route(
            "/sign-out",
            get(handlers::sign_out).post(handlers::sign_out),
        )
        .with_state(state)
}
