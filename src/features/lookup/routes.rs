use crate::core::config::DashboardConfig;
use crate::features::lookup::handlers;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn routes(settings: Arc<DashboardConfig>) -> Router {
    Router::new()
        .route("/lookup", get(handlers::lookup_user))
        .route("/lookup/{user_id}/limits/{kind}", post(handlers::set_limit))
        .route(
            "/lookup/{user_id}/limits/{kind}/remove",
            post(handlers::remove_limit),
        )
        .with_state(settings)
}
