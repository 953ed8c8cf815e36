use crate::core::config::DashboardConfig;
use crate::features::users::handlers;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn routes(settings: Arc<DashboardConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_users))
        .route("/users", get(handlers::list_users))
        .route(
            "/users/{user_id}/edit",
            get(handlers::edit_user).post(handlers::save_user_limits),
        )
        .route(
            "/users/{user_id}/limits/{kind}/remove",
            post(handlers::remove_override),
        )
        .with_state(settings)
}
