use crate::features::auth::guard::GuardState;
use crate::features::auth::session::expired_cookie;
use axum::{
    extract::State,
    http::header,
    response::{AppendHeaders, IntoResponse, Redirect},
};
use std::sync::Arc;

/// Clear the session cookie and leave the dashboard
pub async fn sign_out(State(state): State<Arc<GuardState>>) -> impl IntoResponse {
    tracing::info!("Operator signed out");
    (
        AppendHeaders([(header::SET_COOKIE, expired_cookie(&state.session_cookie))]),
        Redirect::to(&state.sign_out_url),
    )
}
