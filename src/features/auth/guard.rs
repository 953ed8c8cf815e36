//! Access guard for every dashboard page.
//!
//! The caller's identity is resolved with `GET /me` on the Admin API, using
//! the caller's own session token, before a view runs. Three states: loading (the identity call is in flight),
//! unauthorized (no credential, failed call, or `isAdmin` false) and
//! authorized. Only the last two are ever rendered.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use minijinja::context;

use crate::core::config::AuthConfig;
use crate::core::error::AppError;
use crate::features::auth::session::session_token;
use crate::modules::admin_api::{AdminApi, AdminApiConnector, AdminApiError};
use crate::shared::templates::render_template;

pub struct GuardState {
    pub(crate) connector: Arc<dyn AdminApiConnector>,
    pub(crate) session_cookie: String,
    pub(crate) sign_in_url: Option<String>,
    pub(crate) sign_out_url: String,
}

impl GuardState {
    pub fn new(connector: Arc<dyn AdminApiConnector>, auth: &AuthConfig) -> Self {
        Self {
            connector,
            session_cookie: auth.session_cookie.clone(),
            sign_in_url: auth.sign_in_url.clone(),
            sign_out_url: auth.sign_out_url.clone(),
        }
    }
}

/// Outcome of resolving the caller's identity
#[derive(Debug)]
pub enum AccessDecision {
    Authorized,
    NotAdmin,
    Failed(AdminApiError),
}

pub async fn resolve_access(api: &dyn AdminApi) -> AccessDecision {
    match api.me().await {
        Ok(me) if me.is_admin => AccessDecision::Authorized,
        Ok(_) => AccessDecision::NotAdmin,
        Err(e) => AccessDecision::Failed(e),
    }
}

/// Admin API handle bound to the verified operator, placed in request
/// extensions by [`require_admin`]
#[derive(Clone)]
pub struct AdminSession(pub Arc<dyn AdminApi>);

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminSession>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Admin session required".to_string()))
    }
}

pub async fn require_admin(
    State(state): State<Arc<GuardState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(session) = session_token(req.headers(), &state.session_cookie) else {
        if let Some(url) = &state.sign_in_url {
            return Redirect::to(url).into_response();
        }
        return unauthorized_page("You are not signed in.");
    };

    let caller = state.connector.caller(&session);
    let decision = resolve_access(caller.as_ref()).await;
    match decision {
        AccessDecision::Authorized => {
            let api = state.connector.connect(&session);
            req.extensions_mut().insert(AdminSession(api));
            next.run(req).await
        }
        AccessDecision::NotAdmin => {
            tracing::warn!("Rejected dashboard access for non-admin caller");
            unauthorized_page("You do not have admin access.")
        }
        AccessDecision::Failed(e) if e.is_unauthorized() => {
            tracing::warn!("Admin API rejected the session: {}", e);
            unauthorized_page("You do not have admin access.")
        }
        AccessDecision::Failed(e) => {
            tracing::warn!("Failed to verify admin status: {}", e);
            unauthorized_page("You do not have admin access.")
        }
    }
}

fn unauthorized_page(reason: &str) -> Response {
    match render_template("unauthorized.html", context! { reason => reason }) {
        Ok(html) => (StatusCode::FORBIDDEN, Html(html)).into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::build_router;
    use crate::features::limits::RemoveOverrideRule;
    use crate::modules::admin_api::{CredentialSource, HttpAdminApiConnector, SessionToken};
    use crate::shared::test_helpers::{
        admin_cookie, fixture_user, spawn_mock_admin_api, test_app, test_auth_config,
        test_dashboard_config, FakeAdminApi, MockAdminState, MACHINE_TOKEN, MEMBER_TOKEN,
    };
    use axum::http::{header, HeaderName, HeaderValue};
    use axum_test::TestServer;

    fn cookie(value: &str) -> (HeaderName, HeaderValue) {
        (header::COOKIE, HeaderValue::from_str(value).unwrap())
    }

    #[tokio::test]
    async fn test_resolve_access() {
        let admin = FakeAdminApi::admin_with(vec![]);
        assert!(matches!(
            resolve_access(admin.as_ref()).await,
            AccessDecision::Authorized
        ));

        let member = FakeAdminApi::default();
        assert!(matches!(
            resolve_access(&member).await,
            AccessDecision::NotAdmin
        ));

        let broken = FakeAdminApi {
            fail_me: true,
            ..Default::default()
        };
        assert!(matches!(
            resolve_access(&broken).await,
            AccessDecision::Failed(_)
        ));
    }

    #[tokio::test]
    async fn test_missing_session_is_blocked() {
        let server = TestServer::new(test_app(FakeAdminApi::admin_with(vec![]))).unwrap();

        let response = server.get("/users").await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
        assert!(response.text().contains("You are not signed in."));
        assert!(response.text().contains("/sign-out"));
    }

    #[tokio::test]
    async fn test_non_admin_is_blocked() {
        let api = Arc::new(FakeAdminApi {
            users: std::sync::Mutex::new(vec![fixture_user("user_1")]),
            is_admin: false,
            ..Default::default()
        });
        let server = TestServer::new(test_app(api.clone())).unwrap();
        let (name, value) = cookie(&admin_cookie());

        let response = server.get("/users").add_header(name, value).await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
        assert!(response
            .text()
            .contains("Unauthorized: You do not have admin access."));
        assert!(!response.text().contains("user_1"));
    }

    #[tokio::test]
    async fn test_identity_failure_is_blocked() {
        let api = Arc::new(FakeAdminApi {
            is_admin: true,
            fail_me: true,
            ..Default::default()
        });
        let server = TestServer::new(test_app(api)).unwrap();
        let (name, value) = cookie(&admin_cookie());

        let response = server.get("/lookup").add_header(name, value).await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_passes() {
        let server = TestServer::new(test_app(FakeAdminApi::admin_with(vec![]))).unwrap();
        let (name, value) = cookie(&admin_cookie());

        let response = server.get("/users").add_header(name, value).await;
        response.assert_status_ok();
    }

    #[tokio::test]
    async fn test_health_is_not_guarded() {
        let server = TestServer::new(test_app(FakeAdminApi::admin_with(vec![]))).unwrap();
        server.get("/health").await.assert_status_ok();
    }

    /// Router over the mock Admin API with a shared machine token for data calls
    async fn machine_token_server(state: MockAdminState) -> TestServer {
        let base_url = spawn_mock_admin_api(state).await;
        let connector = HttpAdminApiConnector::new(
            reqwest::Client::new(),
            base_url,
            CredentialSource::Shared(Arc::new(SessionToken::new(Some(
                MACHINE_TOKEN.to_string(),
            )))),
        );
        let app = build_router(
            Arc::new(connector),
            &test_auth_config(),
            &test_dashboard_config(RemoveOverrideRule::OverridePresent),
        );
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_machine_token_mode_still_requires_session() {
        let state = MockAdminState::with_users(vec![fixture_user("user_1")]);
        let server = machine_token_server(state.clone()).await;

        let response = server
            .get("/lookup")
            .add_query_param("user_id", "user_1")
            .await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

        let response = server
            .post("/lookup/user_1/limits/requestLimit")
            .form(&[("value", "999999")])
            .await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(state.last_body(), None);
        assert_eq!(state.last_authorization(), None);
    }

    #[tokio::test]
    async fn test_machine_token_mode_checks_caller_identity() {
        let state = MockAdminState::with_users(vec![fixture_user("user_1")]);
        let server = machine_token_server(state.clone()).await;

        let (name, value) = cookie(&format!("__session={}", MEMBER_TOKEN));
        let response = server
            .post("/lookup/user_1/limits/requestLimit")
            .add_header(name, value)
            .form(&[("value", "999999")])
            .await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(state.last_body(), None);
    }

    #[tokio::test]
    async fn test_machine_token_mode_uses_machine_token_for_data() {
        let state = MockAdminState::with_users(vec![fixture_user("user_1")]);
        let server = machine_token_server(state.clone()).await;

        let (name, value) = cookie(&admin_cookie());
        let response = server
            .get("/lookup")
            .add_query_param("user_id", "user_1")
            .add_header(name, value)
            .await;
        response.assert_status_ok();
        assert_eq!(
            state.last_authorization(),
            Some(format!("Bearer {}", MACHINE_TOKEN))
        );
    }
}
