use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use serde::Deserialize;
use serde_json::json;

use crate::core::app::build_router;
use crate::core::config::{AuthConfig, AuthMode, DashboardConfig};
use crate::features::limits::{LimitKind, RemoveOverrideRule};
use crate::modules::admin_api::client::Result as ApiResult;
use crate::modules::admin_api::{
    AdminApi, AdminApiClient, AdminApiConnector, AdminApiError, MeResponse, User, UserPage,
};

/// Session token the fakes accept as an administrator
pub const ADMIN_TOKEN: &str = "sess_admin";
/// Session token the fakes accept as a signed-in non-admin
pub const MEMBER_TOKEN: &str = "sess_member";
/// Machine token the mock Admin API accepts for data calls
pub const MACHINE_TOKEN: &str = "m2m_dashboard";

/// A free-tier user with generated name and email
pub fn fixture_user(id: &str) -> User {
    let first: String = FirstName().fake();
    let last: String = LastName().fake();
    let email: String = SafeEmail().fake();
    named_user(id, &first, &last, &email)
}

pub fn named_user(id: &str, first: &str, last: &str, email: &str) -> User {
    serde_json::from_value(json!({
        "id": id,
        "firstName": first,
        "lastName": last,
        "emailAddresses": [{ "emailAddress": email }],
        "currentSubscription": "free_user",
        "currentRequestUsage": 0,
        "requestLimit": 3000,
        "accessKeyLimit": 1,
        "accessKeys": [],
        "projects": []
    }))
    .unwrap()
}

/// Server-side paging: 1-indexed page, `pageCount = ceil(total / per)`
pub fn paginate(users: &[User], page: u32, per: u32) -> UserPage {
    let total = users.len() as u64;
    let start = ((page.max(1) - 1) as usize).saturating_mul(per as usize);
    let page_users = users
        .iter()
        .skip(start)
        .take(per as usize)
        .cloned()
        .collect();

    UserPage {
        users: page_users,
        page,
        per_page: per,
        total,
        page_count: total.div_ceil(per.max(1) as u64) as u32,
    }
}

pub fn apply_override(user: &mut User, kind: LimitKind, value: Option<i64>) {
    match kind {
        LimitKind::RequestLimit => user.override_request_limit = value,
        LimitKind::AccessKeyLimit => user.override_access_key_limit = value,
        LimitKind::ProjectLimit => user.override_project_limit = value,
        LimitKind::ApiKeyLimit => user.override_api_key_limit = value,
    }
}

// =============================================================================
// HTTP MOCK OF THE ADMIN API
// =============================================================================

#[derive(Default)]
struct MockInner {
    users: Mutex<Vec<User>>,
    last_authorization: Mutex<Option<String>>,
    last_body: Mutex<Option<String>>,
}

/// State behind the mock Admin API server
#[derive(Clone, Default)]
pub struct MockAdminState(Arc<MockInner>);

impl MockAdminState {
    pub fn with_users(users: Vec<User>) -> Self {
        let state = Self::default();
        *state.0.users.lock().unwrap() = users;
        state
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.0.last_authorization.lock().unwrap().clone()
    }

    pub fn last_body(&self) -> Option<String> {
        self.0.last_body.lock().unwrap().clone()
    }

    /// Record the Authorization header; `Some(is_admin)` when it is recognised
    fn authorize(&self, headers: &HeaderMap) -> Option<bool> {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        *self.0.last_authorization.lock().unwrap() = auth.clone();

        match auth.as_deref() {
            Some(value) if value == format!("Bearer {}", ADMIN_TOKEN) => Some(true),
            Some(value) if value == format!("Bearer {}", MEMBER_TOKEN) => Some(false),
            Some(value) if value == format!("Bearer {}", MACHINE_TOKEN) => Some(true),
            _ => None,
        }
    }

    fn require_admin(&self, headers: &HeaderMap) -> Result<(), Response> {
        match self.authorize(headers) {
            Some(true) => Ok(()),
            Some(false) => Err((StatusCode::FORBIDDEN, "Admin access required").into_response()),
            None => Err((StatusCode::UNAUTHORIZED, "Unauthorized").into_response()),
        }
    }

    fn not_found() -> Response {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": true, "reason": "User not found" })),
        )
            .into_response()
    }

    fn write_override(&self, kind: LimitKind, user_id: &str, body: String) -> Response {
        *self.0.last_body.lock().unwrap() = Some(body.clone());

        let value: Option<i64> = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(_) => return (StatusCode::BAD_REQUEST, "Invalid limit").into_response(),
        };

        let mut users = self.0.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == user_id) {
            Some(user) => {
                apply_override(user, kind, value);
                Json(user.clone()).into_response()
            }
            None => Self::not_found(),
        }
    }
}

#[derive(Deserialize)]
struct PageParams {
    page: u32,
    per: u32,
}

async fn mock_me(State(state): State<MockAdminState>, headers: HeaderMap) -> Response {
    match state.authorize(&headers) {
        Some(is_admin) => Json(json!({ "isAdmin": is_admin })).into_response(),
        None => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
    }
}

async fn mock_list_users(
    State(state): State<MockAdminState>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> Response {
    if let Err(rejection) = state.require_admin(&headers) {
        return rejection;
    }
    let users = state.0.users.lock().unwrap();
    let page = paginate(&users, params.page, params.per);

    Json(json!({
        "users": page.users,
        "metadata": {
            "page": page.page,
            "per": page.per_page,
            "total": page.total,
            "pageCount": page.page_count
        }
    }))
    .into_response()
}

async fn mock_get_user(
    State(state): State<MockAdminState>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> Response {
    if let Err(rejection) = state.require_admin(&headers) {
        return rejection;
    }
    let users = state.0.users.lock().unwrap();
    match users.iter().find(|u| u.id == user_id) {
        Some(user) => Json(user.clone()).into_response(),
        None => MockAdminState::not_found(),
    }
}

macro_rules! mock_override_handler {
    ($name:ident, $kind:expr) => {
        async fn $name(
            State(state): State<MockAdminState>,
            headers: HeaderMap,
            Path(user_id): Path<String>,
            body: String,
        ) -> Response {
            if let Err(rejection) = state.require_admin(&headers) {
                return rejection;
            }
            state.write_override($kind, &user_id, body)
        }
    };
}

mock_override_handler!(mock_override_requests, LimitKind::RequestLimit);
mock_override_handler!(mock_override_access_keys, LimitKind::AccessKeyLimit);
mock_override_handler!(mock_override_projects, LimitKind::ProjectLimit);
mock_override_handler!(mock_override_api_keys, LimitKind::ApiKeyLimit);

pub fn mock_admin_api_router(state: MockAdminState) -> Router {
    Router::new()
        .route("/me", get(mock_me))
        .route("/admin/users", get(mock_list_users))
        .route("/admin/{user_id}/user", get(mock_get_user))
        .route(
            "/admin/{user_id}/user/override-limit",
            post(mock_override_requests),
        )
        .route(
            "/admin/{user_id}/user/api-keys/override-limit",
            post(mock_override_access_keys),
        )
        .route(
            "/admin/{user_id}/projects/override-limit",
            post(mock_override_projects),
        )
        .route(
            "/admin/{user_id}/keys/override-limit",
            post(mock_override_api_keys),
        )
        .with_state(state)
}

/// Serve the mock Admin API on an ephemeral port; returns its base URL
pub async fn spawn_mock_admin_api(state: MockAdminState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, mock_admin_api_router(state))
            .await
            .unwrap();
    });
    format!("http://{}", addr)
}

// =============================================================================
// IN-MEMORY FAKE FOR HANDLER TESTS
// =============================================================================

/// In-memory `AdminApi` with switchable failures
#[derive(Default)]
pub struct FakeAdminApi {
    pub users: Mutex<Vec<User>>,
    pub is_admin: bool,
    pub fail_me: bool,
    pub fail_list: bool,
    pub failing_writes: Mutex<HashSet<LimitKind>>,
    pub writes: Mutex<Vec<(LimitKind, String, Option<i64>)>>,
}

impl FakeAdminApi {
    pub fn admin_with(users: Vec<User>) -> Arc<Self> {
        Arc::new(Self {
            users: Mutex::new(users),
            is_admin: true,
            ..Default::default()
        })
    }

    pub fn fail_writes_for(&self, kind: LimitKind) {
        self.failing_writes.lock().unwrap().insert(kind);
    }

    pub fn writes(&self) -> Vec<(LimitKind, String, Option<i64>)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn user(&self, user_id: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
    }

    fn server_error(path: &str) -> AdminApiError {
        AdminApiError::Server {
            status: 500,
            body: "boom".to_string(),
            url: format!("http://admin-api.test{}", path),
        }
    }
}

#[async_trait]
impl AdminApi for FakeAdminApi {
    async fn me(&self) -> ApiResult<MeResponse> {
        if self.fail_me {
            return Err(Self::server_error("/me"));
        }
        Ok(MeResponse {
            is_admin: self.is_admin,
        })
    }

    async fn list_users(&self, page: u32, per_page: u32) -> ApiResult<UserPage> {
        if self.fail_list {
            return Err(Self::server_error("/admin/users"));
        }
        Ok(paginate(&self.users.lock().unwrap(), page, per_page))
    }

    async fn get_user(&self, user_id: &str) -> ApiResult<User> {
        self.user(user_id).ok_or_else(|| AdminApiError::NotFound {
            body: r#"{"error":true,"reason":"User not found"}"#.to_string(),
            url: format!("http://admin-api.test/admin/{}/user", user_id),
        })
    }

    async fn set_override(
        &self,
        kind: LimitKind,
        user_id: &str,
        value: Option<i64>,
    ) -> ApiResult<User> {
        if self.failing_writes.lock().unwrap().contains(&kind) {
            return Err(Self::server_error(&AdminApiClient::override_path(
                kind, user_id,
            )));
        }
        self.writes
            .lock()
            .unwrap()
            .push((kind, user_id.to_string(), value));

        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| AdminApiError::NotFound {
                body: String::new(),
                url: format!("http://admin-api.test/admin/{}/user", user_id),
            })?;
        apply_override(user, kind, value);
        Ok(user.clone())
    }
}

/// Connector handing out the shared fake for every session
pub struct FakeConnector {
    pub api: Arc<FakeAdminApi>,
}

impl AdminApiConnector for FakeConnector {
    fn caller(&self, _session_token: &str) -> Arc<dyn AdminApi> {
        self.api.clone()
    }

    fn connect(&self, _session_token: &str) -> Arc<dyn AdminApi> {
        self.api.clone()
    }
}

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        mode: AuthMode::Session,
        session_cookie: "__session".to_string(),
        sign_in_url: None,
        sign_out_url: "/".to_string(),
        client_credentials: None,
    }
}

pub fn test_dashboard_config(rule: RemoveOverrideRule) -> DashboardConfig {
    DashboardConfig {
        users_page_size: 20,
        remove_override_rule: rule,
    }
}

/// Full dashboard router over the fake, with the strict remove-override rule
pub fn test_app(api: Arc<FakeAdminApi>) -> Router {
    test_app_with_rule(api, RemoveOverrideRule::OverridePresent)
}

pub fn test_app_with_rule(api: Arc<FakeAdminApi>, rule: RemoveOverrideRule) -> Router {
    build_router(
        Arc::new(FakeConnector { api }),
        &test_auth_config(),
        &test_dashboard_config(rule),
    )
}

/// `Cookie` header value carrying the admin session
pub fn admin_cookie() -> String {
    format!("__session={}", ADMIN_TOKEN)
}
