use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::features::limits::{LimitInput, LimitKind, QuotaView};
use crate::modules::admin_api::{ErrorDetail, User, UserPage};

/// Query for the users list
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UsersQuery {
    /// Page number (1-indexed, default: 1)
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<u32>,

    /// Case-insensitive filter over the fetched page
    pub q: Option<String>,
}

impl UsersQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn search(&self) -> String {
        self.q.as_deref().unwrap_or("").trim().to_string()
    }
}

/// Query carrying the list page an edit was opened from
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReturnPageQuery {
    pub page: Option<u32>,
}

impl ReturnPageQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

/// Edit form for the two limits editable from the users list.
///
/// `*_initial_*` hidden fields hold the prefilled values so only dimensions
/// the operator actually changed are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditLimitsForm {
    pub page: Option<u32>,

    #[serde(default)]
    pub requests_value: String,
    pub requests_unlimited: Option<String>,
    pub requests_initial_value: Option<String>,
    pub requests_initial_unlimited: Option<String>,

    #[serde(default)]
    pub access_keys_value: String,
    pub access_keys_unlimited: Option<String>,
    pub access_keys_initial_value: Option<String>,
    pub access_keys_initial_unlimited: Option<String>,
}

impl EditLimitsForm {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Submitted input for an editable kind
    pub fn input(&self, kind: LimitKind) -> LimitInput {
        match kind {
            LimitKind::AccessKeyLimit => LimitInput::from_form(
                &self.access_keys_value,
                self.access_keys_unlimited.as_deref(),
            ),
            _ => LimitInput::from_form(&self.requests_value, self.requests_unlimited.as_deref()),
        }
    }

    /// Prefilled input the form was rendered with; `None` when not submitted
    pub fn initial(&self, kind: LimitKind) -> Option<LimitInput> {
        let (value, unlimited) = match kind {
            LimitKind::AccessKeyLimit => (
                self.access_keys_initial_value.as_deref(),
                self.access_keys_initial_unlimited.as_deref(),
            ),
            _ => (
                self.requests_initial_value.as_deref(),
                self.requests_initial_unlimited.as_deref(),
            ),
        };
        value.map(|v| LimitInput::from_form(v, unlimited))
    }
}

/// Body of the per-dimension Remove Override form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoveOverrideForm {
    pub page: Option<u32>,
}

impl RemoveOverrideForm {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

// =============================================================================
// VIEW MODELS
// =============================================================================

pub fn users_url(page: u32) -> String {
    format!("/users?page={}", page)
}

/// List page link that keeps the active search
pub fn search_url(page: u32, search: &str) -> String {
    if search.is_empty() {
        users_url(page)
    } else {
        format!("{}&q={}", users_url(page), urlencoding::encode(search))
    }
}

pub fn user_base_url(user_id: &str) -> String {
    format!("/users/{}", urlencoding::encode(user_id))
}

#[derive(Debug, Clone, Serialize)]
pub struct UserRowView {
    pub id: String,
    /// Full name, or the id when no name is set
    pub display_name: String,
    pub email: Option<String>,
    pub image_url: Option<String>,
    pub initial: String,
    pub request_usage: i64,
    pub request_limit: String,
    pub access_key_usage: i64,
    pub access_key_limit: String,
    pub edit_url: String,
}

impl UserRowView {
    pub fn new(user: &User, page: u32) -> Self {
        let full_name = user.full_name();
        let display_name = if full_name.is_empty() {
            user.id.clone()
        } else {
            full_name
        };
        let initial = display_name
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_else(|| "?".to_string());

        let requests = user.quota(LimitKind::RequestLimit);
        let access_keys = user.quota(LimitKind::AccessKeyLimit);

        Self {
            id: user.id.clone(),
            display_name,
            email: user.primary_email().map(str::to_string),
            image_url: user.image_url.clone(),
            initial,
            request_usage: requests.usage,
            request_limit: requests.effective().to_string(),
            access_key_usage: access_keys.usage,
            access_key_limit: access_keys.effective().to_string(),
            edit_url: format!("{}/edit?page={}", user_base_url(&user.id), page),
        }
    }
}

/// Context for `users.html`
#[derive(Debug, Clone, Serialize)]
pub struct UsersPageView {
    pub rows: Vec<UserRowView>,
    pub page: u32,
    pub page_count: u32,
    pub total: u64,
    pub search: String,
    pub previous_url: Option<String>,
    pub next_url: Option<String>,
    pub error: Option<ErrorDetail>,
}

impl UsersPageView {
    pub fn from_page(result: UserPage, search: &str, per_page: u32) -> Self {
        let page = result.page.max(1);
        let fetched = result.users.len() as u32;
        let rows = result
            .users
            .iter()
            .filter(|u| u.matches_search(search))
            .map(|u| UserRowView::new(u, page))
            .collect();

        let has_next = fetched >= per_page && page < result.page_count;

        Self {
            rows,
            page,
            page_count: result.page_count,
            total: result.total,
            search: search.to_string(),
            previous_url: (page > 1).then(|| search_url(page - 1, search)),
            next_url: has_next.then(|| search_url(page + 1, search)),
            error: None,
        }
    }

    pub fn failed(page: u32, search: &str, error: ErrorDetail) -> Self {
        Self {
            rows: Vec::new(),
            page,
            page_count: 0,
            total: 0,
            search: search.to_string(),
            previous_url: (page > 1).then(|| search_url(page - 1, search)),
            next_url: None,
            error: Some(error),
        }
    }
}

/// Context for `edit_user.html`
#[derive(Debug, Clone, Serialize)]
pub struct EditUserView {
    pub user_id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub page: u32,
    pub base_url: String,
    pub back_url: String,
    pub limits: Vec<QuotaView>,
    /// Per-operation failures from the last save
    pub failures: Vec<String>,
    /// Set when the user itself could not be loaded
    pub error: Option<ErrorDetail>,
}

impl EditUserView {
    pub fn new(user: &User, page: u32, limits: Vec<QuotaView>) -> Self {
        let row = UserRowView::new(user, page);
        Self {
            user_id: user.id.clone(),
            display_name: row.display_name,
            email: row.email,
            page,
            base_url: user_base_url(&user.id),
            back_url: users_url(page),
            limits,
            failures: Vec::new(),
            error: None,
        }
    }

    pub fn failed(user_id: &str, page: u32, error: ErrorDetail) -> Self {
        Self {
            user_id: user_id.to_string(),
            display_name: user_id.to_string(),
            email: None,
            page,
            base_url: user_base_url(user_id),
            back_url: users_url(page),
            limits: Vec::new(),
            failures: Vec::new(),
            error: Some(error),
        }
    }

    pub fn with_failures(mut self, failures: Vec<String>) -> Self {
        self.failures = failures;
        self
    }
}
