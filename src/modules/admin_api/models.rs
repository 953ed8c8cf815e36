use serde::{Deserialize, Serialize};

use crate::features::limits::{EffectiveLimit, LimitKind, QuotaDimension, SubscriptionPlan};

/// User as returned by the Admin API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_addresses: Option<Vec<EmailAddress>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_subscription: Option<SubscriptionPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub just_registered: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<Project>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_keys: Option<Vec<serde_json::Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_request_usage: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_limit: Option<i64>,
    #[serde(default)]
    pub override_request_limit: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_limit: Option<i64>,
    #[serde(default)]
    pub override_access_key_limit: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_limit: Option<i64>,
    #[serde(default)]
    pub override_project_limit: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_limit: Option<i64>,
    #[serde(default)]
    pub override_api_key_limit: Option<i64>,

    /// Fields this dashboard does not model, kept for the raw data view
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailAddress {
    pub email_address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keys: Vec<ProjectKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectKey {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whitelisted_urls: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allows_web: Option<bool>,
}

/// Response of `GET /me`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub page: u32,
    pub per: u32,
    pub total: u64,
    pub page_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedUsers {
    pub users: Vec<User>,
    pub metadata: PageMetadata,
}

/// `GET /admin/users` body: paged envelope, or a bare array from older servers
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListUsersResponse {
    Paged(PaginatedUsers),
    Bare(Vec<User>),
}

/// One page of users
#[derive(Debug, Clone, PartialEq)]
pub struct UserPage {
    pub users: Vec<User>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub page_count: u32,
}

impl ListUsersResponse {
    pub fn into_page(self, requested_page: u32, requested_per: u32) -> UserPage {
        match self {
            ListUsersResponse::Paged(PaginatedUsers { users, metadata }) => UserPage {
                users,
                page: metadata.page,
                per_page: metadata.per,
                total: metadata.total,
                page_count: metadata.page_count,
            },
            ListUsersResponse::Bare(users) => UserPage {
                total: users.len() as u64,
                users,
                page: requested_page,
                per_page: requested_per,
                page_count: 1,
            },
        }
    }
}

impl User {
    pub fn plan(&self) -> SubscriptionPlan {
        self.current_subscription.clone().unwrap_or_default()
    }

    pub fn primary_email(&self) -> Option<&str> {
        self.email_addresses
            .as_ref()
            .and_then(|emails| emails.first())
            .map(|e| e.email_address.as_str())
    }

    /// "First Last", trimmed; empty when neither name is set
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string()
    }

    pub fn api_key_count(&self) -> i64 {
        self.projects
            .as_ref()
            .map(|projects| projects.iter().map(|p| p.keys.len() as i64).sum())
            .unwrap_or(0)
    }

    pub fn quota(&self, kind: LimitKind) -> QuotaDimension {
        match kind {
            LimitKind::RequestLimit => QuotaDimension {
                base: self.request_limit,
                override_limit: self.override_request_limit,
                usage: self.current_request_usage.unwrap_or(0),
            },
            LimitKind::AccessKeyLimit => QuotaDimension {
                base: self.access_key_limit,
                override_limit: self.override_access_key_limit,
                usage: self.access_keys.as_ref().map_or(0, |k| k.len() as i64),
            },
            LimitKind::ProjectLimit => QuotaDimension {
                base: self.project_limit,
                override_limit: self.override_project_limit,
                usage: self.projects.as_ref().map_or(0, |p| p.len() as i64),
            },
            LimitKind::ApiKeyLimit => QuotaDimension {
                base: self.api_key_limit,
                override_limit: self.override_api_key_limit,
                usage: self.api_key_count(),
            },
        }
    }

    pub fn effective_limit(&self, kind: LimitKind) -> EffectiveLimit {
        self.quota(kind).effective()
    }

    /// Case-insensitive match against primary email, full name or id
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }

        self.primary_email()
            .is_some_and(|email| email.to_lowercase().contains(&term))
            || self.full_name().to_lowercase().contains(&term)
            || self.id.to_lowercase().contains(&term)
    }
}
