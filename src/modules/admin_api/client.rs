use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::error::AdminApiError;
use super::models::{ListUsersResponse, MeResponse, User, UserPage};
use super::token::TokenProvider;
use crate::features::limits::LimitKind;

pub type Result<T> = std::result::Result<T, AdminApiError>;

/// Operations of the remote administrative API
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// Resolve the caller's identity
    async fn me(&self) -> Result<MeResponse>;

    /// Fetch one page of users (`page` is 1-indexed)
    async fn list_users(&self, page: u32, per_page: u32) -> Result<UserPage>;

    async fn get_user(&self, user_id: &str) -> Result<User>;

    /// Set (`Some`) or clear (`None`) the override for one quota kind
    async fn set_override(
        &self,
        kind: LimitKind,
        user_id: &str,
        value: Option<i64>,
    ) -> Result<User>;
}

/// HTTP client for the Admin API
pub struct AdminApiClient {
    http_client: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl AdminApiClient {
    pub fn new(
        http_client: reqwest::Client,
        base_url: impl Into<String>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            base_url,
            tokens,
        }
    }

    /// Endpoint path for a kind's override write
    pub fn override_path(kind: LimitKind, user_id: &str) -> String {
        let id = urlencoding::encode(user_id);
        match kind {
            LimitKind::RequestLimit => format!("/admin/{}/user/override-limit", id),
            LimitKind::AccessKeyLimit => format!("/admin/{}/user/api-keys/override-limit", id),
            LimitKind::ProjectLimit => format!("/admin/{}/projects/override-limit", id),
            LimitKind::ApiKeyLimit => format!("/admin/{}/keys/override-limit", id),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer token, send, and decode a JSON body
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<T> {
        let token = self.tokens.bearer_token().await?;

        let response = request.bearer_auth(token).send().await.map_err(|e| {
            tracing::error!("Admin API request to {} failed: {}", url, e);
            AdminApiError::Network {
                message: e.to_string(),
                url: url.to_string(),
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Admin API error: HTTP {} from {} - {}", status, url, body);
            return Err(AdminApiError::from_response(status, body, url.to_string()));
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to parse Admin API response from {}: {}", url, e);
            AdminApiError::Decode {
                message: e.to_string(),
                url: url.to_string(),
            }
        })
    }
}

#[async_trait]
impl AdminApi for AdminApiClient {
    async fn me(&self) -> Result<MeResponse> {
        let url = self.url("/me");
        tracing::debug!("Resolving caller identity: {}", url);
        self.send(self.http_client.get(&url), &url).await
    }

    async fn list_users(&self, page: u32, per_page: u32) -> Result<UserPage> {
        if page == 0 {
            return Err(AdminApiError::InvalidRequest(
                "page must be at least 1".to_string(),
            ));
        }
        if per_page == 0 {
            return Err(AdminApiError::InvalidRequest(
                "per page must be greater than 0".to_string(),
            ));
        }

        let url = self.url(&format!("/admin/users?page={}&per={}", page, per_page));
        tracing::debug!("Listing users: {}", url);

        let response: ListUsersResponse = self.send(self.http_client.get(&url), &url).await?;
        Ok(response.into_page(page, per_page))
    }

    async fn get_user(&self, user_id: &str) -> Result<User> {
        let url = self.url(&format!("/admin/{}/user", urlencoding::encode(user_id)));
        tracing::debug!("Fetching user: {}", url);
        self.send(self.http_client.get(&url), &url).await
    }

    async fn set_override(
        &self,
        kind: LimitKind,
        user_id: &str,
        value: Option<i64>,
    ) -> Result<User> {
        let url = self.url(&Self::override_path(kind, user_id));
        tracing::debug!("Writing {} override {:?}: {}", kind, value, url);

        // Body is the bare JSON scalar: a number, or null to clear
        let user: User = self
            .send(self.http_client.post(&url).json(&value), &url)
            .await?;

        match value {
            Some(v) => tracing::info!("Set {} override for {} to {}", kind, user_id, v),
            None => tracing::info!("Cleared {} override for {}", kind, user_id),
        }

        Ok(user)
    }
}
