use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::core::config::ClientCredentialsConfig;
use crate::modules::admin_api::{TokenError, TokenProvider};

/// Response from an OAuth token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
    #[serde(default, rename = "token_type")]
    pub _token_type: String,
}

fn default_expires_in() -> u64 {
    3600
}

/// Cached token with expiration tracking
struct TokenCache {
    token: TokenResponse,
    fetched_at: Instant,
}

/// Machine-to-machine access tokens via the client-credentials grant, cached
/// until shortly before expiry
pub struct ClientCredentialsTokenManager {
    config: ClientCredentialsConfig,
    client: reqwest::Client,
    cache: Arc<RwLock<Option<TokenCache>>>,
    /// Refresh token this many seconds before expiration
    refresh_margin: Duration,
}

impl ClientCredentialsTokenManager {
    pub fn new(config: ClientCredentialsConfig, client: reqwest::Client) -> Self {
        Self {
            config,
            client,
            cache: Arc::new(RwLock::new(None)),
            refresh_margin: Duration::from_secs(60),
        }
    }

    /// Get a valid access token, fetching a new one if necessary
    pub async fn get_access_token(&self) -> Result<TokenResponse, TokenError> {
        {
            let cache = self.cache.read().await;
            if let Some(ref cached) = *cache {
                let elapsed = cached.fetched_at.elapsed();
                let expires_in = Duration::from_secs(cached.token.expires_in);

                if elapsed + self.refresh_margin < expires_in {
                    tracing::debug!(
                        "Using cached M2M token (expires in {} seconds)",
                        (expires_in - elapsed).as_secs()
                    );
                    return Ok(cached.token.clone());
                }
            }
        }

        self.fetch_token().await
    }

    async fn fetch_token(&self) -> Result<TokenResponse, TokenError> {
        tracing::debug!("Fetching new M2M token from {}", self.config.token_url);

        let mut form = vec![
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];
        if let Some(scope) = &self.config.scope {
            form.push(("scope", scope.as_str()));
        }
        if let Some(resource) = &self.config.resource {
            form.push(("resource", resource.as_str()));
        }

        let response = self
            .client
            .post(&self.config.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| TokenError::FetchError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TokenError::FetchError(format!(
                "Token request failed: HTTP {} - {}",
                status, body
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| TokenError::ParseError(e.to_string()))?;

        tracing::info!(
            "Fetched new M2M token, expires in {} seconds",
            token_response.expires_in
        );

        let mut cache = self.cache.write().await;
        *cache = Some(TokenCache {
            token: token_response.clone(),
            fetched_at: Instant::now(),
        });

        Ok(token_response)
    }
}

#[async_trait]
impl TokenProvider for ClientCredentialsTokenManager {
    async fn bearer_token(&self) -> Result<String, TokenError> {
        Ok(self.get_access_token().await?.access_token)
    }
}
