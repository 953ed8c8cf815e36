use std::sync::Arc;

use super::client::{AdminApi, AdminApiClient};
use super::token::{SessionToken, TokenProvider};

/// Hands out Admin API handles for one request.
pub trait AdminApiConnector: Send + Sync {
    /// Handle authenticated as the caller, used to resolve `GET /me`
    fn caller(&self, session_token: &str) -> Arc<dyn AdminApi>;

    /// Handle for data calls once the caller is verified as an admin
    fn connect(&self, session_token: &str) -> Arc<dyn AdminApi>;
}

/// Where data calls get their bearer token from
#[derive(Clone)]
pub enum CredentialSource {
    /// Forward the operator's own session token
    Session,
    /// One shared provider (e.g. a machine-to-machine token manager)
    Shared(Arc<dyn TokenProvider>),
}

pub struct HttpAdminApiConnector {
    http_client: reqwest::Client,
    base_url: String,
    credentials: CredentialSource,
}

impl HttpAdminApiConnector {
    pub fn new(
        http_client: reqwest::Client,
        base_url: impl Into<String>,
        credentials: CredentialSource,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            credentials,
        }
    }

    fn client(&self, tokens: Arc<dyn TokenProvider>) -> Arc<dyn AdminApi> {
        Arc::new(AdminApiClient::new(
            self.http_client.clone(),
            self.base_url.clone(),
            tokens,
        ))
    }
}

impl AdminApiConnector for HttpAdminApiConnector {
    fn caller(&self, session_token: &str) -> Arc<dyn AdminApi> {
        self.client(Arc::new(SessionToken::new(Some(session_token.to_string()))))
    }

    fn connect(&self, session_token: &str) -> Arc<dyn AdminApi> {
        match &self.credentials {
            CredentialSource::Session => self.caller(session_token),
            CredentialSource::Shared(provider) => self.client(Arc::clone(provider)),
        }
    }
}
