use async_trait::async_trait;

/// Source of the bearer credential attached to every Admin API request.
///
/// Credential lifetime and refresh belong to the implementation; the client
/// asks for a token right before each call.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn bearer_token(&self) -> Result<String, TokenError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("No session credential was presented")]
    MissingSession,

    #[error("Failed to fetch token: {0}")]
    FetchError(String),

    #[error("Failed to parse token response: {0}")]
    ParseError(String),
}

/// The operator's own session token, captured from the incoming request.
#[derive(Debug, Clone)]
pub struct SessionToken {
    token: Option<String>,
}

impl SessionToken {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }
}

#[async_trait]
impl TokenProvider for SessionToken {
    async fn bearer_token(&self) -> Result<String, TokenError> {
        self.token.clone().ok_or(TokenError::MissingSession)
    }
}
