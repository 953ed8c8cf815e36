use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

use super::token::TokenError;

/// Failures of an Admin API call.
#[derive(Debug, Error)]
pub enum AdminApiError {
    #[error("Unauthorized: HTTP {status}")]
    Unauthorized {
        status: u16,
        body: String,
        url: String,
    },

    #[error("User not found: HTTP 404")]
    NotFound { body: String, url: String },

    #[error("Admin API error: HTTP {status}")]
    Server {
        status: u16,
        body: String,
        url: String,
    },

    #[error("Request failed: {message}")]
    Network { message: String, url: String },

    #[error("Failed to parse Admin API response: {message}")]
    Decode { message: String, url: String },

    #[error("Failed to obtain access token: {0}")]
    Token(#[from] TokenError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl AdminApiError {
    /// Classify a non-2xx response
    pub fn from_response(status: StatusCode, body: String, url: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AdminApiError::Unauthorized {
                status: status.as_u16(),
                body,
                url,
            },
            StatusCode::NOT_FOUND => AdminApiError::NotFound { body, url },
            _ => AdminApiError::Server {
                status: status.as_u16(),
                body,
                url,
            },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            AdminApiError::Unauthorized { status, .. } | AdminApiError::Server { status, .. } => {
                Some(*status)
            }
            AdminApiError::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            AdminApiError::Unauthorized { url, .. }
            | AdminApiError::NotFound { url, .. }
            | AdminApiError::Server { url, .. }
            | AdminApiError::Network { url, .. }
            | AdminApiError::Decode { url, .. } => Some(url),
            AdminApiError::Token(_) | AdminApiError::InvalidRequest(_) => None,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            AdminApiError::Unauthorized { body, .. }
            | AdminApiError::NotFound { body, .. }
            | AdminApiError::Server { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AdminApiError::NotFound { .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            AdminApiError::Unauthorized { .. } | AdminApiError::Token(_)
        )
    }
}

/// Displayable breakdown of a failed call for inline error panels.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub message: String,
    pub status: Option<u16>,
    pub url: Option<String>,
    /// Server response body, pretty-printed when it is JSON
    pub body: Option<String>,
}

impl ErrorDetail {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            url: None,
            body: None,
        }
    }
}

impl From<&AdminApiError> for ErrorDetail {
    fn from(error: &AdminApiError) -> Self {
        let body = error
            .body()
            .filter(|b| !b.trim().is_empty())
            .map(|raw| match serde_json::from_str::<serde_json::Value>(raw) {
                Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| raw.into()),
                Err(_) => raw.to_string(),
            });

        Self {
            message: error.to_string(),
            status: error.status(),
            url: error.url().map(str::to_string),
            body,
        }
    }
}
