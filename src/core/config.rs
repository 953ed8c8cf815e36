use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::features::limits::RemoveOverrideRule;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub admin_api: AdminApiConfig,
    pub auth: AuthConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
}

/// Remote Admin API the dashboard wraps
#[derive(Debug, Clone)]
pub struct AdminApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

/// How outgoing Admin API calls are authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Forward the operator's session token from the incoming request
    Session,
    /// Use one machine-to-machine token (dashboard sits behind an SSO proxy)
    ClientCredentials,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub mode: AuthMode,
    /// Cookie holding the operator's session token
    pub session_cookie: String,
    /// Where signed-out operators are sent; unset renders the unauthorized page
    pub sign_in_url: Option<String>,
    pub sign_out_url: String,
    pub client_credentials: Option<ClientCredentialsConfig>,
}

/// OAuth client-credentials settings for `AuthMode::ClientCredentials`
#[derive(Debug, Clone)]
pub struct ClientCredentialsConfig {
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub scope: Option<String>,
    pub resource: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub users_page_size: u32,
    pub remove_override_rule: RemoveOverrideRule,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            admin_api: AdminApiConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            dashboard: DashboardConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        Ok(Self { host, port })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AdminApiConfig {
    const DEFAULT_BASE_URL: &'static str = "http://localhost:8080";
    const DEFAULT_TIMEOUT_SECS: u64 = 15;

    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("ADMIN_API_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string());

        let timeout_secs = env::var("ADMIN_API_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "ADMIN_API_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl FromStr for AuthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "session" => Ok(AuthMode::Session),
            "client_credentials" => Ok(AuthMode::ClientCredentials),
            other => Err(format!(
                "ADMIN_AUTH_MODE must be 'session' or 'client_credentials', got '{}'",
                other
            )),
        }
    }
}

impl AuthConfig {
    const DEFAULT_SESSION_COOKIE: &'static str = "__session";

    pub fn from_env() -> Result<Self, String> {
        let mode = env::var("ADMIN_AUTH_MODE")
            .unwrap_or_else(|_| "session".to_string())
            .parse::<AuthMode>()?;

        let session_cookie = env::var("SESSION_COOKIE_NAME")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_SESSION_COOKIE.to_string());

        let sign_in_url = env::var("SIGN_IN_URL").ok().filter(|s| !s.is_empty());
        let sign_out_url = env::var("SIGN_OUT_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "/".to_string());

        let client_credentials = match mode {
            AuthMode::ClientCredentials => Some(ClientCredentialsConfig::from_env()?),
            AuthMode::Session => None,
        };

        Ok(Self {
            mode,
            session_cookie,
            sign_in_url,
            sign_out_url,
            client_credentials,
        })
    }
}

impl ClientCredentialsConfig {
    pub fn from_env() -> Result<Self, String> {
        let token_url = env::var("OAUTH_TOKEN_URL")
            .map_err(|_| "OAUTH_TOKEN_URL environment variable is required".to_string())?;

        let client_id = env::var("OAUTH_CLIENT_ID")
            .map_err(|_| "OAUTH_CLIENT_ID environment variable is required".to_string())?;

        let client_secret = env::var("OAUTH_CLIENT_SECRET")
            .map_err(|_| "OAUTH_CLIENT_SECRET environment variable is required".to_string())?;

        let scope = env::var("OAUTH_SCOPE").ok().filter(|s| !s.is_empty());
        let resource = env::var("OAUTH_RESOURCE").ok().filter(|s| !s.is_empty());

        Ok(Self {
            token_url,
            client_id,
            client_secret,
            scope,
            resource,
        })
    }
}

impl DashboardConfig {
    const DEFAULT_USERS_PAGE_SIZE: u32 = 20;
    const MAX_USERS_PAGE_SIZE: u32 = 100;

    pub fn from_env() -> Result<Self, String> {
        let users_page_size = env::var("USERS_PAGE_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_USERS_PAGE_SIZE.to_string())
            .parse::<u32>()
            .map_err(|_| "USERS_PAGE_SIZE must be a valid number".to_string())?;

        if users_page_size == 0 || users_page_size > Self::MAX_USERS_PAGE_SIZE {
            return Err(format!(
                "USERS_PAGE_SIZE must be between 1 and {}",
                Self::MAX_USERS_PAGE_SIZE
            ));
        }

        let remove_override_rule = env::var("REMOVE_OVERRIDE_RULE")
            .unwrap_or_else(|_| "override_present".to_string())
            .parse::<RemoveOverrideRule>()
            .map_err(|e| format!("Invalid REMOVE_OVERRIDE_RULE: {}", e))?;

        Ok(Self {
            users_page_size,
            remove_override_rule,
        })
    }
}
