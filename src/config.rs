//! Configuration for the opsboard client

use std::time::Duration;

use opsboard_optimistic::DisplayWindows;
use url::Url;

use crate::error::{Error, Result};

/// Environment variable holding the API base URL
pub const API_URL_ENV: &str = "OPSBOARD_API_URL";
/// Environment variable holding a bearer token to restore
pub const API_TOKEN_ENV: &str = "OPSBOARD_API_TOKEN";

/// Where the backend lives and which token to start with.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL all endpoint paths are appended to, e.g. `http://localhost:3001/api`
    pub base_url: Url,
    /// A previously issued token; it still has to be verified
    pub token: Option<String>,
}

impl ApiConfig {
    /// Creates a new configuration, validating the URL and token.
    pub fn new(url_str: &str, token: Option<String>) -> Result<Self> {
        let base_url = Url::parse(url_str)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "unsupported URL scheme '{}'",
                base_url.scheme()
            )));
        }
        if matches!(token.as_deref(), Some(t) if t.trim().is_empty()) {
            return Err(Error::config("token cannot be empty"));
        }
        Ok(Self { base_url, token })
    }

    /// Reads `OPSBOARD_API_URL` and, optionally, `OPSBOARD_API_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let url_str = std::env::var(API_URL_ENV)
            .map_err(|_| Error::config(format!("{} environment variable not found", API_URL_ENV)))?;
        let token = std::env::var(API_TOKEN_ENV).ok().filter(|t| !t.is_empty());
        Self::new(&url_str, token)
    }

    /// Joins an endpoint path onto the base URL without doubling slashes.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}

/// Tunables for the client and the boards built on it
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// How long a "saved" badge stays visible
    pub saved_badge: Duration,

    /// How long a "failed" badge stays visible
    pub failed_badge: Duration,

    /// Relations requested along with the activity list
    pub activity_includes: Vec<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        let windows = DisplayWindows::default();
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            saved_badge: windows.saved,
            failed_badge: windows.failed,
            activity_includes: vec![
                "responsavel".to_string(),
                "setor".to_string(),
                "projeto".to_string(),
            ],
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set how long the "saved" badge is shown
    pub fn with_saved_badge(mut self, value: Duration) -> Self {
        self.saved_badge = value;
        self
    }

    /// Set how long the "failed" badge is shown
    pub fn with_failed_badge(mut self, value: Duration) -> Self {
        self.failed_badge = value;
        self
    }

    pub fn with_activity_includes(mut self, value: &[&str]) -> Self {
        self.activity_includes = value.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn display_windows(&self) -> DisplayWindows {
        DisplayWindows {
            saved: self.saved_badge,
            failed: self.failed_badge,
        }
    }
}
