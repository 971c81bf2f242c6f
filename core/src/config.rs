//! Client configuration.

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://api.bit.ly";
pub const DEFAULT_API_VERSION: u32 = 3;
pub const DEFAULT_USER_AGENT: &str = concat!("bitly-core/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where and how the client talks to the service.
///
/// Fixed for the lifetime of a `BitlyClient`; there is no per-call override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_version: u32,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_version(mut self, api_version: u32) -> Self {
        self.api_version = api_version;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `<base-url>/v<version>/<action>`
    pub fn endpoint(&self, action: &str) -> String {
        format!("{}/v{}/{}", self.base_url, self.api_version, action)
    }
}
