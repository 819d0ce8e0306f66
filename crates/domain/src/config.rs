//! Configuration management

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_API_URL, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_REALTIME_URL};

/// Client configuration
///
/// Fixed at construction time; the client never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base HTTP origin (e.g., "https://api.topcoin.io")
    pub api_base_url: String,
    /// Base real-time channel origin (e.g., "wss://api.topcoin.io")
    pub realtime_base_url: String,
    /// Transport timeout applied to every HTTP call
    pub timeout_secs: u64,
    /// Optional `User-Agent` header value
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Create a configuration for the given origins with default transport
    /// settings. Trailing `/` characters are trimmed from both origins.
    pub fn new(api_base_url: impl Into<String>, realtime_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: trim_trailing_slash(api_base_url.into()),
            realtime_base_url: trim_trailing_slash(realtime_base_url.into()),
            ..Self::default()
        }
    }

    /// Transport timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Return a copy with trailing `/` trimmed from both origins.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.api_base_url = trim_trailing_slash(self.api_base_url);
        self.realtime_base_url = trim_trailing_slash(self.realtime_base_url);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            realtime_base_url: DEFAULT_REALTIME_URL.to_string(),
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

fn trim_trailing_slash(value: String) -> String {
    match value.trim_end_matches('/') {
        trimmed if trimmed.len() == value.len() => value,
        trimmed => trimmed.to_string(),
    }
}
