//! Email provider configuration.

use serde::{Deserialize, Serialize};
use url::Url;

/// Resend-compatible provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailerConfig {
    /// Provider API key. Sending fails with a config error while unset.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Endpoint that accepts the send request
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://api.resend.com/emails".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl MailerConfig {
    /// API key with blank values treated as unset.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Whether the provider can be called at all.
    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    /// Check that the endpoint is an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), String> {
        let url = Url::parse(&self.api_url).map_err(|e| format!("invalid api_url: {e}"))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(format!("unsupported api_url scheme: {other}")),
        }
    }
}
