//! Configuration structures
//!
//! Every section has serde defaults, so a partial TOML/JSON file or a bare
//! environment only needs to name what it overrides.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_AUTH_API_URL, DEFAULT_CORE_API_URL, DEFAULT_HTTP_TIMEOUT_SECS,
    DEFAULT_KEYCHAIN_SERVICE, DEFAULT_USER_AGENT, LINKEDIN_DEFAULT_SCOPES,
};

/// Root application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiHostsConfig,
    pub http: HttpConfig,
    pub storage: StorageConfig,
    pub linkedin: Option<LinkedInConfig>,
}

/// Base URLs of the two backend hosts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiHostsConfig {
    pub core_base_url: String,
    pub auth_base_url: String,
}

impl Default for ApiHostsConfig {
    fn default() -> Self {
        Self {
            core_base_url: DEFAULT_CORE_API_URL.to_string(),
            auth_base_url: DEFAULT_AUTH_API_URL.to_string(),
        }
    }
}

/// Transport settings shared by every client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS, user_agent: DEFAULT_USER_AGENT.to_string() }
    }
}

/// Session storage backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Keychain service name; entries are namespaced under it
    pub keychain_service: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { keychain_service: DEFAULT_KEYCHAIN_SERVICE.to_string() }
    }
}

/// LinkedIn OAuth application registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedInConfig {
    pub client_id: String,
    pub redirect_uri: String,
    #[serde(default = "default_linkedin_scopes")]
    pub scopes: Vec<String>,
}

impl LinkedInConfig {
    /// Create a LinkedIn configuration with the default scopes.
    #[must_use]
    pub fn new(client_id: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            scopes: default_linkedin_scopes(),
        }
    }
}

fn default_linkedin_scopes() -> Vec<String> {
    LINKEDIN_DEFAULT_SCOPES.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_production_hosts() {
        let config = Config::default();
        assert_eq!(config.api.core_base_url, DEFAULT_CORE_API_URL);
        assert_eq!(config.api.auth_base_url, DEFAULT_AUTH_API_URL);
        assert_eq!(config.http.timeout_secs, 30);
        assert!(config.linkedin.is_none());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "api": { "core_base_url": "http://localhost:5000" } }"#)
                .unwrap();
        assert_eq!(config.api.core_base_url, "http://localhost:5000");
        assert_eq!(config.api.auth_base_url, DEFAULT_AUTH_API_URL);
        assert_eq!(config.storage.keychain_service, DEFAULT_KEYCHAIN_SERVICE);
    }

    #[test]
    fn linkedin_scopes_default_when_omitted() {
        let linkedin: LinkedInConfig =
            serde_json::from_str(r#"{ "client_id": "abc", "redirect_uri": "http://x/cb" }"#)
                .unwrap();
        assert_eq!(linkedin.scopes, vec!["openid", "profile", "email"]);
    }
}
