//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Read `.env` from the working directory if present (`dotenvy`)
//! 2. Start from the first config file found by [`find_config_path`], or
//!    from the built-in defaults when there is none
//! 3. Apply `JOBPORTAL_*` environment variables on top
//!
//! ## Environment Variables
//! - `JOBPORTAL_CORE_API_URL`: core API base URL
//! - `JOBPORTAL_AUTH_API_URL`: auth API base URL
//! - `JOBPORTAL_HTTP_TIMEOUT_SECS`: request timeout in seconds
//! - `JOBPORTAL_USER_AGENT`: `User-Agent` header
//! - `JOBPORTAL_KEYCHAIN_SERVICE`: keychain service name for the session
//! - `JOBPORTAL_LINKEDIN_CLIENT_ID` / `JOBPORTAL_LINKEDIN_REDIRECT_URI`:
//!   enable LinkedIn sign-in (both required)
//!
//! ## File Locations
//! The loader searches the following paths (in order):
//! 1. `./jobportal.{json,toml}` and `./config.{json,toml}`
//! 2. The same names in the parent directory
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};

use jobportal_domain::{Config, JobportalError, LinkedInConfig, Result};

use crate::errors::InfraError;

const ENV_CORE_API_URL: &str = "JOBPORTAL_CORE_API_URL";
const ENV_AUTH_API_URL: &str = "JOBPORTAL_AUTH_API_URL";
const ENV_HTTP_TIMEOUT_SECS: &str = "JOBPORTAL_HTTP_TIMEOUT_SECS";
const ENV_USER_AGENT: &str = "JOBPORTAL_USER_AGENT";
const ENV_KEYCHAIN_SERVICE: &str = "JOBPORTAL_KEYCHAIN_SERVICE";
const ENV_LINKEDIN_CLIENT_ID: &str = "JOBPORTAL_LINKEDIN_CLIENT_ID";
const ENV_LINKEDIN_REDIRECT_URI: &str = "JOBPORTAL_LINKEDIN_REDIRECT_URI";

const CONFIG_FILE_NAMES: [&str; 4] =
    ["jobportal.json", "jobportal.toml", "config.json", "config.toml"];

/// Load configuration: optional file, then environment overrides
///
/// # Errors
/// Returns `JobportalError::Config` if a config file is present but
/// invalid, or an environment variable has an invalid value
pub fn load() -> Result<Config> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "loaded .env file");
    }

    let base = match find_config_path() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("no config file found, using defaults");
            Config::default()
        }
    };

    let config = apply_env_overrides(base, |key| std::env::var(key).ok())?;
    tracing::info!(
        core_api = %config.api.core_base_url,
        auth_api = %config.api.auth_base_url,
        linkedin = config.linkedin.is_some(),
        "configuration loaded"
    );
    Ok(config)
}

/// Load configuration from environment variables over the defaults.
///
/// # Errors
/// Returns `JobportalError::Config` if a variable has an invalid value
pub fn load_from_env() -> Result<Config> {
    apply_env_overrides(Config::default(), |key| std::env::var(key).ok())
}

/// Apply `JOBPORTAL_*` overrides read through `lookup`
///
/// Base URLs are validated and stored without a trailing slash.
///
/// # Errors
/// Returns `JobportalError::Config` for an invalid URL or timeout, or when
/// only one of the two LinkedIn variables is set
pub fn apply_env_overrides<F>(mut config: Config, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(url) = lookup(ENV_CORE_API_URL) {
        config.api.core_base_url = normalize_base_url(&url)?;
    }
    if let Some(url) = lookup(ENV_AUTH_API_URL) {
        config.api.auth_base_url = normalize_base_url(&url)?;
    }
    if let Some(raw) = lookup(ENV_HTTP_TIMEOUT_SECS) {
        config.http.timeout_secs = raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| JobportalError::Config(format!("Invalid HTTP timeout: {raw}")))?;
    }
    if let Some(agent) = lookup(ENV_USER_AGENT) {
        config.http.user_agent = agent;
    }
    if let Some(service) = lookup(ENV_KEYCHAIN_SERVICE) {
        config.storage.keychain_service = service;
    }

    match (lookup(ENV_LINKEDIN_CLIENT_ID), lookup(ENV_LINKEDIN_REDIRECT_URI)) {
        (Some(client_id), Some(redirect_uri)) => {
            let scopes = config.linkedin.take().map(|existing| existing.scopes);
            let mut linkedin = LinkedInConfig::new(client_id, redirect_uri);
            if let Some(scopes) = scopes {
                linkedin.scopes = scopes;
            }
            config.linkedin = Some(linkedin);
        }
        (None, None) => {}
        _ => {
            return Err(JobportalError::Config(format!(
                "{ENV_LINKEDIN_CLIENT_ID} and {ENV_LINKEDIN_REDIRECT_URI} must be set together"
            )));
        }
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, searches the standard locations.
///
/// # Errors
/// Returns `JobportalError::Config` if the file is missing or invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(JobportalError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => find_config_path().ok_or_else(|| {
            JobportalError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| JobportalError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    let mut config: Config = match extension {
        "toml" => toml::from_str(contents).map_err(InfraError::from)?,
        "json" => serde_json::from_str(contents).map_err(InfraError::from)?,
        _ => {
            return Err(JobportalError::Config(format!(
                "Unsupported config format: {extension}"
            )))
        }
    };

    config.api.core_base_url = normalize_base_url(&config.api.core_base_url)?;
    config.api.auth_base_url = normalize_base_url(&config.api.auth_base_url)?;
    Ok(config)
}

/// Search the standard locations for a config file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn find_config_path() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.join(".."));
        dirs.insert(0, cwd);
    }

    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = url::Url::parse(trimmed).map_err(InfraError::from)?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(JobportalError::Config(format!("Unsupported URL scheme: {trimmed}")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use jobportal_domain::constants::{DEFAULT_AUTH_API_URL, DEFAULT_CORE_API_URL};
    use tempfile::Builder;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn no_overrides_keeps_defaults() {
        let config = apply_env_overrides(Config::default(), env(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn env_overrides_base_urls_and_http() {
        let config = apply_env_overrides(
            Config::default(),
            env(&[
                (ENV_CORE_API_URL, "http://localhost:5000/"),
                (ENV_AUTH_API_URL, "http://localhost:5001"),
                (ENV_HTTP_TIMEOUT_SECS, "5"),
                (ENV_USER_AGENT, "jobportal-test"),
                (ENV_KEYCHAIN_SERVICE, "Jobportal.test"),
            ]),
        )
        .unwrap();

        assert_eq!(config.api.core_base_url, "http://localhost:5000");
        assert_eq!(config.api.auth_base_url, "http://localhost:5001");
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.user_agent, "jobportal-test");
        assert_eq!(config.storage.keychain_service, "Jobportal.test");
    }

    #[test]
    fn empty_values_are_ignored() {
        let config =
            apply_env_overrides(Config::default(), env(&[(ENV_CORE_API_URL, "  ")])).unwrap();
        assert_eq!(config.api.core_base_url, DEFAULT_CORE_API_URL);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        for pairs in [
            [(ENV_CORE_API_URL, "not a url")],
            [(ENV_AUTH_API_URL, "ftp://auth.example.dk")],
            [(ENV_HTTP_TIMEOUT_SECS, "soon")],
            [(ENV_HTTP_TIMEOUT_SECS, "0")],
        ] {
            let result = apply_env_overrides(Config::default(), env(&pairs));
            assert!(matches!(result, Err(JobportalError::Config(_))), "{pairs:?}");
        }
    }

    #[test]
    fn linkedin_requires_both_variables() {
        let partial = apply_env_overrides(
            Config::default(),
            env(&[(ENV_LINKEDIN_CLIENT_ID, "client-123")]),
        );
        assert!(matches!(partial, Err(JobportalError::Config(_))));

        let config = apply_env_overrides(
            Config::default(),
            env(&[
                (ENV_LINKEDIN_CLIENT_ID, "client-123"),
                (ENV_LINKEDIN_REDIRECT_URI, "https://jobportal.dk/callback"),
            ]),
        )
        .unwrap();
        let linkedin = config.linkedin.unwrap();
        assert_eq!(linkedin.client_id, "client-123");
        assert_eq!(linkedin.scopes, vec!["openid", "profile", "email"]);
    }

    #[test]
    fn load_from_file_toml() {
        let file = write_temp(
            ".toml",
            r#"
[api]
core_base_url = "http://localhost:5000/"

[http]
timeout_secs = 10

[linkedin]
client_id = "abc"
redirect_uri = "http://localhost:3000/callback"
scopes = ["openid"]
"#,
        );

        let config = load_from_file(Some(file.path().to_path_buf())).unwrap();

        assert_eq!(config.api.core_base_url, "http://localhost:5000");
        assert_eq!(config.api.auth_base_url, DEFAULT_AUTH_API_URL);
        assert_eq!(config.http.timeout_secs, 10);
        assert_eq!(config.linkedin.unwrap().scopes, vec!["openid"]);
    }

    #[test]
    fn load_from_file_json() {
        let file = write_temp(".json", r#"{ "storage": { "keychain_service": "Jobportal.dev" } }"#);

        let config = load_from_file(Some(file.path().to_path_buf())).unwrap();

        assert_eq!(config.storage.keychain_service, "Jobportal.dev");
        assert_eq!(config.api.core_base_url, DEFAULT_CORE_API_URL);
    }

    #[test]
    fn load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/jobportal.json")));
        assert!(matches!(result, Err(JobportalError::Config(_))));
    }

    #[test]
    fn invalid_file_contents_are_config_errors() {
        let file = write_temp(".json", r#"{ "api": "#);
        let result = load_from_file(Some(file.path().to_path_buf()));
        assert!(matches!(result, Err(JobportalError::Config(msg)) if msg.contains("JSON")));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let result = parse_config("api: {}", Path::new("jobportal.yaml"));
        assert!(matches!(result, Err(JobportalError::Config(_))));
    }

    #[test]
    fn env_overrides_file_values() {
        let file = write_temp(".toml", "[api]\ncore_base_url = \"http://from-file:1\"\n");
        let base = load_from_file(Some(file.path().to_path_buf())).unwrap();

        let config =
            apply_env_overrides(base, env(&[(ENV_CORE_API_URL, "http://from-env:2")])).unwrap();

        assert_eq!(config.api.core_base_url, "http://from-env:2");
    }
}
