//! Authenticated API clients for the core and auth hosts
//!
//! Every request asks the token provider for a bearer token at send time.
//! A 401 is replayed once: with the stored token if another request already
//! rotated it, otherwise with the result of one shared refresh. A 401 from the
//! refresh endpoint itself is returned as is.

use std::fmt;
use std::sync::Arc;

use jobportal_domain::constants::AUTH_REFRESH_PATH;
use jobportal_domain::{ApiHostsConfig, JobportalError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::auth::AccessTokenProvider;
use super::errors::ApiError;
use crate::http::HttpClient;

/// Backend host a client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiHost {
    /// Core domain API (jobs, profiles, CVs)
    Core,
    /// Authentication API
    Auth,
}

impl fmt::Display for ApiHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Core => f.write_str("core"),
            Self::Auth => f.write_str("auth"),
        }
    }
}

/// Builds [`ApiClient`]s that share one transport and one token provider
#[derive(Clone)]
pub struct ApiClientFactory {
    http: HttpClient,
    hosts: ApiHostsConfig,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl fmt::Debug for ApiClientFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClientFactory").field("hosts", &self.hosts).finish_non_exhaustive()
    }
}

impl ApiClientFactory {
    /// Factory over one transport, the configured hosts and a token provider.
    pub fn new(
        http: HttpClient,
        hosts: ApiHostsConfig,
        tokens: Arc<dyn AccessTokenProvider>,
    ) -> Self {
        Self { http, hosts, tokens }
    }

    /// Base URL configured for `host`, without a trailing slash.
    #[must_use]
    pub fn base_url(&self, host: ApiHost) -> &str {
        let url = match host {
            ApiHost::Core => &self.hosts.core_base_url,
            ApiHost::Auth => &self.hosts.auth_base_url,
        };
        url.trim_end_matches('/')
    }

    /// Create a client for `host`
    ///
    /// `bootstrap_token` is sent as a static `Authorization` header whenever
    /// the token provider has nothing better, e.g. right after login before
    /// the store is populated.
    ///
    /// # Errors
    /// Returns `JobportalError::InvalidInput` if the bootstrap token is not a
    /// valid header value
    pub fn create_client(
        &self,
        host: ApiHost,
        bootstrap_token: Option<&str>,
    ) -> Result<ApiClient, JobportalError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let bootstrap_token = bootstrap_token.filter(|t| !t.is_empty()).map(str::to_string);
        if let Some(token) = bootstrap_token.as_deref() {
            default_headers.insert(AUTHORIZATION, bearer(token)?);
        }

        debug!(%host, bootstrap = bootstrap_token.is_some(), "creating API client");
        Ok(ApiClient {
            http: self.http.clone(),
            base_url: self.base_url(host).to_string(),
            default_headers,
            bootstrap_token,
            tokens: Arc::clone(&self.tokens),
        })
    }
}

/// Client bound to one backend host
///
/// Cheap to clone; clones share the transport and the token provider.
#[derive(Clone)]
pub struct ApiClient {
    http: HttpClient,
    base_url: String,
    default_headers: HeaderMap,
    bootstrap_token: Option<String>,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Host URL that request paths are appended to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute a GET request
    ///
    /// # Errors
    /// Returns the classified error for any non-success response
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.send_json(Method::GET, path, None).await
    }

    /// Execute a POST request with a JSON body
    ///
    /// # Errors
    /// Returns the classified error for any non-success response
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_json(Method::POST, path, Some(to_json(body)?)).await
    }

    /// Execute a PUT request with a JSON body
    ///
    /// # Errors
    /// Returns the classified error for any non-success response
    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_json(Method::PUT, path, Some(to_json(body)?)).await
    }

    /// Execute a DELETE request
    ///
    /// # Errors
    /// Returns the classified error for any non-success response
    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.send_json(Method::DELETE, path, None).await
    }

    /// Send a request through the auth policy and return the raw response
    ///
    /// Non-success statuses are returned, not classified. After a 401 the
    /// request is replayed at most once. A stored token that differs from the
    /// rejected one is reused without refreshing; when no fresh token can be
    /// obtained the original 401 response comes back unchanged.
    ///
    /// # Errors
    /// Only transport failures are errors here
    #[instrument(skip_all, fields(%method, path = %path))]
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let token = self.tokens.access_token(self.bootstrap_token.as_deref()).await;

        let response = self.send_once(method.clone(), &url, body, token.as_deref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }
        if is_refresh_endpoint(&url) {
            debug!("401 from refresh endpoint; not retrying");
            return Ok(response);
        }

        if let Some(stored) = self.tokens.stored_token().filter(|t| Some(t) != token.as_ref()) {
            debug!("401 with a token that was rotated meanwhile; retrying with stored token");
            return self.send_once(method, &url, body, Some(&stored)).await;
        }

        debug!("401 received; forcing token refresh");
        let Some(fresh) = self.tokens.force_refresh().await else {
            warn!("no token after refresh; surfacing 401");
            return Ok(response);
        };

        info!("retrying request with refreshed token");
        self.send_once(method, &url, body, Some(&fresh)).await
    }

    async fn send_json<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<R, ApiError> {
        let response = self.execute(method, path, body.as_ref()).await?;
        decode(response).await
    }

    async fn send_once(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Response, ApiError> {
        let mut headers = self.default_headers.clone();
        if let Some(token) = token {
            headers.insert(AUTHORIZATION, bearer(token)?);
        }

        let mut request = self.http.request(method, url).headers(headers);
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(self.http.send(request).await?)
    }
}

fn bearer(token: &str) -> Result<HeaderValue, JobportalError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| JobportalError::InvalidInput("token is not a valid header value".into()))?;
    value.set_sensitive(true);
    Ok(value)
}

fn is_refresh_endpoint(url: &str) -> bool {
    url::Url::parse(url)
        .map(|parsed| parsed.path().trim_end_matches('/').ends_with(AUTH_REFRESH_PATH))
        .unwrap_or(false)
}

fn to_json<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|e| ApiError::Unknown(format!("Failed to serialize body: {e}")))
}

async fn decode<R: DeserializeOwned>(response: Response) -> Result<R, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::from_response(response).await);
    }

    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Unknown(format!("Failed to read response: {e}")))?;

    // 204/205 and other empty bodies decode as JSON null, so `()` and
    // `Option<T>` work as response types.
    if text.trim().is_empty() {
        return serde_json::from_value(Value::Null).map_err(|_| {
            ApiError::Unknown(format!(
                "Empty response ({}), but response type cannot be deserialized from empty body",
                status.as_u16()
            ))
        });
    }

    serde_json::from_str(&text)
        .map_err(|e| ApiError::Unknown(format!("Failed to parse response: {e}")))
}
