//! Authentication API client and token provider seam
//!
//! [`AuthApiClient`] talks to the auth host directly through the shared
//! [`HttpClient`]. It never goes through the 401 interceptor, so a rejected
//! refresh cannot trigger another refresh.

use async_trait::async_trait;
use jobportal_common::auth::{RefreshBackend, RefreshCoordinator};
use jobportal_domain::constants::{
    AUTH_LINKEDIN_CALLBACK_PATH, AUTH_LOGIN_PATH, AUTH_LOGOUT_PATH, AUTH_REFRESH_PATH,
    AUTH_REGISTER_PATH,
};
use jobportal_domain::{
    JobportalError, LinkedInCallbackRequest, LoginRequest, LogoutRequest, RefreshRequest,
    RegisterRequest, TokenResponse,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::errors::ApiError;
use crate::http::HttpClient;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Token to attach to the next request, refreshing if needed.
    async fn access_token(&self, bootstrap_token: Option<&str>) -> Option<String>;

    /// Token after the server rejected the current one.
    async fn force_refresh(&self) -> Option<String>;

    /// Currently stored, unexpired token, without refreshing.
    fn stored_token(&self) -> Option<String> {
        None
    }
}

#[async_trait]
impl AccessTokenProvider for RefreshCoordinator {
    async fn access_token(&self, bootstrap_token: Option<&str>) -> Option<String> {
        self.get_or_refresh_token(bootstrap_token).await
    }

    async fn force_refresh(&self) -> Option<String> {
        Self::force_refresh(self).await
    }

    fn stored_token(&self) -> Option<String> {
        self.store().valid_access_token()
    }
}

/// Typed client for the authentication host
#[derive(Debug, Clone)]
pub struct AuthApiClient {
    http: HttpClient,
    base_url: String,
}

impl AuthApiClient {
    /// Create a client for the auth host at `base_url`.
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Email/password login.
    ///
    /// # Errors
    /// `BadRequest` for rejected credentials, `Unknown` for transport failures
    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let request = LoginRequest { email: email.to_string(), password: password.to_string() };
        self.post_json(AUTH_LOGIN_PATH, &request).await
    }

    /// Create an account and sign in.
    ///
    /// # Errors
    /// `BadRequest` when the server rejects the registration
    #[instrument(skip_all)]
    pub async fn register(&self, request: &RegisterRequest) -> Result<TokenResponse, ApiError> {
        self.post_json(AUTH_REGISTER_PATH, request).await
    }

    /// Exchange a LinkedIn authorization code for a session.
    ///
    /// # Errors
    /// `BadRequest` for an invalid or reused code
    #[instrument(skip_all)]
    pub async fn linkedin_callback(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse, ApiError> {
        let request = LinkedInCallbackRequest {
            code: code.to_string(),
            redirect_uri: redirect_uri.to_string(),
        };
        self.post_json(AUTH_LINKEDIN_CALLBACK_PATH, &request).await
    }

    /// Exchange a refresh token for a new token set.
    ///
    /// # Errors
    /// `Unauthorized` or `BadRequest` when the refresh token is rejected
    #[instrument(skip_all)]
    pub async fn refresh_token(
        &self,
        refresh_token: &str,
        access_token: Option<&str>,
    ) -> Result<TokenResponse, ApiError> {
        let request = RefreshRequest {
            refresh_token: refresh_token.to_string(),
            access_token: access_token.map(str::to_string),
        };
        self.post_json(AUTH_REFRESH_PATH, &request).await
    }

    /// Revoke a refresh token on the server.
    ///
    /// # Errors
    /// Returns the classified error when the server refuses
    #[instrument(skip_all)]
    pub async fn logout(&self, refresh_token: &str) -> Result<(), ApiError> {
        let request = LogoutRequest { refresh_token: refresh_token.to_string() };
        let response = self.send(AUTH_LOGOUT_PATH, &request).await?;
        if response.status().is_success() {
            info!("refresh token revoked");
            Ok(())
        } else {
            Err(ApiError::from_response(response).await)
        }
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.send(path, body).await?;
        let status = response.status();
        if !status.is_success() {
            debug!(path, %status, "auth request rejected");
            return Err(ApiError::from_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Unknown(format!("Failed to parse response: {e}")))
    }

    async fn send<B>(&self, path: &str, body: &B) -> Result<reqwest::Response, ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "auth request");
        let request = self.http.request(Method::POST, &url).json(body);
        Ok(self.http.send(request).await?)
    }
}

#[async_trait]
impl RefreshBackend for AuthApiClient {
    async fn refresh(&self, request: RefreshRequest) -> Result<TokenResponse, JobportalError> {
        self.refresh_token(&request.refresh_token, request.access_token.as_deref())
            .await
            .map_err(|err| JobportalError::Auth(format!("token refresh failed: {err}")))
    }
}
