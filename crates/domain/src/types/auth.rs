//! Request and response payloads of the authentication API
//!
//! Field names follow the auth API's camelCase JSON contract.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::session::{parse_timestamp, Session};

/// Token payload returned by login, registration, OAuth callback and refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Absolute expiry as sent by the server (ISO-8601, offset optional)
    #[serde(default)]
    pub access_token_expiration: Option<String>,
    /// Relative lifetime in seconds, used when no absolute expiry is sent
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl TokenResponse {
    /// Absolute expiry of the access token.
    ///
    /// Prefers `accessTokenExpiration`; falls back to `now + expiresIn`.
    /// Returns `None` when neither is usable (including a non-positive or
    /// out-of-range `expiresIn`), which the token store treats as already
    /// expired.
    #[must_use]
    pub fn expiration(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.access_token_expiration.as_deref().and_then(parse_timestamp).or_else(|| {
            self.expires_in
                .filter(|secs| *secs > 0)
                .and_then(Duration::try_seconds)
                .and_then(|lifetime| now.checked_add_signed(lifetime))
        })
    }

    /// Build a fresh session from a login-style response.
    #[must_use]
    pub fn into_session(self, now: DateTime<Utc>, is_linkedin_user: bool) -> Session {
        let access_token_expiration = self.expiration(now);
        Session {
            access_token: Some(self.access_token),
            refresh_token: self.refresh_token,
            access_token_expiration,
            user_id: self.user_id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            is_linkedin_user: Some(is_linkedin_user),
        }
    }

    /// Merge a refresh response into an existing session.
    ///
    /// Tokens and expiry are always replaced. Identity fields and the
    /// refresh token are replaced only when the response carries them.
    #[must_use]
    pub fn merge_into(self, mut session: Session, now: DateTime<Utc>) -> Session {
        session.access_token_expiration = self.expiration(now);
        session.access_token = Some(self.access_token);
        if self.refresh_token.is_some() {
            session.refresh_token = self.refresh_token;
        }
        if self.user_id.is_some() {
            session.user_id = self.user_id;
        }
        if self.email.is_some() {
            session.email = self.email;
        }
        if self.first_name.is_some() {
            session.first_name = self.first_name;
        }
        if self.last_name.is_some() {
            session.last_name = self.last_name;
        }
        session
    }
}

/// Email/password login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// New account registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Authorization code returned by LinkedIn to the redirect URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInCallbackRequest {
    pub code: String,
    pub redirect_uri: String,
}

/// Refresh-token exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// Server-side refresh-token revocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    pub refresh_token: String,
}
