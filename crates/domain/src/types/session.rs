//! Session state persisted between application runs

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated user session
///
/// Every field is optional: the store only ever holds what the last
/// login, registration, OAuth callback or refresh returned. An empty
/// session (`Session::default()`) means "logged out".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Bearer token sent to the APIs
    pub access_token: Option<String>,
    /// Token exchanged for a new access token
    pub refresh_token: Option<String>,
    /// Absolute access-token expiry (UTC)
    pub access_token_expiration: Option<DateTime<Utc>>,
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Signed in through LinkedIn rather than email/password
    #[serde(rename = "isLinkedInUser")]
    pub is_linkedin_user: Option<bool>,
}

impl Session {
    /// True when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// True when an access token is present, regardless of expiry.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Access token if present and its expiry lies in the future.
    #[must_use]
    pub fn valid_access_token(&self, now: DateTime<Utc>) -> Option<&str> {
        let token = self.access_token.as_deref().filter(|t| !t.is_empty())?;
        match self.access_token_expiration {
            Some(expiry) if expiry > now => Some(token),
            _ => None,
        }
    }

    /// "First Last", falling back to whichever part or the email is known.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(name), None) | (None, Some(name)) => Some(name.to_string()),
            (None, None) => self.email.clone(),
        }
    }
}

/// Parse a persisted or server-supplied timestamp.
///
/// Accepts RFC 3339 (`2025-03-01T10:00:00Z`, `...+01:00`) and offset-less
/// ISO-8601 (`2025-03-01T10:00:00.123`), which is read as UTC. Anything
/// else yields `None`.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok().map(|naive| naive.and_utc())
}

/// Format a timestamp the way it is persisted (RFC 3339, millisecond precision).
#[must_use]
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
