//! Session fixtures

use chrono::{Duration, Utc};
use jobportal_domain::{format_timestamp, Session, TokenResponse};

/// Fully populated session whose access token is valid for another hour.
#[must_use]
pub fn valid_session() -> Session {
    Session {
        access_token: Some("access-valid".to_string()),
        refresh_token: Some("refresh-valid".to_string()),
        access_token_expiration: Some(Utc::now() + Duration::hours(1)),
        user_id: Some("user-42".to_string()),
        email: Some("karen@example.dk".to_string()),
        first_name: Some("Karen".to_string()),
        last_name: Some("Jensen".to_string()),
        is_linkedin_user: Some(false),
    }
}

/// Same session with an access token that expired a minute ago.
#[must_use]
pub fn expired_session() -> Session {
    Session {
        access_token: Some("access-expired".to_string()),
        access_token_expiration: Some(Utc::now() - Duration::minutes(1)),
        ..valid_session()
    }
}

/// Refresh response carrying `access_token`, valid for an hour, with a
/// rotated refresh token.
#[must_use]
pub fn token_response(access_token: &str) -> TokenResponse {
    TokenResponse {
        access_token: access_token.to_string(),
        refresh_token: Some(format!("{access_token}-refresh")),
        access_token_expiration: Some(format_timestamp(&(Utc::now() + Duration::hours(1)))),
        ..TokenResponse::default()
    }
}
