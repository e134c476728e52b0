//! API error classification
//!
//! Every non-success response and every transport failure is folded into
//! [`ApiError`] at the HTTP boundary. Backends report failures as RFC 7807
//! problem details; anything else is read as plain text.

use std::collections::BTreeMap;

use jobportal_domain::JobportalError;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

/// API operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 401 that survived the refresh-and-retry policy
    #[error("Unauthorized")]
    Unauthorized,

    /// 400 with the server's explanation
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found")]
    NotFound,

    /// Any other status, transport failure or undecodable body
    #[error("{0}")]
    Unknown(String),
}

impl ApiError {
    /// Classify a status code and its response body.
    #[must_use]
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::BAD_REQUEST => Self::BadRequest(extract_message(status, body)),
            other => Self::Unknown(format!(
                "HTTP {}: {}",
                other.as_u16(),
                extract_message(other, body)
            )),
        }
    }

    /// Classify a non-success response, consuming its body.
    pub async fn from_response(response: Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Self::from_status(status, &body)
    }

    /// True when the UI should send the user back to the login page.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Message suitable for display to the user (Danish).
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized => "Din session er udløbet. Log venligst ind igen.".to_string(),
            Self::BadRequest(message) if !message.trim().is_empty() => message.clone(),
            Self::BadRequest(_) => "Forespørgslen var ugyldig.".to_string(),
            Self::NotFound => "Det efterspurgte blev ikke fundet.".to_string(),
            Self::Unknown(_) => "Der opstod en uventet fejl. Prøv igen senere.".to_string(),
        }
    }
}

impl From<JobportalError> for ApiError {
    fn from(err: JobportalError) -> Self {
        Self::Unknown(err.to_string())
    }
}

/// RFC 7807 problem details
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProblemDetails {
    /// URI identifying the problem type (`type` on the wire)
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Short summary of the problem type
    #[serde(default)]
    pub title: Option<String>,
    /// HTTP status echoed by the server
    #[serde(default)]
    pub status: Option<u16>,
    /// Explanation specific to this occurrence
    #[serde(default)]
    pub detail: Option<String>,
    /// Validation failures keyed by field
    #[serde(default)]
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ProblemDetails {
    /// Most specific human-readable message: `detail`, then `title`, then the
    /// first validation error.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        let non_empty = |s: &&String| !s.trim().is_empty();
        self.detail
            .as_ref()
            .filter(non_empty)
            .or_else(|| self.title.as_ref().filter(non_empty))
            .or_else(|| self.errors.values().flatten().find(non_empty))
            .cloned()
    }
}

fn extract_message(status: StatusCode, body: &str) -> String {
    if let Some(message) =
        serde_json::from_str::<ProblemDetails>(body).ok().and_then(|problem| problem.message())
    {
        return message;
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status.canonical_reason().unwrap_or("unknown status").to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_status_codes() {
        assert_eq!(ApiError::from_status(StatusCode::UNAUTHORIZED, ""), ApiError::Unauthorized);
        assert_eq!(ApiError::from_status(StatusCode::NOT_FOUND, "gone"), ApiError::NotFound);
        assert!(matches!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, ""),
            ApiError::Unknown(msg) if msg.contains("500")
        ));
    }

    #[test]
    fn bad_request_prefers_detail() {
        let body = r#"{"title":"Validation failed","detail":"Email er allerede i brug","status":400}"#;
        assert_eq!(
            ApiError::from_status(StatusCode::BAD_REQUEST, body),
            ApiError::BadRequest("Email er allerede i brug".into())
        );
    }

    #[test]
    fn bad_request_falls_back_to_title_then_validation_errors() {
        let titled = r#"{"title":"Validation failed"}"#;
        assert_eq!(
            ApiError::from_status(StatusCode::BAD_REQUEST, titled),
            ApiError::BadRequest("Validation failed".into())
        );

        let validation = r#"{"errors":{"Password":["Adgangskoden er for kort"]}}"#;
        assert_eq!(
            ApiError::from_status(StatusCode::BAD_REQUEST, validation),
            ApiError::BadRequest("Adgangskoden er for kort".into())
        );
    }

    #[test]
    fn bad_request_uses_plain_text_body() {
        assert_eq!(
            ApiError::from_status(StatusCode::BAD_REQUEST, "  Ugyldigt input \n"),
            ApiError::BadRequest("Ugyldigt input".into())
        );
        assert_eq!(
            ApiError::from_status(StatusCode::BAD_REQUEST, ""),
            ApiError::BadRequest("Bad Request".into())
        );
    }

    #[test]
    fn only_unauthorized_requires_login() {
        assert!(ApiError::Unauthorized.requires_login());
        assert!(!ApiError::NotFound.requires_login());
        assert!(!ApiError::BadRequest("x".into()).requires_login());
    }

    #[test]
    fn user_messages_are_localised() {
        assert!(ApiError::Unauthorized.user_message().contains("Log"));
        assert_eq!(ApiError::BadRequest("Forkert kode".into()).user_message(), "Forkert kode");
        assert_eq!(ApiError::BadRequest(String::new()).user_message(), "Forespørgslen var ugyldig.");
        assert!(ApiError::Unknown("boom".into()).user_message().starts_with("Der opstod"));
    }

    #[test]
    fn transport_errors_become_unknown() {
        let err: ApiError = JobportalError::Network("HTTP connection failure".into()).into();
        assert!(matches!(err, ApiError::Unknown(msg) if msg.contains("connection")));
    }
}
