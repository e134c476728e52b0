//! Conversions from external infrastructure errors into domain errors.

use jobportal_domain::JobportalError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub JobportalError);

impl From<InfraError> for JobportalError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<JobportalError> for InfraError {
    fn from(value: JobportalError) -> Self {
        Self(value)
    }
}

trait IntoJobportalError {
    fn into_jobportal(self) -> JobportalError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → JobportalError */
/* -------------------------------------------------------------------------- */

impl IntoJobportalError for HttpError {
    fn into_jobportal(self) -> JobportalError {
        if self.is_timeout() {
            return JobportalError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return JobportalError::Network("HTTP connection failure".into());
        }

        if self.is_builder() {
            return JobportalError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        if self.is_decode() {
            return JobportalError::Network(format!("malformed HTTP response: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => JobportalError::Auth(message),
                400..=499 => JobportalError::InvalidInput(message),
                _ => JobportalError::Network(message),
            };
        }

        JobportalError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_jobportal())
    }
}

/* -------------------------------------------------------------------------- */
/* Configuration parsing → JobportalError */
/* -------------------------------------------------------------------------- */

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        Self(JobportalError::Config(format!("Invalid TOML format: {value}")))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        Self(JobportalError::Config(format!("Invalid JSON format: {value}")))
    }
}

impl From<url::ParseError> for InfraError {
    fn from(value: url::ParseError) -> Self {
        Self(JobportalError::Config(format!("Invalid URL: {value}")))
    }
}
