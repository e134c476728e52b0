//! Tracing subscriber setup and structured logging helpers

use jobportal_domain::JobportalError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Output format of the global subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable, one line per event
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    /// `Json` for `"json"` (any case), `Pretty` for everything else.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Install the global tracing subscriber
///
/// The filter comes from `RUST_LOG`, falling back to [`DEFAULT_LOG_FILTER`].
///
/// # Errors
/// Returns `JobportalError::Internal` if a global subscriber is already set
pub fn init_logging(format: LogFormat) -> Result<(), JobportalError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).try_init(),
        LogFormat::Json => registry.with(fmt::layer().json().with_current_span(true)).try_init(),
    };

    result.map_err(|e| JobportalError::Internal(format!("failed to install logger: {e}")))
}

/// Convert a `JobportalError` into a stable label suitable for logging.
#[inline]
#[must_use]
pub const fn error_label(error: &JobportalError) -> &'static str {
    match error {
        JobportalError::Config(_) => "config",
        JobportalError::Storage(_) => "storage",
        JobportalError::Network(_) => "network",
        JobportalError::Auth(_) => "auth",
        JobportalError::InvalidInput(_) => "invalid_input",
        JobportalError::Internal(_) => "internal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_parses_json_case_insensitively() {
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" json "), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse(""), LogFormat::Pretty);
    }

    #[test]
    fn error_labels_are_stable() {
        assert_eq!(error_label(&JobportalError::Storage("x".into())), "storage");
        assert_eq!(error_label(&JobportalError::Auth("x".into())), "auth");
        assert_eq!(error_label(&JobportalError::InvalidInput("x".into())), "invalid_input");
    }

    #[test]
    fn second_init_reports_error() {
        let _ = init_logging(LogFormat::Pretty);
        assert!(matches!(init_logging(LogFormat::Json), Err(JobportalError::Internal(_))));
    }
}
