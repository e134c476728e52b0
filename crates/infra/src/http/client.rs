use std::time::Duration;

use jobportal_domain::{HttpConfig, JobportalError};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

use crate::errors::InfraError;

const DEFAULT_MAX_ATTEMPTS: usize = 3;
const DEFAULT_BASE_BACKOFF: Duration = Duration::from_millis(200);

/// Transport shared by every Jobportal client
///
/// Idempotent requests are retried with exponential backoff on 5xx answers
/// and on connect or timeout failures. A `POST` is sent exactly once, so a
/// login or token refresh is never replayed.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    /// Client with the default `[http]` settings.
    ///
    /// # Errors
    /// Returns error if the TLS backend cannot be initialised
    pub fn new() -> Result<Self, JobportalError> {
        Self::from_config(&HttpConfig::default())
    }

    /// Client configured from the `[http]` config section.
    ///
    /// # Errors
    /// Returns error if the TLS backend cannot be initialised
    pub fn from_config(config: &HttpConfig) -> Result<Self, JobportalError> {
        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .no_proxy()
            .build()
            .map_err(|err| JobportalError::from(InfraError::from(err)))?;

        Ok(Self { client, max_attempts: DEFAULT_MAX_ATTEMPTS, base_backoff: DEFAULT_BASE_BACKOFF })
    }

    /// Override the retry budget (`max_attempts` includes the first try).
    #[must_use]
    pub fn with_retries(mut self, max_attempts: usize, base_backoff: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.base_backoff = base_backoff;
        self
    }

    /// Start a request on the underlying client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Send a request, retrying idempotent ones
    ///
    /// Non-success statuses are returned as responses; only transport
    /// failures are errors.
    ///
    /// # Errors
    /// `JobportalError::Network` when the last attempt failed at the
    /// transport level
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, JobportalError> {
        let request = builder.build().map_err(|err| JobportalError::from(InfraError::from(err)))?;
        let attempts = if is_idempotent(request.method()) { self.max_attempts } else { 1 };

        let mut attempt = 1;
        loop {
            let current = request.try_clone().ok_or_else(|| {
                JobportalError::Internal("streaming request bodies cannot be sent".into())
            })?;
            debug!(attempt, method = %request.method(), url = %request.url(), "sending request");

            match self.client.execute(current).await {
                Ok(response) if response.status().is_server_error() && attempt < attempts => {
                    debug!(attempt, status = %response.status(), "server error, retrying");
                }
                Ok(response) => return Ok(response),
                Err(err) if attempt < attempts && (err.is_connect() || err.is_timeout()) => {
                    debug!(attempt, error = %err, "transport error, retrying");
                }
                Err(err) => return Err(InfraError::from(err).into()),
            }

            tokio::time::sleep(self.backoff(attempt)).await;
            attempt += 1;
        }
    }

    fn backoff(&self, attempt: usize) -> Duration {
        let exponent = u32::try_from(attempt.saturating_sub(1).min(6)).unwrap_or(6);
        self.base_backoff.saturating_mul(1 << exponent)
    }
}

fn is_idempotent(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::PUT | Method::DELETE | Method::OPTIONS)
}
