//! LinkedIn sign-in: authorization URL and callback state check

use jobportal_common::auth::{OAuthStateError, PendingState};
use jobportal_domain::constants::LINKEDIN_AUTHORIZATION_URL;
use jobportal_domain::LinkedInConfig;
use tracing::{debug, warn};

/// Starts LinkedIn authorization requests and validates their callbacks
#[derive(Debug)]
pub struct LinkedInAuthorizer {
    config: LinkedInConfig,
    pending: PendingState,
}

impl LinkedInAuthorizer {
    /// Authorizer for the LinkedIn app described by `config`.
    pub fn new(config: LinkedInConfig) -> Self {
        Self { config, pending: PendingState::new() }
    }

    /// Redirect URI registered with LinkedIn.
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.config.redirect_uri
    }

    /// Build the URL to send the user to, with a fresh CSRF state.
    ///
    /// Any earlier pending state is replaced.
    pub fn authorization_url(&self) -> String {
        let state = self.pending.issue();
        let scope = self.config.scopes.join(" ");

        debug!(client_id = %self.config.client_id, "issuing LinkedIn authorization URL");
        format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&scope={}&state={}",
            LINKEDIN_AUTHORIZATION_URL,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(&scope),
            urlencoding::encode(&state),
        )
    }

    /// Check the `state` returned on the callback
    ///
    /// Must succeed before the authorization code is exchanged.
    ///
    /// # Errors
    /// `Missing` when no request is outstanding, `Mismatch` for a foreign state
    pub fn verify_callback(&self, state: &str) -> Result<(), OAuthStateError> {
        self.pending.consume(state).inspect_err(|err| {
            warn!(error = %err, "rejecting LinkedIn callback");
        })
    }
}
