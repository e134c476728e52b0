//! Application context - dependency injection container
//!
//! Owns the session store, the refresh coordinator and the API clients, and
//! drives the login, OAuth and logout flows. The in-memory [`Session`] is a
//! cached read of the store; the store stays the source of truth.

mod errors;

use std::sync::Arc;

use chrono::Utc;
use jobportal_common::auth::{RefreshCoordinator, SessionStorage, TokenStore};
use jobportal_common::security::KeychainProvider;
use jobportal_domain::{Config, JobportalError, RegisterRequest, Session, TokenResponse};
use jobportal_infra::api::AccessTokenProvider;
use jobportal_infra::{
    ApiClient, ApiClientFactory, ApiHost, AuthApiClient, HttpClient, LinkedInAuthorizer,
};
use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};

pub use self::errors::SessionError;
use crate::utils::logging::error_label;

/// Application context - holds the session and every client built on it
pub struct AppContext {
    pub config: Config,
    coordinator: Arc<RefreshCoordinator>,
    auth_api: AuthApiClient,
    clients: ApiClientFactory,
    linkedin: Option<LinkedInAuthorizer>,
    session: RwLock<Session>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.config)
            .field("linkedin", &self.linkedin.is_some())
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Wire up the context over `storage`
    ///
    /// Nothing is read from storage until [`init`](Self::init).
    ///
    /// # Errors
    /// Returns `JobportalError::Config` if the HTTP client cannot be built
    pub fn new(config: Config, storage: Arc<dyn SessionStorage>) -> Result<Self, JobportalError> {
        let http = HttpClient::from_config(&config.http)?;
        let auth_api = AuthApiClient::new(http.clone(), config.api.auth_base_url.clone());

        let coordinator = Arc::new(RefreshCoordinator::new(
            TokenStore::new(storage),
            Arc::new(auth_api.clone()),
        ));
        let tokens: Arc<dyn AccessTokenProvider> = coordinator.clone();
        let clients = ApiClientFactory::new(http, config.api.clone(), tokens);
        let linkedin = config.linkedin.clone().map(LinkedInAuthorizer::new);

        info!(
            core = %clients.base_url(ApiHost::Core),
            auth = %clients.base_url(ApiHost::Auth),
            linkedin = linkedin.is_some(),
            "application context created"
        );

        Ok(Self {
            config,
            coordinator,
            auth_api,
            clients,
            linkedin,
            session: RwLock::new(Session::default()),
        })
    }

    /// Context backed by the platform keychain under the configured service.
    ///
    /// # Errors
    /// Same as [`new`](Self::new)
    pub fn with_keychain(config: Config) -> Result<Self, JobportalError> {
        let storage = Arc::new(KeychainProvider::new(config.storage.keychain_service.clone()));
        Self::new(config, storage)
    }

    /// Load configuration from files and environment, store the session in
    /// the platform keychain.
    ///
    /// # Errors
    /// Returns `JobportalError::Config` for an invalid configuration
    pub fn from_environment() -> Result<Self, JobportalError> {
        let config = jobportal_infra::config::load()?;
        Self::with_keychain(config)
    }

    /// Load the persisted session into the cache.
    ///
    /// Returns true when an access token is present. An expired token still
    /// counts: it is refreshed on first use.
    pub fn init(&self) -> bool {
        let session = self.coordinator.store().read();
        let authenticated = session.is_authenticated();
        *self.session.write() = session;

        info!(authenticated, "session loaded");
        authenticated
    }

    /// Email/password login.
    ///
    /// # Errors
    /// `Api` when the credentials are rejected, `Storage` when the session
    /// cannot be persisted
    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, SessionError> {
        let response = self.auth_api.login(email, password).await?;
        self.establish(response, false)
    }

    /// Create an account and sign in.
    ///
    /// # Errors
    /// `Api` when registration is rejected, `Storage` when the session
    /// cannot be persisted
    #[instrument(skip_all)]
    pub async fn register(&self, request: &RegisterRequest) -> Result<Session, SessionError> {
        let response = self.auth_api.register(request).await?;
        self.establish(response, false)
    }

    /// URL that starts LinkedIn sign-in.
    ///
    /// # Errors
    /// `LinkedInNotConfigured` without LinkedIn credentials in the config
    pub fn linkedin_authorization_url(&self) -> Result<String, SessionError> {
        Ok(self.linkedin()?.authorization_url())
    }

    /// Finish LinkedIn sign-in with the code and state from the redirect
    ///
    /// The state is checked before the code is sent anywhere.
    ///
    /// # Errors
    /// `OAuthState` for a missing or foreign state, `Api` when the auth API
    /// rejects the code
    #[instrument(skip_all)]
    pub async fn complete_linkedin_login(
        &self,
        code: &str,
        state: &str,
    ) -> Result<Session, SessionError> {
        let linkedin = self.linkedin()?;
        linkedin.verify_callback(state)?;

        let response = self.auth_api.linkedin_callback(code, linkedin.redirect_uri()).await?;
        self.establish(response, true)
    }

    /// Sign out
    ///
    /// The auth API is told to revoke the refresh token on a best-effort
    /// basis; the local session is cleared whatever it answers.
    ///
    /// # Errors
    /// `Storage` when the persisted session could not be removed
    #[instrument(skip_all)]
    pub async fn logout(&self) -> Result<(), SessionError> {
        let refresh_token = self.coordinator.store().read().refresh_token;
        if let Some(token) = refresh_token.as_deref().filter(|t| !t.is_empty()) {
            if let Err(err) = self.auth_api.logout(token).await {
                warn!(error = %err, "server logout failed, clearing local session anyway");
            }
        }

        self.coordinator.begin_epoch();
        *self.session.write() = Session::default();
        self.coordinator.store().clear()?;

        info!("signed out");
        Ok(())
    }

    /// Client for the core API.
    ///
    /// # Errors
    /// `InvalidInput` if `bootstrap_token` is not a valid header value
    pub fn core_client(&self, bootstrap_token: Option<&str>) -> Result<ApiClient, JobportalError> {
        self.clients.create_client(ApiHost::Core, bootstrap_token)
    }

    /// Client for the auth API.
    ///
    /// # Errors
    /// `InvalidInput` if `bootstrap_token` is not a valid header value
    pub fn auth_client(&self, bootstrap_token: Option<&str>) -> Result<ApiClient, JobportalError> {
        self.clients.create_client(ApiHost::Auth, bootstrap_token)
    }

    /// Cached session as of the last login, logout or re-read.
    #[must_use]
    pub fn session(&self) -> Session {
        self.session.read().clone()
    }

    /// Re-read the store into the cache, e.g. after a background refresh.
    pub fn refresh_cached_session(&self) -> Session {
        let session = self.coordinator.store().read();
        *self.session.write() = session.clone();
        debug!(authenticated = session.is_authenticated(), "cached session re-read");
        session
    }

    /// Refresh coordinator shared by every client this context creates.
    #[must_use]
    pub fn coordinator(&self) -> &Arc<RefreshCoordinator> {
        &self.coordinator
    }

    fn linkedin(&self) -> Result<&LinkedInAuthorizer, SessionError> {
        self.linkedin.as_ref().ok_or(SessionError::LinkedInNotConfigured)
    }

    fn establish(
        &self,
        response: TokenResponse,
        is_linkedin_user: bool,
    ) -> Result<Session, SessionError> {
        let session = response.into_session(Utc::now(), is_linkedin_user);

        self.coordinator.begin_epoch();
        if let Err(err) = self.coordinator.store().write(Some(&session)) {
            let kind = error_label(&JobportalError::from(err.clone()));
            warn!(error_kind = kind, error = %err, "failed to persist session");
            return Err(err.into());
        }
        *self.session.write() = session.clone();

        info!(
            user_id = session.user_id.as_deref().unwrap_or_default(),
            linkedin = is_linkedin_user,
            "session established"
        );
        Ok(session)
    }
}
