//! Typed view over the persisted session keys
//!
//! The store owns the eight session keys listed in
//! [`SESSION_KEYS`](jobportal_domain::constants::SESSION_KEYS). Reads never
//! fail: a backend error or a malformed value reads as "absent", which
//! pushes the caller toward re-authentication.

use std::sync::Arc;

use chrono::Utc;
use jobportal_domain::constants::{
    KEY_ACCESS_TOKEN, KEY_ACCESS_TOKEN_EXPIRATION, KEY_EMAIL, KEY_FIRST_NAME,
    KEY_IS_LINKEDIN_USER, KEY_LAST_NAME, KEY_REFRESH_TOKEN, KEY_USER_ID, SESSION_KEYS,
};
use jobportal_domain::{format_timestamp, parse_timestamp, Session};
use tracing::{debug, warn};

use super::storage::StorageError;
use super::traits::SessionStorage;

/// Session persistence over an injected [`SessionStorage`]
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn SessionStorage>,
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").finish_non_exhaustive()
    }
}

impl TokenStore {
    /// Create a store on top of the given backend.
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// Read every known session field.
    #[must_use]
    pub fn read(&self) -> Session {
        let access_token_expiration = self.get(KEY_ACCESS_TOKEN_EXPIRATION).and_then(|raw| {
            let parsed = parse_timestamp(&raw);
            if parsed.is_none() {
                debug!("stored access token expiration is not a valid timestamp");
            }
            parsed
        });

        Session {
            access_token: self.get(KEY_ACCESS_TOKEN),
            refresh_token: self.get(KEY_REFRESH_TOKEN),
            access_token_expiration,
            user_id: self.get(KEY_USER_ID),
            email: self.get(KEY_EMAIL),
            first_name: self.get(KEY_FIRST_NAME),
            last_name: self.get(KEY_LAST_NAME),
            is_linkedin_user: self.get(KEY_IS_LINKEDIN_USER).and_then(|raw| match raw.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            }),
        }
    }

    /// Persist a session, or remove every session key when `None`.
    ///
    /// Present fields are written and absent fields are removed, so the
    /// stored state always equals the given session. Every key is attempted
    /// even when one fails; the first failure is returned.
    ///
    /// # Errors
    /// Returns the first storage error encountered
    pub fn write(&self, session: Option<&Session>) -> Result<(), StorageError> {
        let Some(session) = session else {
            return self.remove_all();
        };

        let values: [(&str, Option<String>); 8] = [
            (KEY_ACCESS_TOKEN, session.access_token.clone()),
            (KEY_REFRESH_TOKEN, session.refresh_token.clone()),
            (KEY_ACCESS_TOKEN_EXPIRATION, session.access_token_expiration.as_ref().map(format_timestamp)),
            (KEY_USER_ID, session.user_id.clone()),
            (KEY_EMAIL, session.email.clone()),
            (KEY_FIRST_NAME, session.first_name.clone()),
            (KEY_LAST_NAME, session.last_name.clone()),
            (KEY_IS_LINKEDIN_USER, session.is_linkedin_user.map(|flag| flag.to_string())),
        ];

        let mut first_error = None;
        for (key, value) in values {
            let result = match value {
                Some(value) => self.storage.set(key, &value),
                None => self.storage.remove(key),
            };
            if let Err(err) = result {
                warn!(key, error = %err, "failed to persist session field");
                first_error.get_or_insert(err);
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    /// Remove every session key (logout).
    ///
    /// # Errors
    /// Returns the first storage error encountered
    pub fn clear(&self) -> Result<(), StorageError> {
        self.write(None)
    }

    /// Stored access token, if present and not expired.
    #[must_use]
    pub fn valid_access_token(&self) -> Option<String> {
        self.read().valid_access_token(Utc::now()).map(str::to_owned)
    }

    fn get(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "failed to read session field; treating as absent");
                None
            }
        }
    }

    fn remove_all(&self) -> Result<(), StorageError> {
        let mut first_error = None;
        for key in SESSION_KEYS {
            if let Err(err) = self.storage.remove(key) {
                warn!(key, error = %err, "failed to remove session field");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// True if `expiry` is missing, unparseable, or not in the future.
#[must_use]
pub fn is_expired(expiry: Option<&str>) -> bool {
    expiry.and_then(parse_timestamp).map_or(true, |expires_at| expires_at <= Utc::now())
}
