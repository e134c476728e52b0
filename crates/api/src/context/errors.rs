//! Errors surfaced by session lifecycle operations

use jobportal_common::auth::{OAuthStateError, StorageError};
use jobportal_domain::JobportalError;
use jobportal_infra::ApiError;
use thiserror::Error;

/// Failure of a login, registration, OAuth or logout flow
#[derive(Debug, Error)]
pub enum SessionError {
    /// The auth API rejected the request or could not be reached
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("LinkedIn callback rejected: {0}")]
    OAuthState(#[from] OAuthStateError),

    #[error("LinkedIn sign-in is not configured")]
    LinkedInNotConfigured,

    /// The session could not be written to or removed from storage
    #[error("Session storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Setup(#[from] JobportalError),
}

impl SessionError {
    /// True when the user has to sign in again.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        match self {
            Self::Api(err) => err.requires_login(),
            Self::OAuthState(_) => true,
            _ => false,
        }
    }

    /// Message suitable for display to the user (Danish).
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            Self::OAuthState(_) => {
                "LinkedIn-login kunne ikke bekræftes. Prøv at logge ind igen.".to_string()
            }
            Self::LinkedInNotConfigured => "Login med LinkedIn er ikke tilgængeligt.".to_string(),
            Self::Storage(_) | Self::Setup(_) => {
                "Der opstod en uventet fejl. Prøv igen senere.".to_string()
            }
        }
    }
}
