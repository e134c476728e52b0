//! CSRF state for the LinkedIn authorization flow
//!
//! A random state value goes out with the authorization redirect and must
//! come back unchanged on the callback. The pending value is single use.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use parking_lot::Mutex;
use rand::RngCore;
use thiserror::Error;

/// Errors raised when validating a callback state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OAuthStateError {
    /// No authorization request is outstanding
    #[error("no authorization request is pending")]
    Missing,

    /// Returned state does not match the one that was issued
    #[error("authorization state mismatch")]
    Mismatch,
}

/// Generate a random state token
///
/// 32 random bytes, URL-safe base64 without padding (43 characters).
#[must_use]
pub fn generate_state() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Compare two state values in constant time.
#[must_use]
pub fn validate_state(expected: &str, actual: &str) -> bool {
    let (expected, actual) = (expected.as_bytes(), actual.as_bytes());
    if expected.len() != actual.len() {
        return false;
    }
    expected.iter().zip(actual).fold(0u8, |acc, (a, b)| acc | (a ^ b)) == 0
}

/// Holds the state of the single outstanding authorization request
#[derive(Debug, Default)]
pub struct PendingState {
    slot: Mutex<Option<String>>,
}

impl PendingState {
    /// Create an empty holder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh state, replacing any earlier one.
    pub fn issue(&self) -> String {
        let state = generate_state();
        *self.slot.lock() = Some(state.clone());
        state
    }

    /// Check the callback state and consume the pending one
    ///
    /// The pending state is dropped even on mismatch, so a failed callback
    /// cannot be retried with a guessed value.
    ///
    /// # Errors
    /// Returns `Missing` when nothing was issued, `Mismatch` when the values
    /// differ
    pub fn consume(&self, actual: &str) -> Result<(), OAuthStateError> {
        let expected = self.slot.lock().take().ok_or(OAuthStateError::Missing)?;
        if validate_state(&expected, actual) {
            Ok(())
        } else {
            Err(OAuthStateError::Mismatch)
        }
    }

    /// True while a state is outstanding.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.slot.lock().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_state_is_url_safe_and_unique() {
        let a = generate_state();
        let b = generate_state();

        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_ne!(a, b);
    }

    #[test]
    fn validate_state_compares_exactly() {
        assert!(validate_state("abc", "abc"));
        assert!(!validate_state("abc", "abd"));
        assert!(!validate_state("abc", "abcd"));
        assert!(!validate_state("abc", ""));
    }

    #[test]
    fn pending_state_is_single_use() {
        let pending = PendingState::new();
        let state = pending.issue();
        assert!(pending.is_pending());

        assert_eq!(pending.consume(&state), Ok(()));
        assert_eq!(pending.consume(&state), Err(OAuthStateError::Missing));
    }

    #[test]
    fn mismatch_discards_pending_state() {
        let pending = PendingState::new();
        let state = pending.issue();

        assert_eq!(pending.consume("forged"), Err(OAuthStateError::Mismatch));
        assert_eq!(pending.consume(&state), Err(OAuthStateError::Missing));
    }

    #[test]
    fn reissue_replaces_previous_state() {
        let pending = PendingState::new();
        let first = pending.issue();
        let second = pending.issue();

        assert_eq!(pending.consume(&first), Err(OAuthStateError::Mismatch));
        assert!(!pending.is_pending());
        let _ = second;
    }
}
