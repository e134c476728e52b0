//! Session storage layered on top of `KeychainProvider`
//!
//! Each session key becomes one keychain entry under the provider's service
//! name. A missing entry reads as an absent key.

use crate::auth::storage::StorageError;
use crate::auth::traits::SessionStorage;
use crate::security::{KeychainError, KeychainProvider};

impl From<KeychainError> for StorageError {
    fn from(err: KeychainError) -> Self {
        Self::Access(err.to_string())
    }
}

impl SessionStorage for KeychainProvider {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.get_secret(key) {
            Ok(value) => Ok(Some(value)),
            Err(KeychainError::NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.set_secret(key, value).map_err(StorageError::from)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.delete_secret(key).map_err(StorageError::from)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::TokenStore;
    use crate::security::keychain::use_mock_store;
    use crate::testing::fixtures;

    #[test]
    fn missing_entry_reads_as_none() {
        use_mock_store();
        let keychain = KeychainProvider::new("JobportalTest.session.missing");

        assert_eq!(SessionStorage::get(&keychain, "accessToken"), Ok(None));
    }

    #[test]
    fn removing_missing_entry_is_ok() {
        use_mock_store();
        let keychain = KeychainProvider::new("JobportalTest.session.remove");

        assert_eq!(SessionStorage::remove(&keychain, "refreshToken"), Ok(()));
    }

    #[test]
    fn written_value_is_read_back_through_separate_calls() {
        use_mock_store();
        let keychain = KeychainProvider::new("JobportalTest.session.roundtrip");

        assert_eq!(SessionStorage::set(&keychain, "accessToken", "abc"), Ok(()));

        assert_eq!(SessionStorage::get(&keychain, "accessToken"), Ok(Some("abc".to_string())));
        assert_eq!(SessionStorage::remove(&keychain, "accessToken"), Ok(()));
        assert_eq!(SessionStorage::get(&keychain, "accessToken"), Ok(None));
    }

    #[test]
    fn token_store_session_survives_on_keychain() {
        use_mock_store();
        let keychain = Arc::new(KeychainProvider::new("JobportalTest.session.store"));
        let session = fixtures::valid_session();

        TokenStore::new(keychain.clone()).write(Some(&session)).unwrap();
        let read = TokenStore::new(keychain).read();

        assert_eq!(read.access_token, session.access_token);
        assert_eq!(read.refresh_token, session.refresh_token);
        assert_eq!(read.email, session.email);
        assert_eq!(read.is_linkedin_user, Some(false));
    }

    #[test]
    fn keychain_errors_become_access_errors() {
        let err: StorageError = KeychainError::AccessFailed("locked".into()).into();

        assert!(matches!(err, StorageError::Access(msg) if msg.contains("locked")));
    }
}
