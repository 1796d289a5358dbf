//! Credential hashing.
//!
//! Credentials are stored as Argon2id PHC strings. Verification of an unknown
//! account runs against a fixed dummy hash so a failed login takes the same
//! time whether or not the email exists. The dummy hash is built by
//! [`prepare`] when a session store is constructed, not on the first failed
//! login.

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};

use crate::error::SessionError;

static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash(&SecretString::from("shopfront-dummy-credential")).ok());

/// Build the dummy hash now if it has not been built yet.
pub(crate) fn prepare() {
    LazyLock::force(&DUMMY_HASH);
}

/// Hash a credential using Argon2id.
pub(crate) fn hash(credential: &SecretString) -> Result<String, SessionError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(credential.expose_secret().as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| SessionError::CredentialHash)
}

/// Verify a credential against a stored hash.
pub(crate) fn verify(credential: &SecretString, hash: &str) -> Result<(), SessionError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| SessionError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(credential.expose_secret().as_bytes(), &parsed_hash)
        .map_err(|_| SessionError::InvalidCredentials)
}

/// Burn one verification for an account that does not exist.
///
/// Always returns `InvalidCredentials`.
pub(crate) fn reject_unknown(credential: &SecretString) -> SessionError {
    if let Some(dummy) = DUMMY_HASH.as_deref() {
        let _ = verify(credential, dummy);
    }
    SessionError::InvalidCredentials
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let credential = SecretString::from("correct horse");
        let stored = hash(&credential).unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(verify(&credential, &stored).is_ok());
    }

    #[test]
    fn test_wrong_credential_rejected() {
        let stored = hash(&SecretString::from("correct horse")).unwrap();
        let result = verify(&SecretString::from("battery staple"), &stored);
        assert!(matches!(result, Err(SessionError::InvalidCredentials)));
    }

    #[test]
    fn test_garbage_hash_is_invalid_credentials() {
        let result = verify(&SecretString::from("anything"), "not-a-phc-string");
        assert!(matches!(result, Err(SessionError::InvalidCredentials)));
    }

    #[test]
    fn test_prepare_builds_a_verifiable_dummy_hash() {
        prepare();
        let dummy = DUMMY_HASH.as_deref().unwrap();
        assert!(PasswordHash::new(dummy).is_ok());
        assert!(verify(&SecretString::from("shopfront-dummy-credential"), dummy).is_ok());
    }

    #[test]
    fn test_reject_unknown() {
        let err = reject_unknown(&SecretString::from("anything"));
        assert!(matches!(err, SessionError::InvalidCredentials));
    }
}
