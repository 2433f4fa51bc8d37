//! Self-encrypted password key
//!
//! The credential store keeps the password key encrypted under itself.
//! Unlocking decrypts it with a candidate password and accepts the password
//! only if the plaintext equals the candidate's own password key.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::field_cipher::{FieldRole, SealedValue};
use super::key_derivation::{
    derive_cipher_key, derive_key, DerivedKey, KeyDerivationParams, PasswordKey,
};
use crate::error::{VaultError, VaultResult};

/// Password key stored encrypted under itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedKey {
    pub params: KeyDerivationParams,
    pub check: SealedValue,
}

/// A verified key ready to encrypt and decrypt credential fields
pub struct UnlockedKey {
    password_key: PasswordKey,
    cipher_key: DerivedKey,
    params: KeyDerivationParams,
}

impl UnlockedKey {
    /// Set up a key for a new password with a fresh salt
    pub fn create(password: &str) -> VaultResult<Self> {
        Self::create_with_params(password, KeyDerivationParams::new())
    }

    /// Set up a key for a new password with explicit derivation parameters
    pub fn create_with_params(password: &str, params: KeyDerivationParams) -> VaultResult<Self> {
        let password_key = derive_key(password)?;
        let cipher_key = derive_cipher_key(&password_key, &params)?;
        Ok(Self {
            password_key,
            cipher_key,
            params,
        })
    }

    pub fn cipher_key(&self) -> &DerivedKey {
        &self.cipher_key
    }

    /// Encrypt the password key under itself for storage
    pub fn seal(&self) -> VaultResult<SealedKey> {
        Ok(SealedKey {
            params: self.params.clone(),
            check: SealedValue::seal(
                self.password_key.as_bytes(),
                FieldRole::KeyCheck,
                &self.cipher_key,
            )?,
        })
    }
}

impl std::fmt::Debug for UnlockedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnlockedKey")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Verify a candidate password against a sealed key
///
/// Any failure, including a password that breaks the password rules, is an
/// authentication failure.
pub fn unlock(sealed: &SealedKey, candidate_password: &str) -> VaultResult<UnlockedKey> {
    let password_key = derive_key(candidate_password)
        .map_err(|_| VaultError::Authentication("Invalid password".to_string()))?;

    let cipher_key = derive_cipher_key(&password_key, &sealed.params)?;

    let plaintext = sealed.check.open(FieldRole::KeyCheck, &cipher_key).map_err(|e| {
        debug!(error = %e, "Sealed key did not decrypt");
        VaultError::Authentication("Invalid password".to_string())
    })?;

    if plaintext.as_slice() != password_key.as_bytes() {
        return Err(VaultError::Authentication("Invalid password".to_string()));
    }

    Ok(UnlockedKey {
        password_key,
        cipher_key,
        params: sealed.params.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key_derivation::fast_params;

    #[test]
    fn test_unlock_with_right_password() {
        let key = UnlockedKey::create_with_params("secret", fast_params()).unwrap();
        let sealed = key.seal().unwrap();

        let unlocked = unlock(&sealed, "secret").unwrap();
        assert_eq!(unlocked.cipher_key().as_bytes(), key.cipher_key().as_bytes());
    }

    #[test]
    fn test_unlock_with_wrong_password() {
        let sealed = UnlockedKey::create_with_params("secret", fast_params())
            .unwrap()
            .seal()
            .unwrap();

        let err = unlock(&sealed, "guess").unwrap_err();
        assert!(err.is_authentication());
    }

    #[test]
    fn test_password_equal_after_normalisation_unlocks() {
        // "abcd" and "abcdabcdXYZ" both normalise to "abcdabcd"
        let sealed = UnlockedKey::create_with_params("abcd", fast_params())
            .unwrap()
            .seal()
            .unwrap();
        assert!(unlock(&sealed, "abcdabcdXYZ").is_ok());
    }

    #[test]
    fn test_malformed_candidate_is_authentication_failure() {
        let sealed = UnlockedKey::create_with_params("secret", fast_params())
            .unwrap()
            .seal()
            .unwrap();
        assert!(unlock(&sealed, "x").unwrap_err().is_authentication());
    }

    #[test]
    fn test_check_mismatch_is_rejected() {
        let key = UnlockedKey::create_with_params("secret", fast_params()).unwrap();
        let mut sealed = key.seal().unwrap();
        // Valid ciphertext under the right key, but of the wrong plaintext
        sealed.check =
            SealedValue::seal(b"notthekey", FieldRole::KeyCheck, key.cipher_key()).unwrap();

        assert!(unlock(&sealed, "secret").unwrap_err().is_authentication());
    }
}
