//! Per-field sealing of credential values
//!
//! A sealed value is one base64 string: a fresh 96-bit nonce followed by the
//! AES-256-GCM ciphertext and tag. The role of the field is bound in as
//! associated data, so a sealed user name will not open as a password and
//! the self-check blob will not open as an account field.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

use super::key_derivation::DerivedKey;
use crate::error::{VaultError, VaultResult};

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// What a sealed value holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    AccountNumber,
    Username,
    Password,
    /// The password key sealed under itself
    KeyCheck,
}

impl FieldRole {
    fn associated_data(self) -> &'static [u8] {
        match self {
            FieldRole::AccountNumber => b"ofxvault/account_number",
            FieldRole::Username => b"ofxvault/username",
            FieldRole::Password => b"ofxvault/password",
            FieldRole::KeyCheck => b"ofxvault/pwkey",
        }
    }
}

/// A value sealed under the store key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SealedValue(String);

impl SealedValue {
    /// Seal `plaintext` for the given role with a fresh nonce
    pub fn seal(plaintext: &[u8], role: FieldRole, key: &DerivedKey) -> VaultResult<Self> {
        let mut blob = vec![0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut blob);

        let payload = Payload {
            msg: plaintext,
            aad: role.associated_data(),
        };
        let ciphertext = cipher(key)?
            .encrypt(Nonce::from_slice(&blob), payload)
            .map_err(|_| VaultError::Encryption(format!("Could not seal {:?} field", role)))?;

        blob.extend_from_slice(&ciphertext);
        Ok(Self(STANDARD.encode(blob)))
    }

    /// Open the value, checking it was sealed for `role` under `key`
    pub fn open(&self, role: FieldRole, key: &DerivedKey) -> VaultResult<Vec<u8>> {
        let blob = STANDARD.decode(&self.0).map_err(|e| {
            VaultError::Encryption(format!("Sealed {:?} field is not base64: {}", role, e))
        })?;
        if blob.len() < NONCE_LEN + TAG_LEN {
            return Err(VaultError::Encryption(format!(
                "Sealed {:?} field is truncated ({} bytes)",
                role,
                blob.len()
            )));
        }

        let (nonce, ciphertext) = blob.split_at(NONCE_LEN);
        let payload = Payload {
            msg: ciphertext,
            aad: role.associated_data(),
        };
        cipher(key)?
            .decrypt(Nonce::from_slice(nonce), payload)
            .map_err(|_| VaultError::Encryption(format!("Could not open {:?} field", role)))
    }

    /// Open a text field
    pub fn open_text(&self, role: FieldRole, key: &DerivedKey) -> VaultResult<String> {
        String::from_utf8(self.open(role, key)?)
            .map_err(|_| VaultError::Encryption(format!("Sealed {:?} field is not text", role)))
    }
}

fn cipher(key: &DerivedKey) -> VaultResult<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::Encryption(format!("Bad store key: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key_derivation::{derive_cipher_key, derive_key, fast_params};

    fn store_key(password: &str) -> DerivedKey {
        derive_cipher_key(&derive_key(password).unwrap(), &fast_params()).unwrap()
    }

    #[test]
    fn test_user_name_opens_under_its_own_role() {
        let key = store_key("secret");
        let sealed = SealedValue::seal(b"joe.smith", FieldRole::Username, &key).unwrap();

        assert!(!sealed.0.contains("joe"));
        assert_eq!(sealed.open_text(FieldRole::Username, &key).unwrap(), "joe.smith");
    }

    #[test]
    fn test_user_name_does_not_open_as_password() {
        let key = store_key("secret");
        let sealed = SealedValue::seal(b"joe.smith", FieldRole::Username, &key).unwrap();

        let err = sealed.open(FieldRole::Password, &key).unwrap_err();
        assert!(matches!(err, VaultError::Encryption(_)));
    }

    #[test]
    fn test_shared_password_is_not_visible_on_disk() {
        // Two accounts with the same password must not store equal values
        let key = store_key("secret");
        let first = SealedValue::seal(b"hunter2", FieldRole::Password, &key).unwrap();
        let second = SealedValue::seal(b"hunter2", FieldRole::Password, &key).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_other_store_password_cannot_open() {
        let sealed =
            SealedValue::seal(b"4000-1234", FieldRole::AccountNumber, &store_key("secret")).unwrap();
        assert!(sealed.open(FieldRole::AccountNumber, &store_key("other")).is_err());
    }

    #[test]
    fn test_damaged_values_are_errors() {
        let key = store_key("secret");

        let short = SealedValue(STANDARD.encode([0u8; 20]));
        assert!(matches!(
            short.open(FieldRole::Password, &key),
            Err(VaultError::Encryption(_))
        ));
        assert!(SealedValue("not base64!".to_string())
            .open(FieldRole::Password, &key)
            .is_err());
    }

    #[test]
    fn test_empty_password_layout() {
        let key = store_key("secret");
        let sealed = SealedValue::seal(b"", FieldRole::Password, &key).unwrap();

        assert_eq!(STANDARD.decode(&sealed.0).unwrap().len(), NONCE_LEN + TAG_LEN);
        assert_eq!(sealed.open_text(FieldRole::Password, &key).unwrap(), "");
    }
}
