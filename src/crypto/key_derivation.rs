//! Password rules and key derivation
//!
//! A password is first normalised into an 8-byte password key (at least
//! three characters, no spaces, repeated and truncated to 8 bytes). That
//! key is then stretched with Argon2id into the 32-byte AES-256 key that
//! actually encrypts data.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2, Params,
};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{VaultError, VaultResult};

/// Length of a normalised password key in bytes
pub const PASSWORD_KEY_LEN: usize = 8;

/// Minimum password length in characters
pub const MIN_PASSWORD_LEN: usize = 3;

/// Parameters for key derivation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDerivationParams {
    /// Salt for key derivation (base64 encoded)
    pub salt: String,
    /// Memory cost in KiB (default: 65536 = 64 MiB)
    pub memory_cost: u32,
    /// Time cost (iterations, default: 3)
    pub time_cost: u32,
    /// Parallelism degree (default: 4)
    pub parallelism: u32,
}

impl Default for KeyDerivationParams {
    fn default() -> Self {
        Self {
            salt: String::new(), // Will be generated on first use
            memory_cost: 65536,  // 64 MiB
            time_cost: 3,
            parallelism: 4,
        }
    }
}

impl KeyDerivationParams {
    /// Create new params with a random salt
    pub fn new() -> Self {
        let salt = SaltString::generate(&mut OsRng);
        Self {
            salt: salt.to_string(),
            ..Default::default()
        }
    }

    /// Create params with specific values
    pub fn with_values(salt: String, memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            salt,
            memory_cost,
            time_cost,
            parallelism,
        }
    }
}

/// The 8-byte key a password normalises to
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PasswordKey([u8; PASSWORD_KEY_LEN]);

impl PasswordKey {
    pub fn as_bytes(&self) -> &[u8; PASSWORD_KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for PasswordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordKey([REDACTED])")
    }
}

/// A derived AES-256 encryption key
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    /// The 32-byte key for AES-256
    key: [u8; 32],
}

impl DerivedKey {
    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.key
    }
}

/// Check the password rules
pub fn validate_password(password: &str) -> VaultResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(VaultError::Validation(format!(
            "Invalid password. Minimum length of {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    if password.contains(' ') {
        return Err(VaultError::Validation(
            "Invalid password. No spaces allowed".to_string(),
        ));
    }
    Ok(())
}

/// Normalise a password into its 8-byte password key
///
/// Trailing whitespace is ignored. The password is repeated until it is at
/// least 8 bytes long and then truncated to exactly 8 bytes.
pub fn derive_key(password: &str) -> VaultResult<PasswordKey> {
    let password = password.trim_end();
    validate_password(password)?;

    let mut key = [0u8; PASSWORD_KEY_LEN];
    for (slot, byte) in key.iter_mut().zip(password.bytes().cycle()) {
        *slot = byte;
    }

    Ok(PasswordKey(key))
}

/// Stretch a password key into an AES-256 key
pub fn derive_cipher_key(
    password_key: &PasswordKey,
    params: &KeyDerivationParams,
) -> VaultResult<DerivedKey> {
    // Parse the salt
    let salt = SaltString::from_b64(&params.salt)
        .map_err(|e| VaultError::Encryption(format!("Invalid salt: {}", e)))?;

    let argon2_params = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(32), // Output length for AES-256
    )
    .map_err(|e| VaultError::Encryption(format!("Invalid Argon2 parameters: {}", e)))?;

    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2_params,
    );

    let hash = argon2
        .hash_password(password_key.as_bytes(), &salt)
        .map_err(|e| VaultError::Encryption(format!("Key derivation failed: {}", e)))?;

    let hash_output = hash
        .hash
        .ok_or_else(|| VaultError::Encryption("No hash output generated".to_string()))?;

    let hash_bytes = hash_output.as_bytes();

    if hash_bytes.len() < 32 {
        return Err(VaultError::Encryption(
            "Hash output too short for AES-256 key".to_string(),
        ));
    }

    let mut key = [0u8; 32];
    key.copy_from_slice(&hash_bytes[..32]);

    Ok(DerivedKey { key })
}

#[cfg(test)]
pub(crate) fn fast_params() -> KeyDerivationParams {
    let salt = SaltString::generate(&mut OsRng);
    KeyDerivationParams::with_values(salt.to_string(), 1024, 1, 1)
}
