//! Cryptographic functions for ofxvault
//!
//! Provides the password rules, Argon2id key stretching and AES-256-GCM
//! encryption used by the credential store.

pub mod field_cipher;
pub mod key_derivation;
pub mod sealed_key;

pub use field_cipher::{FieldRole, SealedValue};
pub use key_derivation::{
    derive_cipher_key, derive_key, validate_password, DerivedKey, KeyDerivationParams,
    PasswordKey,
};
pub use sealed_key::{unlock, SealedKey, UnlockedKey};
