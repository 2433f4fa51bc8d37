//! Custom error types for ofxvault
//!
//! This module defines the error hierarchy for the library using thiserror.
//! Low-level I/O and decode failures are folded into one of these kinds
//! before they reach a caller.

use thiserror::Error;

/// The main error type for ofxvault operations
#[derive(Error, Debug)]
pub enum VaultError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// A single record failed its local grammar
    #[error("Malformed {context}: {message}")]
    MalformedInput { context: String, message: String },

    /// A persisted store exists but cannot be deserialized
    #[error("Unreadable store {file}: {message}")]
    PersistenceUnreadable { file: String, message: String },

    /// The supplied password does not unlock the credential store
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// A statement carries error, denial or missing-section markers
    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Encryption errors
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl VaultError {
    /// Create a "not found" error for accounts
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for sites
    pub fn site_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Site",
            identifier: identifier.into(),
        }
    }

    /// Create an error for a record dropped by its local grammar
    pub fn malformed(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an authentication failure
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    /// Check if this is a dropped-record error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedInput { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for ofxvault operations
pub type VaultResult<T> = Result<T, VaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VaultError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = VaultError::site_not_found("CITI");
        assert_eq!(err.to_string(), "Site not found: CITI");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_unreadable_store_error() {
        let err = VaultError::PersistenceUnreadable {
            file: "connect.key.json".into(),
            message: "expected value".into(),
        };
        assert_eq!(
            err.to_string(),
            "Unreadable store connect.key.json: expected value"
        );
    }

    #[test]
    fn test_malformed_input_error() {
        let err = VaultError::malformed("site field MININTERVAL", "'soon' is not a number");
        assert_eq!(
            err.to_string(),
            "Malformed site field MININTERVAL: 'soon' is not a number"
        );
        assert!(err.is_malformed());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let vault_err: VaultError = json_err.into();
        assert!(matches!(vault_err, VaultError::Json(_)));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let vault_err: VaultError = io_err.into();
        assert!(matches!(vault_err, VaultError::Io(_)));
    }
}
