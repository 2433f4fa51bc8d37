//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod encrypt;
pub mod quotes;
pub mod site;
pub mod statement;

pub use account::{handle_account_command, AccountCommands};
pub use encrypt::{handle_encrypt_command, EncryptCommands};
pub use quotes::{handle_quotes_command, QuotesCommands};
pub use site::{show_config, show_sites};
pub use statement::{combine_statements, validate_statement};

use crate::crypto::validate_password;
use crate::error::{VaultError, VaultResult};
use crate::storage::{CredentialState, Storage};

/// Environment variable holding the current store password
pub const PASSWORD_ENV: &str = "OFXVAULT_PASSWORD";

/// Environment variable holding a new store password
pub const NEW_PASSWORD_ENV: &str = "OFXVAULT_NEW_PASSWORD";

/// Load and open the credential store, asking for the password if it is set
pub fn open_credentials(storage: &Storage) -> VaultResult<CredentialState> {
    let file = storage.credentials.load();
    if !file.is_encrypted() {
        return file.open(None);
    }

    let password = read_password("Enter password: ")?;
    file.open(Some(&password))
}

/// Read the current password from the environment or a hidden prompt
pub fn read_password(prompt: &str) -> VaultResult<String> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(password);
    }
    prompt_hidden(prompt)
}

/// Read a new password, prompting twice until both entries match
pub fn read_new_password() -> VaultResult<String> {
    if let Ok(password) = std::env::var(NEW_PASSWORD_ENV) {
        validate_password(password.trim_end())?;
        return Ok(password);
    }

    loop {
        let first = prompt_hidden("Enter NEW password: ")?;
        if let Err(e) = validate_password(first.trim_end()) {
            println!("{}", e);
            continue;
        }

        let second = prompt_hidden("Re-enter password: ")?;
        if first != second {
            println!("Passwords do not match. Try again...");
            continue;
        }

        return Ok(first);
    }
}

fn prompt_hidden(prompt: &str) -> VaultResult<String> {
    rpassword::prompt_password(prompt)
        .map_err(|e| VaultError::Io(format!("Failed to read password: {}", e)))
}
