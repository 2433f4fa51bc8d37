//! Encryption CLI commands
//!
//! Provides commands for enabling, disabling, and changing the password
//! that protects the credential store.

use clap::Subcommand;

use super::{open_credentials, read_new_password};
use crate::config::SiteConfig;
use crate::error::VaultResult;
use crate::services::AccountService;
use crate::storage::Storage;

/// Encryption management commands
#[derive(Subcommand)]
pub enum EncryptCommands {
    /// Protect the credential store with a password
    Enable,

    /// Remove the password and store credentials in the clear
    Disable,

    /// Change the password
    #[command(alias = "change-password")]
    Change,

    /// Show encryption status
    Status,
}

/// Handle encryption commands
pub fn handle_encrypt_command(
    storage: &Storage,
    sites: &SiteConfig,
    cmd: EncryptCommands,
) -> VaultResult<()> {
    match cmd {
        EncryptCommands::Enable => enable_encryption(storage, sites),
        EncryptCommands::Disable => disable_encryption(storage, sites),
        EncryptCommands::Change => change_password(storage, sites),
        EncryptCommands::Status => show_status(storage),
    }
}

/// Enable encryption on the credential store
fn enable_encryption(storage: &Storage, sites: &SiteConfig) -> VaultResult<()> {
    if storage.credentials.load().is_encrypted() {
        println!("Encryption is already enabled.");
        println!("Use 'ofxvault encrypt change' to change your password.");
        return Ok(());
    }

    let mut state = open_credentials(storage)?;
    let password = read_new_password()?;

    AccountService::new(&mut state, sites, &storage.client_uids).set_password(&password)?;
    storage.credentials.save(&mut state)?;

    println!("Encryption enabled.");
    println!("There is no way to recover the accounts if the password is lost.");
    Ok(())
}

/// Disable encryption (requires the current password)
fn disable_encryption(storage: &Storage, sites: &SiteConfig) -> VaultResult<()> {
    if !storage.credentials.load().is_encrypted() {
        println!("Encryption is not enabled.");
        return Ok(());
    }

    let mut state = open_credentials(storage)?;
    AccountService::new(&mut state, sites, &storage.client_uids).remove_password();
    storage.credentials.save(&mut state)?;

    println!("Encryption disabled. Credentials are now stored unencrypted.");
    Ok(())
}

/// Change the password (requires the current one)
fn change_password(storage: &Storage, sites: &SiteConfig) -> VaultResult<()> {
    if !storage.credentials.load().is_encrypted() {
        println!("Encryption is not enabled.");
        println!("Use 'ofxvault encrypt enable' to enable encryption first.");
        return Ok(());
    }

    let mut state = open_credentials(storage)?;
    let password = read_new_password()?;

    AccountService::new(&mut state, sites, &storage.client_uids).set_password(&password)?;
    storage.credentials.save(&mut state)?;

    println!("Password changed.");
    Ok(())
}

/// Show encryption status
fn show_status(storage: &Storage) -> VaultResult<()> {
    let file = storage.credentials.load();

    println!("Encryption Status");
    println!("=================");
    println!();

    match &file.pwkey {
        Some(sealed) => {
            println!("Status: ENABLED");
            println!();
            println!("Key Derivation Parameters:");
            println!("  Algorithm: Argon2id");
            println!("  Memory Cost: {} KiB", sealed.params.memory_cost);
            println!("  Time Cost: {} iterations", sealed.params.time_cost);
            println!("  Parallelism: {} threads", sealed.params.parallelism);
        }
        None => {
            println!("Status: DISABLED");
            println!();
            println!("Credentials are stored unencrypted.");
            println!("Run 'ofxvault encrypt enable' to enable encryption.");
        }
    }
    println!("Accounts: {}", file.accounts.len());

    Ok(())
}
