//! Credential store
//!
//! Persists the account list together with the optional sealed password key
//! and the "fetch quotes" flag. When a password is set, the account number,
//! user name and password of every account are encrypted individually.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::json_file::JsonFile;
use crate::crypto::{unlock, FieldRole, SealedKey, SealedValue, UnlockedKey};
use crate::error::{VaultError, VaultResult};
use crate::models::{Account, BankAccountType};

/// A sensitive account field as stored on disk
///
/// Written as `{"clear": "..."}` or `{"sealed": "<base64>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretField {
    Clear(String),
    Sealed(SealedValue),
}

impl SecretField {
    fn seal(value: &str, role: FieldRole, key: &UnlockedKey) -> VaultResult<Self> {
        SealedValue::seal(value.as_bytes(), role, key.cipher_key()).map(Self::Sealed)
    }

    fn open(&self, role: FieldRole, key: Option<&UnlockedKey>) -> VaultResult<String> {
        match (self, key) {
            (Self::Clear(value), _) => Ok(value.clone()),
            (Self::Sealed(sealed), Some(key)) => sealed.open_text(role, key.cipher_key()),
            (Self::Sealed(_), None) => Err(VaultError::Encryption(
                "Encrypted account field but no password is set".to_string(),
            )),
        }
    }
}

/// An account as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAccount {
    pub site: String,
    pub account_number: SecretField,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<BankAccountType>,
    pub username: SecretField,
    pub password: SecretField,
}

impl StoredAccount {
    fn clear(account: &Account) -> Self {
        Self {
            site: account.site.clone(),
            account_number: SecretField::Clear(account.account_number.clone()),
            account_type: account.account_type,
            username: SecretField::Clear(account.username.clone()),
            password: SecretField::Clear(account.password.clone()),
        }
    }

    fn open(&self, key: Option<&UnlockedKey>) -> VaultResult<Account> {
        Ok(Account {
            site: self.site.clone(),
            account_number: self.account_number.open(FieldRole::AccountNumber, key)?,
            account_type: self.account_type,
            username: self.username.open(FieldRole::Username, key)?,
            password: self.password.open(FieldRole::Password, key)?,
        })
    }
}

/// Encrypt the sensitive fields of every account
pub fn encrypt_accounts(accounts: &[Account], key: &UnlockedKey) -> VaultResult<Vec<StoredAccount>> {
    let mut stored = Vec::with_capacity(accounts.len());
    for account in accounts {
        stored.push(StoredAccount {
            site: account.site.clone(),
            account_number: SecretField::seal(
                &account.account_number,
                FieldRole::AccountNumber,
                key,
            )?,
            account_type: account.account_type,
            username: SecretField::seal(&account.username, FieldRole::Username, key)?,
            password: SecretField::seal(&account.password, FieldRole::Password, key)?,
        });
    }
    Ok(stored)
}

/// Decrypt the sensitive fields of every account
pub fn decrypt_accounts(accounts: &[StoredAccount], key: &UnlockedKey) -> VaultResult<Vec<Account>> {
    accounts.iter().map(|stored| stored.open(Some(key))).collect()
}

/// On-disk layout: sealed key, quotes flag, accounts, in that order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialFile {
    #[serde(default)]
    pub pwkey: Option<SealedKey>,
    #[serde(default)]
    pub get_quotes: bool,
    #[serde(default)]
    pub accounts: Vec<StoredAccount>,
}

impl CredentialFile {
    /// Whether a password is needed to open this file
    pub fn is_encrypted(&self) -> bool {
        self.pwkey.is_some()
    }

    /// Verify the password (when one is set) and decrypt the accounts
    ///
    /// A wrong password is an `Authentication` error and the caller should
    /// stop rather than continue with an unverified key.
    pub fn open(self, password: Option<&str>) -> VaultResult<CredentialState> {
        let key = match (&self.pwkey, password) {
            (Some(sealed), Some(password)) => Some(unlock(sealed, password)?),
            (Some(_), None) => {
                return Err(VaultError::Authentication(
                    "A password is required to open the credential store".to_string(),
                ))
            }
            (None, _) => None,
        };

        let accounts = self
            .accounts
            .iter()
            .map(|stored| stored.open(key.as_ref()))
            .collect::<VaultResult<Vec<_>>>()?;

        Ok(CredentialState {
            key,
            get_quotes: self.get_quotes,
            accounts,
        })
    }
}

/// Decrypted, in-memory credential state
#[derive(Debug, Default)]
pub struct CredentialState {
    /// Present when the store is password protected
    pub key: Option<UnlockedKey>,
    pub get_quotes: bool,
    pub accounts: Vec<Account>,
}

impl CredentialState {
    pub fn is_encrypted(&self) -> bool {
        self.key.is_some()
    }

    /// Sort accounts into their persisted order (site, username, account)
    pub fn sort_accounts(&mut self) {
        self.accounts.sort_by(|a, b| a.storage_order(b));
    }
}

/// Reads and writes the credential file
#[derive(Debug, Clone)]
pub struct CredentialStore {
    file: JsonFile,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }

    /// Read the credential file
    ///
    /// Never fails: an absent file is an empty store, and an unreadable one
    /// is logged and replaced by an empty store.
    pub fn load(&self) -> CredentialFile {
        match self.file.read_or_default::<CredentialFile>() {
            Ok(file) => file,
            Err(e) => {
                warn!(error = %e, "Credential store unreadable, starting empty");
                CredentialFile::default()
            }
        }
    }

    /// Sort and write the credential state, encrypting it when a key is set
    pub fn save(&self, state: &mut CredentialState) -> VaultResult<()> {
        state.sort_accounts();

        let file = match &state.key {
            Some(key) => CredentialFile {
                pwkey: Some(key.seal()?),
                get_quotes: state.get_quotes,
                accounts: encrypt_accounts(&state.accounts, key)?,
            },
            None => CredentialFile {
                pwkey: None,
                get_quotes: state.get_quotes,
                accounts: state.accounts.iter().map(StoredAccount::clear).collect(),
            },
        };

        self.file.replace(&file)?;
        info!(
            accounts = state.accounts.len(),
            encrypted = state.is_encrypted(),
            "Saved credential store"
        );
        Ok(())
    }
}
