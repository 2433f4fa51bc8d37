//! Account service
//!
//! Business logic for the account list: adding and replacing profiles,
//! deleting them, resetting their connection identifiers and managing the
//! store password.

use tracing::info;

use crate::config::SiteConfig;
use crate::crypto::{KeyDerivationParams, UnlockedKey};
use crate::error::{VaultError, VaultResult};
use crate::models::{Account, Site};
use crate::storage::{ClientUidRegistry, CredentialState, JsonUidStore, UidStore};

/// Service for account management
pub struct AccountService<'a, S: UidStore = JsonUidStore> {
    state: &'a mut CredentialState,
    sites: &'a SiteConfig,
    client_uids: &'a ClientUidRegistry<S>,
}

impl<'a, S: UidStore> AccountService<'a, S> {
    /// Create a new account service; the account list is kept sorted
    pub fn new(
        state: &'a mut CredentialState,
        sites: &'a SiteConfig,
        client_uids: &'a ClientUidRegistry<S>,
    ) -> Self {
        state.sort_accounts();
        Self {
            state,
            sites,
            client_uids,
        }
    }

    /// Add an account, replacing any with the same (site, account number)
    ///
    /// Returns true when an existing account was replaced.
    pub fn upsert(&mut self, mut account: Account) -> VaultResult<bool> {
        account
            .validate()
            .map_err(|e| VaultError::Validation(e.to_string()))?;

        let site = self.site(&account.site)?;
        if site.is_bank() {
            if account.account_type.is_none() {
                return Err(VaultError::Validation(format!(
                    "Site {} requires a bank account type",
                    site.name
                )));
            }
        } else {
            account.account_type = None;
        }

        let replaced = match self.state.accounts.iter_mut().find(|a| a.same_key(&account)) {
            Some(existing) => {
                *existing = account;
                true
            }
            None => {
                self.state.accounts.push(account);
                false
            }
        };
        self.state.sort_accounts();

        info!(replaced, "Saved account");
        Ok(replaced)
    }

    /// All accounts, sorted by site, username and account number
    pub fn list(&self) -> &[Account] {
        &self.state.accounts
    }

    /// Account at a zero-based position in `list`
    pub fn get(&self, index: usize) -> VaultResult<&Account> {
        self.state
            .accounts
            .get(index)
            .ok_or_else(|| VaultError::account_not_found(format!("#{}", index + 1)))
    }

    /// Delete the account at `index`
    ///
    /// Its client identifier is dropped when no remaining account uses the
    /// same site and user name.
    pub fn delete(&mut self, index: usize) -> VaultResult<Account> {
        self.get(index)?;
        let account = self.state.accounts.remove(index);
        info!(site = %account.site, "Deleted account");

        self.release_client_uid(&account)?;
        Ok(account)
    }

    /// Forget the client identifier of the account at `index`
    ///
    /// The identifier is kept while another account shares the same site and
    /// user name. Returns whether an identifier was removed.
    pub fn reset_connection(&mut self, index: usize) -> VaultResult<bool> {
        let account = self.get(index)?.clone();
        let shared = self
            .state
            .accounts
            .iter()
            .enumerate()
            .any(|(i, a)| i != index && a.site == account.site && a.username == account.username);
        if shared {
            return Ok(false);
        }

        let removed = match self.sites.site(&account.site) {
            Some(site) => self.client_uids.delete(&site.url, &account.username)?,
            None => false,
        };
        if removed {
            info!(site = %account.site, "Connection settings reset");
        }
        Ok(removed)
    }

    /// Identifier sent with requests for `account`, if its site needs one
    ///
    /// A static identifier from the site configuration wins. Otherwise sites
    /// on protocol versions above 102 get a generated one from the registry.
    pub fn connection_key(&self, account: &Account) -> VaultResult<Option<String>> {
        let site = self.site(&account.site)?;

        if let Some(uid) = &site.static_client_uid {
            return Ok(Some(uid.clone()));
        }
        if site.needs_client_uid() {
            return self
                .client_uids
                .get_or_create(&site.url, &account.username)
                .map(Some);
        }
        Ok(None)
    }

    /// Protect the store with a new password
    pub fn set_password(&mut self, password: &str) -> VaultResult<()> {
        self.set_password_with_params(password, KeyDerivationParams::new())
    }

    /// Protect the store with a new password and explicit derivation parameters
    pub fn set_password_with_params(
        &mut self,
        password: &str,
        params: KeyDerivationParams,
    ) -> VaultResult<()> {
        self.state.key = Some(UnlockedKey::create_with_params(password, params)?);
        info!("Password protection enabled");
        Ok(())
    }

    /// Store credentials in the clear from now on
    ///
    /// Returns whether a password was set.
    pub fn remove_password(&mut self) -> bool {
        let had_key = self.state.key.take().is_some();
        if had_key {
            info!("Password protection removed");
        }
        had_key
    }

    /// Enable or disable quote downloads
    pub fn set_quotes(&mut self, enabled: bool) {
        self.state.get_quotes = enabled;
    }

    /// Flip the quote download flag, returning the new value
    pub fn toggle_quotes(&mut self) -> bool {
        self.state.get_quotes = !self.state.get_quotes;
        self.state.get_quotes
    }

    fn site(&self, name: &str) -> VaultResult<&'a Site> {
        self.sites
            .site(name)
            .ok_or_else(|| VaultError::site_not_found(name.to_uppercase()))
    }

    fn release_client_uid(&self, removed: &Account) -> VaultResult<()> {
        let still_used = self
            .state
            .accounts
            .iter()
            .any(|a| a.site == removed.site && a.username == removed.username);
        if still_used {
            return Ok(());
        }

        if let Some(site) = self.sites.site(&removed.site) {
            self.client_uids.delete(&site.url, &removed.username)?;
        }
        Ok(())
    }
}
