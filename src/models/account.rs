//! Account model
//!
//! An account binds one user's credentials to a site plus an account
//! number. Accounts are unique on (site, account number).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Bank account kind, only meaningful for bank-statement sites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BankAccountType {
    Checking,
    Savings,
    #[serde(rename = "MONEYMRKT")]
    MoneyMarket,
    #[serde(rename = "CREDITLINE")]
    CreditLine,
}

impl BankAccountType {
    pub const ALL: [BankAccountType; 4] = [
        Self::Checking,
        Self::Savings,
        Self::MoneyMarket,
        Self::CreditLine,
    ];

    /// Protocol tag for this account type
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Checking => "CHECKING",
            Self::Savings => "SAVINGS",
            Self::MoneyMarket => "MONEYMRKT",
            Self::CreditLine => "CREDITLINE",
        }
    }

    /// Parse account type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "CHECKING" => Some(Self::Checking),
            "SAVINGS" => Some(Self::Savings),
            "MONEYMRKT" | "MONEYMARKET" => Some(Self::MoneyMarket),
            "CREDITLINE" => Some(Self::CreditLine),
            _ => None,
        }
    }
}

impl fmt::Display for BankAccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// A connection profile for one account at one site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Upper-cased site name
    pub site: String,
    pub account_number: String,
    /// Set only for accounts at bank-statement sites
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<BankAccountType>,
    pub username: String,
    pub password: String,
}

impl Account {
    pub fn new(
        site: impl Into<String>,
        account_number: impl Into<String>,
        account_type: Option<BankAccountType>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            site: site.into().to_uppercase(),
            account_number: account_number.into(),
            account_type,
            username: username.into(),
            password: password.into(),
        }
    }

    /// Whether this account has the same (site, account number) key
    pub fn same_key(&self, other: &Account) -> bool {
        self.site == other.site && self.account_number == other.account_number
    }

    /// Persisted ordering: site, then username, then account number
    pub fn storage_order(&self, other: &Account) -> Ordering {
        self.site
            .cmp(&other.site)
            .then_with(|| self.username.cmp(&other.username))
            .then_with(|| self.account_number.cmp(&other.account_number))
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.site.trim().is_empty() {
            return Err(AccountValidationError::EmptySite);
        }
        if self.account_number.trim().is_empty() {
            return Err(AccountValidationError::EmptyAccountNumber);
        }
        if self.username.is_empty() {
            return Err(AccountValidationError::EmptyUsername);
        }
        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.site, self.account_number)
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptySite,
    EmptyAccountNumber,
    EmptyUsername,
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySite => write!(f, "Site name cannot be empty"),
            Self::EmptyAccountNumber => write!(f, "Account number cannot be empty"),
            Self::EmptyUsername => write!(f, "User name cannot be empty"),
        }
    }
}

impl std::error::Error for AccountValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uppercases_site() {
        let account = Account::new("citi", "1234", None, "joe", "pw");
        assert_eq!(account.site, "CITI");
        assert!(account.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let account = Account::new("CITI", " ", None, "joe", "pw");
        assert_eq!(
            account.validate(),
            Err(AccountValidationError::EmptyAccountNumber)
        );

        let account = Account::new("CITI", "1", None, "", "pw");
        assert_eq!(account.validate(), Err(AccountValidationError::EmptyUsername));
    }

    #[test]
    fn test_storage_order() {
        let mut accounts = vec![
            Account::new("VANGUARD", "1", None, "amy", "x"),
            Account::new("CITI", "9", None, "zed", "x"),
            Account::new("CITI", "2", None, "amy", "x"),
            Account::new("CITI", "1", None, "amy", "x"),
        ];
        accounts.sort_by(|a, b| a.storage_order(b));

        let keys: Vec<_> = accounts
            .iter()
            .map(|a| (a.site.as_str(), a.username.as_str(), a.account_number.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("CITI", "amy", "1"),
                ("CITI", "amy", "2"),
                ("CITI", "zed", "9"),
                ("VANGUARD", "amy", "1"),
            ]
        );
    }

    #[test]
    fn test_bank_type_serde() {
        let json = serde_json::to_string(&BankAccountType::MoneyMarket).unwrap();
        assert_eq!(json, "\"MONEYMRKT\"");
        assert_eq!(BankAccountType::parse("savings"), Some(BankAccountType::Savings));
    }
}
