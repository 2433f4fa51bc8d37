//! Seam to the transport that downloads statements
//!
//! The transport itself lives outside this crate. Anything that can turn a
//! (site, account) pair into raw statement text can be plugged in here.

use tracing::{info, warn};

use super::validate::validate;
use crate::config::SiteConfig;
use crate::error::VaultResult;
use crate::models::{Account, Site};

/// Downloads the raw statement text for one account
pub trait StatementFetcher {
    fn fetch(&self, site: &Site, account: &Account) -> VaultResult<String>;
}

/// An account whose statement could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub site: String,
    pub reason: String,
}

/// Result of fetching statements for a set of accounts
#[derive(Debug, Default)]
pub struct StatementBatch {
    /// Valid statements, in account order
    pub statements: Vec<String>,
    pub failures: Vec<FetchFailure>,
}

/// Fetch and validate a statement for each account
///
/// Accounts whose site is unknown, whose download fails, or whose statement
/// does not validate are recorded as failures and skipped.
pub fn collect_statements<F: StatementFetcher>(
    fetcher: &F,
    config: &SiteConfig,
    accounts: &[Account],
) -> StatementBatch {
    let mut batch = StatementBatch::default();

    for account in accounts {
        let mut fail = |reason: String| {
            warn!(site = %account.site, %reason, "Statement skipped");
            batch.failures.push(FetchFailure {
                site: account.site.clone(),
                reason,
            });
        };

        let Some(site) = config.site(&account.site) else {
            fail("Site not found in site configuration".to_string());
            continue;
        };

        match fetcher.fetch(site, account) {
            Ok(text) => match validate(&text) {
                None => {
                    info!(site = %account.site, "Statement received");
                    batch.statements.push(text);
                }
                Some(issue) => fail(issue.to_string()),
            },
            Err(e) => fail(e.to_string()),
        }
    }

    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VaultError;
    use crate::ofx::combine::combine_at;
    use std::collections::HashMap;

    struct CannedFetcher {
        responses: HashMap<String, VaultResult<String>>,
    }

    impl StatementFetcher for CannedFetcher {
        fn fetch(&self, _site: &Site, account: &Account) -> VaultResult<String> {
            match self.responses.get(&account.account_number) {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(e)) => Err(VaultError::Io(e.to_string())),
                None => Err(VaultError::account_not_found(&account.account_number)),
            }
        }
    }

    fn config() -> SiteConfig {
        SiteConfig::parse("<SITE>\nSITENAME: bank\nURL: https://ofx.bank.com\n</SITE>")
    }

    #[test]
    fn test_collect_and_combine() {
        let mut responses = HashMap::new();
        responses.insert(
            "1".to_string(),
            Ok("<OFX><BANKMSGSRSV1>A</BANKMSGSRSV1></OFX>".to_string()),
        );
        responses.insert(
            "2".to_string(),
            Ok("<OFX><SEVERITY>ERROR</OFX>".to_string()),
        );
        responses.insert(
            "3".to_string(),
            Err(VaultError::Io("connection reset".to_string())),
        );
        responses.insert(
            "4".to_string(),
            Ok("<OFX><BANKMSGSRSV1>B</BANKMSGSRSV1></OFX>".to_string()),
        );
        let fetcher = CannedFetcher { responses };

        let accounts = vec![
            Account::new("BANK", "1", None, "joe", "pw"),
            Account::new("BANK", "2", None, "joe", "pw"),
            Account::new("BANK", "3", None, "joe", "pw"),
            Account::new("NOWHERE", "9", None, "joe", "pw"),
            Account::new("BANK", "4", None, "joe", "pw"),
        ];

        let batch = collect_statements(&fetcher, &config(), &accounts);
        assert_eq!(batch.statements.len(), 2);
        assert_eq!(batch.failures.len(), 3);
        assert_eq!(batch.failures[2].site, "NOWHERE");

        let doc = combine_at(&batch.statements, "20240101120000").unwrap();
        assert!(doc.contains("<BANKMSGSRSV1>\nA\nB\n</BANKMSGSRSV1>"));
    }
}
