//! Account display formatting
//!
//! Formats accounts for terminal output. Passwords are never shown.

use crate::models::Account;

/// Connection key column entry for one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyCell {
    Key(String),
    /// The site sends no client identifier
    None,
    /// The account's site is no longer in the site configuration
    SiteMissing,
}

impl KeyCell {
    fn text(&self) -> &str {
        match self {
            KeyCell::Key(key) => key,
            KeyCell::None => "-",
            KeyCell::SiteMissing => "** site not found in sites.dat **",
        }
    }
}

/// Format the account list as a numbered table
///
/// `keys`, when given, holds the connection key of each account in the same
/// order and adds a column for it.
pub fn format_account_list(accounts: &[Account], keys: Option<&[KeyCell]>) -> String {
    if accounts.is_empty() {
        return "No accounts found.".to_string();
    }

    let site_width = column_width(accounts.iter().map(|a| a.site.len()), "Site");
    let number_width = column_width(accounts.iter().map(|a| a.account_number.len()), "Account");
    let type_width = column_width(
        accounts
            .iter()
            .map(|a| a.account_type.map(|t| t.tag().len()).unwrap_or(0)),
        "Type",
    );
    let user_width = column_width(accounts.iter().map(|a| a.username.len()), "User");

    let mut output = String::new();
    output.push_str(&format!(
        "{:>3}  {:<site_width$}  {:<number_width$}  {:<type_width$}  {:<user_width$}",
        "#", "Site", "Account", "Type", "User",
    ));
    if keys.is_some() {
        output.push_str("  Connection Key");
    }
    output.push('\n');

    output.push_str(&format!(
        "{:->3}  {:-<site_width$}  {:-<number_width$}  {:-<type_width$}  {:-<user_width$}",
        "", "", "", "", "",
    ));
    if keys.is_some() {
        output.push_str(&format!("  {:-<14}", ""));
    }
    output.push('\n');

    for (index, account) in accounts.iter().enumerate() {
        output.push_str(&format!(
            "{:>3}  {:<site_width$}  {:<number_width$}  {:<type_width$}  {:<user_width$}",
            index + 1,
            account.site,
            account.account_number,
            account.account_type.map(|t| t.tag()).unwrap_or(""),
            account.username,
        ));
        if let Some(keys) = keys {
            let key = keys.get(index).map(KeyCell::text).unwrap_or("-");
            output.push_str(&format!("  {}", key));
        }
        output.push('\n');
    }

    output
}

/// Format a single account's details
pub fn format_account_details(account: &Account) -> String {
    let mut output = String::new();

    output.push_str(&format!("Account: {}\n", account));
    output.push_str(&format!("  Site:           {}\n", account.site));
    output.push_str(&format!("  Number:         {}\n", account.account_number));
    if let Some(account_type) = account.account_type {
        output.push_str(&format!("  Type:           {}\n", account_type));
    }
    output.push_str(&format!("  User:           {}\n", account.username));

    output
}

fn column_width(lengths: impl Iterator<Item = usize>, header: &str) -> usize {
    lengths.max().unwrap_or(0).max(header.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BankAccountType;

    fn accounts() -> Vec<Account> {
        vec![
            Account::new(
                "bank",
                "1234",
                Some(BankAccountType::Checking),
                "joe",
                "hunter2",
            ),
            Account::new("card", "4111", None, "joe", "secret"),
        ]
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_account_list(&[], None), "No accounts found.");
    }

    #[test]
    fn test_list_hides_passwords() {
        let output = format_account_list(&accounts(), None);
        assert!(output.contains("BANK"));
        assert!(output.contains("CHECKING"));
        assert!(output.contains("  2  CARD"));
        assert!(!output.contains("hunter2"));
        assert!(!output.contains("Connection Key"));
    }

    #[test]
    fn test_list_with_keys() {
        let keys = vec![KeyCell::Key("uid-1".to_string()), KeyCell::None];
        let output = format_account_list(&accounts(), Some(&keys));
        assert!(output.contains("Connection Key"));
        assert!(output.contains("uid-1"));
        assert!(output.lines().nth(3).unwrap().ends_with("  -"));
        assert_eq!(output.lines().count(), 4);
    }

    #[test]
    fn test_list_marks_missing_site() {
        let keys = vec![KeyCell::SiteMissing, KeyCell::None];
        let output = format_account_list(&accounts(), Some(&keys));
        let first = output.lines().nth(2).unwrap();
        assert!(first.starts_with("  1  BANK"));
        assert!(first.ends_with("** site not found in sites.dat **"));
    }

    #[test]
    fn test_details() {
        let output = format_account_details(&accounts()[0]);
        assert!(output.starts_with("Account: BANK | 1234\n"));
        assert!(!output.contains("hunter2"));
    }
}
