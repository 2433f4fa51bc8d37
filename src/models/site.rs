//! Site model
//!
//! A site is one financial institution's connection profile as declared in
//! the site configuration file.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Protocol version assumed when a site does not declare one
pub const DEFAULT_PROTOCOL_VERSION: &str = "102";

/// Statement category a site can serve
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    Signon,
    BankStatement,
    CreditCard,
    Investment,
    /// Any other tag found in `ACCTTYPE`
    Other(String),
}

impl Capability {
    /// Map an upper-cased `ACCTTYPE` value to a capability
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "SIGNON" => Self::Signon,
            "BASTMT" => Self::BankStatement,
            "CCSTMT" => Self::CreditCard,
            "INVSTMT" => Self::Investment,
            other => Self::Other(other.to_string()),
        }
    }

    /// The protocol tag for this capability
    pub fn tag(&self) -> &str {
        match self {
            Self::Signon => "SIGNON",
            Self::BankStatement => "BASTMT",
            Self::CreditCard => "CCSTMT",
            Self::Investment => "INVSTMT",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signon => write!(f, "Signon"),
            Self::BankStatement => write!(f, "Bank"),
            Self::CreditCard => write!(f, "Credit Card"),
            Self::Investment => write!(f, "Investment"),
            Self::Other(tag) => write!(f, "{}", tag),
        }
    }
}

/// A financial institution connection profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Upper-cased site name, unique within a configuration
    pub name: String,

    /// Supported statement categories, always starting with `Signon`
    pub capabilities: Vec<Capability>,

    pub org_name: String,
    /// Financial institution id (FID)
    pub org_id: String,
    pub url: String,
    pub bank_id: String,
    pub broker_id: String,

    /// Protocol version, e.g. "102" or "220"
    pub protocol_version: String,

    pub app_id: String,
    pub app_version: String,

    pub min_poll_interval_days: u32,
    pub time_offset_hours: f64,
    pub request_delay_seconds: f64,

    /// Per-site override of the global skip-zero-transactions option
    pub skip_zero_amount_transactions: Option<bool>,

    pub last_update_date_override: Option<String>,
    pub user_agent_override: Option<String>,
    /// Client identifier fixed in configuration instead of generated
    pub static_client_uid: Option<String>,
}

impl Site {
    /// Create an empty site record seeded with the client defaults
    pub fn new(app_id: impl Into<String>, app_version: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            capabilities: vec![Capability::Signon],
            org_name: String::new(),
            org_id: String::new(),
            url: String::new(),
            bank_id: String::new(),
            broker_id: String::new(),
            protocol_version: DEFAULT_PROTOCOL_VERSION.to_string(),
            app_id: app_id.into(),
            app_version: app_version.into(),
            min_poll_interval_days: 0,
            time_offset_hours: 0.0,
            request_delay_seconds: 0.0,
            skip_zero_amount_transactions: None,
            last_update_date_override: None,
            user_agent_override: None,
            static_client_uid: None,
        }
    }

    /// The statement capability beyond signon, if any
    pub fn statement_type(&self) -> Option<&Capability> {
        self.capabilities
            .iter()
            .find(|cap| **cap != Capability::Signon)
    }

    /// Whether accounts at this site need a bank account type
    pub fn is_bank(&self) -> bool {
        self.capabilities.contains(&Capability::BankStatement)
    }

    /// Whether fields are rendered with closing tags (version 2.x)
    pub fn is_xml(&self) -> bool {
        self.protocol_version.starts_with('2')
    }

    /// Numeric protocol version, 0 when it is not a number
    pub fn version_number(&self) -> u32 {
        self.protocol_version.trim().parse().unwrap_or(0)
    }

    /// Whether a generated client identifier must accompany requests
    pub fn needs_client_uid(&self) -> bool {
        self.version_number() > 102
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_site_defaults() {
        let site = Site::new("QWIN", "2500");
        assert_eq!(site.capabilities, vec![Capability::Signon]);
        assert_eq!(site.protocol_version, "102");
        assert_eq!(site.app_id, "QWIN");
        assert!(site.statement_type().is_none());
        assert!(!site.needs_client_uid());
    }

    #[test]
    fn test_capability_tags() {
        assert_eq!(Capability::from_tag("BASTMT"), Capability::BankStatement);
        assert_eq!(Capability::from_tag("CCSTMT").tag(), "CCSTMT");
        assert_eq!(
            Capability::from_tag("LOANSTMT"),
            Capability::Other("LOANSTMT".into())
        );
    }

    #[test]
    fn test_version_rules() {
        let mut site = Site::new("QWIN", "2500");
        site.protocol_version = "103".into();
        assert!(site.needs_client_uid());
        assert!(!site.is_xml());

        site.protocol_version = "220".into();
        assert!(site.is_xml());

        site.protocol_version = "abc".into();
        assert_eq!(site.version_number(), 0);
    }
}
