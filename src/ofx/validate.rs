//! Structural sanity checks for a single downloaded statement
//!
//! Markers are matched ignoring case and whitespace. A finding is a
//! diagnostic; the caller decides whether it is fatal for that statement.

use std::fmt;

use crate::error::VaultError;

/// Why a statement looks unusable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementIssue {
    /// Nothing was received
    Empty,
    /// No header, no opening root tag and no closing root tag
    NotAStatement,
    /// The server reported an error severity
    ServerError,
    /// The server denied access
    AccessDenied,
    /// Positions were sent without the security list that describes them
    PositionsWithoutSecurities,
}

impl fmt::Display for StatementIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Null statement received"),
            Self::NotAStatement => write!(f, "Invalid OFX statement detected"),
            Self::ServerError => write!(f, "OFX message contains ERROR condition"),
            Self::AccessDenied => write!(f, "Access denied"),
            Self::PositionsWithoutSecurities => write!(
                f,
                "OFX statement contains <INVPOS> record but missing required <SECLIST> section"
            ),
        }
    }
}

impl From<StatementIssue> for VaultError {
    fn from(issue: StatementIssue) -> Self {
        VaultError::ProtocolViolation(issue.to_string())
    }
}

/// Check one statement, returning the first issue found
///
/// A position list without a security list is reported in preference to
/// any other finding.
pub fn validate(fragment: &str) -> Option<StatementIssue> {
    let content: String = fragment
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    if content.is_empty() {
        return Some(StatementIssue::Empty);
    }

    let has_positions = content.contains("<INVPOS>") || content.contains("<INVPOSLIST>");
    if has_positions && !content.contains("<SECLIST>") {
        return Some(StatementIssue::PositionsWithoutSecurities);
    }

    if !content.contains("OFXHEADER:") && !content.contains("<OFX>") && !content.contains("</OFX>")
    {
        Some(StatementIssue::NotAStatement)
    } else if content.contains("<SEVERITY>ERROR") {
        Some(StatementIssue::ServerError)
    } else if content.contains("ACCESSDENIED") {
        Some(StatementIssue::AccessDenied)
    } else {
        None
    }
}
