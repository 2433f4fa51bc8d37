//! Ticker model
//!
//! Stocks and funds share one shape: a quote symbol, a price multiplier and
//! the symbol reported downstream.

use serde::{Deserialize, Serialize};

use crate::error::{VaultError, VaultResult};

/// A stock or fund entry from the site configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    /// Symbol used to request the quote
    pub symbol: String,
    /// Factor applied to the quoted price
    pub multiplier: f64,
    /// Symbol reported in generated statements
    pub money_symbol: String,
}

impl Ticker {
    /// Parse a ticker line such as `AAPL M:2.5 S:APL`
    ///
    /// The first space-delimited token is the symbol. ` M:<number>` sets the
    /// multiplier (0.0 when it is not a number) and ` S:<token>` sets the
    /// reported symbol. A line without a leading symbol is `MalformedInput`.
    pub fn parse(line: &str) -> VaultResult<Self> {
        // Tokens are matched as "<space>X:value<space>", so pad the end.
        let padded = format!("{} ", line);

        let symbol = padded
            .split_once(' ')
            .map(|(first, _)| first)
            .filter(|first| !first.is_empty())
            .ok_or_else(|| {
                VaultError::malformed("ticker line", format!("'{}' has no symbol", line))
            })?
            .to_string();

        let multiplier = option_value(&padded, " M:")
            .map(|v| v.parse::<f64>().unwrap_or(0.0))
            .unwrap_or(1.0);

        let money_symbol = option_value(&padded, " S:")
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| symbol.clone());

        Ok(Self {
            symbol,
            multiplier,
            money_symbol,
        })
    }
}

/// Value after `marker`, up to the first space past its first character
///
/// The first character is always taken, so `M: 2` yields ` 2`. The result
/// is trimmed and may be empty.
fn option_value<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let start = line.find(marker)? + marker.len();
    let rest = &line[start..];
    let first = rest.chars().next()?.len_utf8();
    let end = first + rest[first..].find(' ')?;
    Some(rest[..end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_line() {
        let ticker = Ticker::parse("AAPL M:2.5 S:APL ").unwrap();
        assert_eq!(ticker.symbol, "AAPL");
        assert_eq!(ticker.multiplier, 2.5);
        assert_eq!(ticker.money_symbol, "APL");
    }

    #[test]
    fn test_parse_symbol_only() {
        let ticker = Ticker::parse("VTSAX").unwrap();
        assert_eq!(ticker.symbol, "VTSAX");
        assert_eq!(ticker.multiplier, 1.0);
        assert_eq!(ticker.money_symbol, "VTSAX");
    }

    #[test]
    fn test_missing_symbol_is_dropped() {
        assert!(Ticker::parse(" M:2").unwrap_err().is_malformed());
        assert!(Ticker::parse("").unwrap_err().is_malformed());
    }

    #[test]
    fn test_bad_multiplier_is_zero() {
        let ticker = Ticker::parse("IBM M:lots").unwrap();
        assert_eq!(ticker.multiplier, 0.0);
    }

    #[test]
    fn test_multiplier_requires_leading_space() {
        let ticker = Ticker::parse("XM:2").unwrap();
        assert_eq!(ticker.symbol, "XM:2");
        assert_eq!(ticker.multiplier, 1.0);
    }

    #[test]
    fn test_multiplier_after_space() {
        let ticker = Ticker::parse("IBM M: 2").unwrap();
        assert_eq!(ticker.multiplier, 2.0);

        let ticker = Ticker::parse("IBM S: BIG").unwrap();
        assert_eq!(ticker.money_symbol, "BIG");
    }
}
