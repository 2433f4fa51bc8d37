//! Parser for the line-oriented site configuration language
//!
//! ```text
//! # comment
//! COMBINEOFX : Y
//! <SITE>
//!   SITENAME : Citi
//!   ACCTTYPE : CCSTMT
//!   URL      : https://ofx.example.com/cgi
//! </SITE>
//! <STOCKS>
//!   AAPL M:2.5 S:APL
//! </STOCKS>
//! ```
//!
//! Parsing never fails. Lines that do not fit their local grammar are
//! dropped and logged at debug level.

use std::str::FromStr;

use tracing::debug;

use super::options::{GlobalOptions, DEFAULT_APP_ID, DEFAULT_APP_VERSION};
use super::site_config::SiteConfig;
use crate::error::{VaultError, VaultResult};
use crate::models::{Capability, Site, Ticker};

/// Open/closed tracker for one `<STOCKS>` or `<FUNDS>` block kind
struct TickerBlock {
    open: &'static str,
    close: &'static str,
    inside: bool,
}

impl TickerBlock {
    fn new(open: &'static str, close: &'static str) -> Self {
        Self {
            open,
            close,
            inside: false,
        }
    }

    /// Feed one upper-cased line; true when it is a ticker line of this block
    fn step(&mut self, upper: &str) -> bool {
        if upper.contains(self.open) {
            self.inside = true;
            false
        } else if upper.contains(self.close) {
            self.inside = false;
            false
        } else {
            self.inside
        }
    }
}

/// Parse configuration text into sites, tickers and global options
///
/// One forward pass with three independent trackers: the site tracker, the
/// stocks tracker and the funds tracker. None of them looks at the markers
/// of the others, so a stray or unclosed block of one kind never hides
/// lines from another. Every `FIELD : VALUE` line outside a site block is a
/// global option, including lines inside ticker blocks.
pub fn parse(text: &str) -> SiteConfig {
    let mut config = SiteConfig::default();
    let mut options = GlobalOptions::default();
    let mut site: Option<Site> = None;
    let mut stocks = TickerBlock::new("<STOCKS>", "</STOCKS>");
    let mut funds = TickerBlock::new("<FUNDS>", "</FUNDS>");

    for (index, raw) in text.lines().enumerate() {
        let line = clean_line(raw);
        if line.is_empty() {
            continue;
        }
        let upper = line.to_uppercase();

        if upper.contains("<SITE>") && site.is_none() {
            site = Some(Site::new(DEFAULT_APP_ID, DEFAULT_APP_VERSION));
        }
        let mut dropped = Vec::new();
        if upper.contains("</SITE>") {
            if let Some(finished) = site.take() {
                if let Err(e) = commit_site(&mut config, finished) {
                    dropped.push(e);
                }
            }
        }
        if let Some((field, value)) = split_field(&line) {
            match site.as_mut() {
                Some(open) => {
                    if let Err(e) = apply_site_field(open, &field, value) {
                        dropped.push(e);
                    }
                }
                None => {
                    options.apply(&field, value);
                }
            }
        }

        if stocks.step(&upper) {
            match Ticker::parse(&upper) {
                Ok(ticker) => config.stocks.push(ticker),
                Err(e) => dropped.push(e),
            }
        }
        if funds.step(&upper) {
            match Ticker::parse(&upper) {
                Ok(ticker) => config.funds.push(ticker),
                Err(e) => dropped.push(e),
            }
        }

        for error in dropped {
            debug!(line = index + 1, error = %error, "Dropped configuration record");
        }
    }

    if let Some(site) = site {
        debug!(site = %site.name, "Unterminated <SITE> block discarded");
    }

    options.finish();
    config.options = options;
    config
}

/// Strip comments, CR/LF, tabs and commas, then trim
fn clean_line(line: &str) -> String {
    let line = match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    };
    line.chars()
        .filter(|c| !matches!(c, '\r' | '\n' | '\t' | ','))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Split `FIELD : VALUE` at the first colon; the field is upper-cased
fn split_field(line: &str) -> Option<(String, &str)> {
    let (field, value) = line.split_once(':')?;
    Some((field.trim().to_uppercase(), value.trim()))
}

fn apply_site_field(site: &mut Site, field: &str, value: &str) -> VaultResult<()> {
    if value.is_empty() {
        return Ok(());
    }

    match field {
        "SITENAME" => site.name = value.to_uppercase(),
        "ACCTTYPE" => {
            site.capabilities = vec![
                Capability::Signon,
                Capability::from_tag(&value.to_uppercase()),
            ]
        }
        "FIORG" => site.org_name = value.to_string(),
        "FID" => site.org_id = value.to_string(),
        "URL" => site.url = value.to_string(),
        "BANKID" => site.bank_id = value.to_string(),
        "BROKERID" => site.broker_id = value.to_string(),
        "OFXVER" => site.protocol_version = value.to_string(),
        "APPID" => site.app_id = value.to_string(),
        "APPVER" => site.app_version = value.to_string(),
        "MININTERVAL" => site.min_poll_interval_days = number(field, value)?,
        "TIMEOFFSET" => site.time_offset_hours = number(field, value)?,
        "DELAY" => site.request_delay_seconds = number(field, value)?,
        "SKIPZEROTRANS" => {
            let upper = value.to_uppercase();
            site.skip_zero_amount_transactions = if upper.contains('Y') {
                Some(true)
            } else if upper.contains('N') {
                Some(false)
            } else {
                None
            }
        }
        "DTACCTUP" => site.last_update_date_override = Some(value.to_string()),
        "USERAGENT" => site.user_agent_override = Some(value.to_string()),
        "CLIENTUID" => site.static_client_uid = Some(value.to_string()),
        _ => {}
    }
    Ok(())
}

fn number<T: FromStr>(field: &str, value: &str) -> VaultResult<T> {
    value.parse().map_err(|_| {
        VaultError::malformed(
            format!("site field {}", field),
            format!("'{}' is not a number", value),
        )
    })
}

fn commit_site(config: &mut SiteConfig, site: Site) -> VaultResult<()> {
    if site.name.is_empty() || site.url.is_empty() {
        return Err(VaultError::malformed(
            "<SITE> block",
            format!("'{}' has no SITENAME or no URL", site.name),
        ));
    }
    if config.sites.contains_key(&site.name) {
        debug!(site = %site.name, "Later <SITE> block replaces earlier definition");
    }
    config.sites.insert(site.name.clone(), site);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_site() {
        let config = parse("<SITE>\nSITENAME: Foo\nURL: http://x\n</SITE>");
        assert_eq!(config.sites.len(), 1);

        let site = &config.sites["FOO"];
        assert_eq!(site.name, "FOO");
        assert_eq!(site.url, "http://x");
        assert_eq!(site.app_id, DEFAULT_APP_ID);
        assert_eq!(site.app_version, DEFAULT_APP_VERSION);
        assert_eq!(site.protocol_version, "102");
    }

    #[test]
    fn test_site_without_url_is_discarded() {
        let config = parse("<SITE>\nSITENAME: Foo\n</SITE>");
        assert!(config.sites.is_empty());
    }

    #[test]
    fn test_url_with_colons_is_kept_whole() {
        let config = parse("<site>\nsitename : bar\nurl : https://ofx.bar.com:443/cgi\n</site>");
        assert_eq!(config.sites["BAR"].url, "https://ofx.bar.com:443/cgi");
    }

    #[test]
    fn test_full_site_fields() {
        let text = "\
<SITE>
  SITENAME    : Big Bank     # trailing comment
  ACCTTYPE    : bastmt
  FIORG       : BigBank
  FID         : 1,234
  URL         : https://ofx.bigbank.com/ofx
  BANKID      : 021000021
  BROKERID    : bigbank.com
  OFXVER      : 220
  APPID       : QMOFX
  APPVER      : 2700
  MININTERVAL : 3
  TIMEOFFSET  : -1.5
  DELAY       : 2
  SKIPZEROTRANS : yes
  DTACCTUP    : 20200101
  USERAGENT   : curl
  CLIENTUID   : abc-123
  NOTAFIELD   : whatever
</SITE>";
        let config = parse(text);
        let site = &config.sites["BIG BANK"];

        assert_eq!(
            site.capabilities,
            vec![Capability::Signon, Capability::BankStatement]
        );
        assert_eq!(site.org_name, "BigBank");
        assert_eq!(site.org_id, "1234");
        assert_eq!(site.bank_id, "021000021");
        assert_eq!(site.broker_id, "bigbank.com");
        assert_eq!(site.protocol_version, "220");
        assert_eq!(site.app_id, "QMOFX");
        assert_eq!(site.app_version, "2700");
        assert_eq!(site.min_poll_interval_days, 3);
        assert_eq!(site.time_offset_hours, -1.5);
        assert_eq!(site.request_delay_seconds, 2.0);
        assert_eq!(site.skip_zero_amount_transactions, Some(true));
        assert_eq!(site.last_update_date_override.as_deref(), Some("20200101"));
        assert_eq!(site.user_agent_override.as_deref(), Some("curl"));
        assert_eq!(site.static_client_uid.as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_skip_zero_trans_tristate() {
        let no = parse("<SITE>\nSITENAME: a\nURL: u\nSKIPZEROTRANS: No\n</SITE>");
        assert_eq!(no.sites["A"].skip_zero_amount_transactions, Some(false));

        let unset = parse("<SITE>\nSITENAME: a\nURL: u\nSKIPZEROTRANS: maybe\n</SITE>");
        assert_eq!(unset.sites["A"].skip_zero_amount_transactions, None);
    }

    #[test]
    fn test_bad_numbers_drop_only_that_field() {
        let config = parse("<SITE>\nSITENAME: a\nURL: u\nMININTERVAL: soon\nDELAY: 1.5\n</SITE>");
        let site = &config.sites["A"];
        assert_eq!(site.min_poll_interval_days, 0);
        assert_eq!(site.request_delay_seconds, 1.5);
    }

    #[test]
    fn test_dropped_records_are_malformed_input() {
        let mut site = Site::new(DEFAULT_APP_ID, DEFAULT_APP_VERSION);
        let err = apply_site_field(&mut site, "MININTERVAL", "soon").unwrap_err();
        assert!(err.is_malformed());
        assert!(apply_site_field(&mut site, "MININTERVAL", "").is_ok());

        let mut config = SiteConfig::default();
        assert!(commit_site(&mut config, site).unwrap_err().is_malformed());
        assert!(config.sites.is_empty());
    }

    #[test]
    fn test_later_site_overwrites_earlier() {
        let text = "<SITE>\nSITENAME: a\nURL: first\n</SITE>\n<SITE>\nSITENAME: A\nURL: second\n</SITE>";
        let config = parse(text);
        assert_eq!(config.sites.len(), 1);
        assert_eq!(config.sites["A"].url, "second");
    }

    #[test]
    fn test_site_fields_reset_between_blocks() {
        let text = "<SITE>\nSITENAME: a\nURL: u\nFID: 99\n</SITE>\n<SITE>\nSITENAME: b\nURL: v\n</SITE>";
        let config = parse(text);
        assert_eq!(config.sites["B"].org_id, "");
    }

    #[test]
    fn test_global_options_outside_site_only() {
        let text = "COMBINEOFX: Y\n<SITE>\nSITENAME: a\nURL: u\nQUOTECURRENCY: EUR\n</SITE>\nQUIETSCRUB: yes";
        let config = parse(text);
        assert!(config.options.combine_ofx);
        assert!(config.options.quiet_scrub);
        assert_eq!(config.options.quote_currency, "USD");
    }

    #[test]
    fn test_stocks_and_funds() {
        let text = "\
<STOCKS>
  aapl m:2.5 s:apl
  msft, ibm       # commas are stripped
</STOCKS>
<FUNDS>
  VFIAX
</FUNDS>
NOTATICKER";
        let config = parse(text);

        assert_eq!(config.stocks.len(), 2);
        assert_eq!(config.stocks[0].symbol, "AAPL");
        assert_eq!(config.stocks[0].multiplier, 2.5);
        assert_eq!(config.stocks[0].money_symbol, "APL");
        assert_eq!(config.stocks[1].symbol, "MSFT");

        assert_eq!(config.funds.len(), 1);
        assert_eq!(config.funds[0].symbol, "VFIAX");
    }

    #[test]
    fn test_ask_quote_html_wins() {
        let config = parse("SHOWQUOTEHTM: Y\nASKQUOTEHTM: Y");
        assert!(config.options.ask_quote_html);
        assert!(!config.options.show_quote_html);
    }

    #[test]
    fn test_garbage_never_panics() {
        let config = parse("<SITE>\n:::\n\u{0}\n</SITE>\n</FUNDS>\n#only comment\n<SITE>");
        assert!(config.sites.is_empty());
        assert!(config.stocks.is_empty());
        assert!(config.funds.is_empty());
    }

    #[test]
    fn test_site_after_unclosed_funds_block() {
        let config = parse("<FUNDS>\nVFIAX\n<SITE>\nSITENAME: a\nURL: u\n</SITE>\n");

        assert_eq!(config.sites.len(), 1);
        assert_eq!(config.sites["A"].url, "u");
        // still inside <FUNDS>, so the site lines are fund lines too
        let symbols: Vec<_> = config.funds.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, ["VFIAX", "<SITE>", "SITENAME:", "URL:", "</SITE>"]);
    }

    #[test]
    fn test_nested_site_marker_keeps_record() {
        let text = "<SITE>\nSITENAME: a\n<SITE>\nURL: u\n</SITE>";
        let config = parse(text);
        assert_eq!(config.sites["A"].url, "u");
    }

    #[test]
    fn test_options_apply_inside_ticker_blocks() {
        let config = parse("<STOCKS>\nVTI\nCOMBINEOFX: Y\n</STOCKS>");

        assert!(config.options.combine_ofx);
        assert_eq!(config.stocks.len(), 2);
        assert_eq!(config.stocks[0].symbol, "VTI");
    }

    #[test]
    fn test_overlapping_ticker_blocks_feed_both_lists() {
        let config = parse("<STOCKS>\nVTI\n<FUNDS>\nVFIAX\n</STOCKS>\nFXAIX\n</FUNDS>");

        let stocks: Vec<_> = config.stocks.iter().map(|t| t.symbol.as_str()).collect();
        let funds: Vec<_> = config.funds.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(stocks, ["VTI", "<FUNDS>", "VFIAX"]);
        assert_eq!(funds, ["VFIAX", "</STOCKS>", "FXAIX"]);
    }
}
