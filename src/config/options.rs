//! Global options declared outside any block in the site configuration
//!
//! Every option has a documented default and is overwritten only when its
//! key appears with a non-empty value.

use serde::{Deserialize, Serialize};

/// Client application id sent when a site does not override it
pub const DEFAULT_APP_ID: &str = "QWIN";

/// Client application version sent when a site does not override it
pub const DEFAULT_APP_VERSION: &str = "2500";

/// Flat record of global behaviour switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalOptions {
    /// Days between statement downloads (`DEFAULTINTERVAL`)
    pub poll_interval_days: u32,
    pub prompt_interval: bool,
    pub save_tickers_first: bool,
    pub save_quote_history: bool,
    /// Always open the quote report after download
    pub show_quote_html: bool,
    /// Ask whether to open the quote report; wins over `show_quote_html`
    pub ask_quote_html: bool,
    pub enable_quote_source: bool,
    pub quote_url: String,
    pub quote_timezone: String,
    pub quote_currency: String,
    pub combine_ofx: bool,
    pub quiet_scrub: bool,
    pub force_quotes: bool,
    /// Account id used for quote-only statements
    pub quote_account: String,
    pub skip_zero_transactions: bool,
    pub skip_failed_logon: bool,
    pub prompt_start: bool,
    pub prompt_end: bool,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            poll_interval_days: 7,
            prompt_interval: false,
            save_tickers_first: false,
            save_quote_history: false,
            show_quote_html: false,
            ask_quote_html: false,
            enable_quote_source: true,
            quote_url: "https://query2.finance.yahoo.com/v10/finance/quoteSummary/{ticker}?modules=price"
                .to_string(),
            quote_timezone: "-5:EST".to_string(),
            quote_currency: "USD".to_string(),
            combine_ofx: false,
            quiet_scrub: false,
            force_quotes: false,
            quote_account: "0123456789".to_string(),
            skip_zero_transactions: false,
            skip_failed_logon: true,
            prompt_start: true,
            prompt_end: false,
        }
    }
}

impl GlobalOptions {
    /// Apply one `FIELD : VALUE` pair. `field` must already be upper-cased.
    ///
    /// Returns false when the field is not a global option or the value is
    /// empty, in which case nothing changes.
    pub(crate) fn apply(&mut self, field: &str, value: &str) -> bool {
        if value.is_empty() {
            return false;
        }

        match field {
            // Non-numeric intervals read as zero
            "DEFAULTINTERVAL" => self.poll_interval_days = value.parse().unwrap_or(0),
            "PROMPTINTERVAL" => self.prompt_interval = yes(value),
            "SAVETICKERSFIRST" => self.save_tickers_first = yes(value),
            "SAVEQUOTEHISTORY" => self.save_quote_history = yes(value),
            "SHOWQUOTEHTM" => self.show_quote_html = yes(value),
            "ASKQUOTEHTM" => self.ask_quote_html = yes(value),
            "ENABLEYAHOOFINANCE" => self.enable_quote_source = yes(value),
            "YAHOOURL" => self.quote_url = value.to_string(),
            "YAHOOTIMEZONE" => self.quote_timezone = value.to_string(),
            "QUOTECURRENCY" => self.quote_currency = value.to_string(),
            "COMBINEOFX" => self.combine_ofx = yes(value),
            "QUIETSCRUB" => self.quiet_scrub = yes(value),
            "FORCEQUOTES" => self.force_quotes = yes(value),
            "QUOTEACCOUNT" => self.quote_account = value.to_string(),
            "SKIPZEROTRANSACTIONS" => self.skip_zero_transactions = yes(value),
            "SKIPFAILEDLOGON" => self.skip_failed_logon = yes(value),
            "PROMPTSTART" => self.prompt_start = yes(value),
            "PROMPTEND" => self.prompt_end = yes(value),
            _ => return false,
        }
        true
    }

    /// Resolve mutually exclusive switches once parsing is complete
    pub(crate) fn finish(&mut self) {
        if self.ask_quote_html {
            self.show_quote_html = false;
        }
    }
}

fn yes(value: &str) -> bool {
    value
        .chars()
        .next()
        .is_some_and(|c| c.eq_ignore_ascii_case(&'y'))
}
