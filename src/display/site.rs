//! Site configuration display formatting

use crate::config::{GlobalOptions, SiteConfig};
use crate::models::Ticker;

/// Format the configured sites as a table
pub fn format_site_list(config: &SiteConfig) -> String {
    if config.sites.is_empty() {
        return "No sites configured.".to_string();
    }

    let name_width = config
        .sites
        .values()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<8}  {:<7}  {}\n",
        "Site", "Type", "Version", "URL",
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<8}  {:-<7}  {:-<20}\n",
        "", "", "", "",
    ));

    for site in config.sites.values() {
        let statement = site
            .statement_type()
            .map(|cap| cap.tag().to_string())
            .unwrap_or_default();
        output.push_str(&format!(
            "{:<name_width$}  {:<8}  {:<7}  {}\n",
            site.name, statement, site.protocol_version, site.url,
        ));
    }

    output
}

/// Format a stock or fund list under a heading
pub fn format_ticker_list(title: &str, tickers: &[Ticker]) -> String {
    let mut output = format!("{}:\n", title);

    if tickers.is_empty() {
        output.push_str("  (none)\n");
        return output;
    }

    for ticker in tickers {
        output.push_str(&format!("  {:<12}", ticker.symbol));
        if ticker.multiplier != 1.0 {
            output.push_str(&format!("  x{}", ticker.multiplier));
        }
        if ticker.money_symbol != ticker.symbol {
            output.push_str(&format!("  as {}", ticker.money_symbol));
        }
        output.push('\n');
    }

    output
}

/// Format the global options, one per line
pub fn format_options(options: &GlobalOptions) -> String {
    let yes_no = |flag: bool| if flag { "Yes" } else { "No" };

    let rows = [
        ("Poll interval (days)", options.poll_interval_days.to_string()),
        ("Prompt for interval", yes_no(options.prompt_interval).to_string()),
        ("Save tickers first", yes_no(options.save_tickers_first).to_string()),
        ("Save quote history", yes_no(options.save_quote_history).to_string()),
        ("Show quote report", yes_no(options.show_quote_html).to_string()),
        ("Ask to show quote report", yes_no(options.ask_quote_html).to_string()),
        ("Quote source enabled", yes_no(options.enable_quote_source).to_string()),
        ("Quote URL", options.quote_url.clone()),
        ("Quote time zone", options.quote_timezone.clone()),
        ("Quote currency", options.quote_currency.clone()),
        ("Quote account", options.quote_account.clone()),
        ("Combine statements", yes_no(options.combine_ofx).to_string()),
        ("Quiet scrub", yes_no(options.quiet_scrub).to_string()),
        ("Force quotes", yes_no(options.force_quotes).to_string()),
        ("Skip zero transactions", yes_no(options.skip_zero_transactions).to_string()),
        ("Skip failed logon", yes_no(options.skip_failed_logon).to_string()),
        ("Prompt at start", yes_no(options.prompt_start).to_string()),
        ("Prompt at end", yes_no(options.prompt_end).to_string()),
    ];

    let mut output = String::new();
    for (label, value) in rows {
        output.push_str(&format!("  {:<26}{}\n", format!("{}:", label), value));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = "\
<SITE>
SITENAME: bank
ACCTTYPE: BASTMT
URL: https://ofx.bank.com
</SITE>
<STOCKS>
AAPL
BRK-A M:0.01 S:BRKA
</STOCKS>
";

    #[test]
    fn test_site_list() {
        let config = SiteConfig::parse(CONFIG);
        let output = format_site_list(&config);
        assert!(output.contains("BANK"));
        assert!(output.contains("BASTMT"));
        assert!(output.contains("https://ofx.bank.com"));
        assert_eq!(
            format_site_list(&SiteConfig::default()),
            "No sites configured."
        );
    }

    #[test]
    fn test_ticker_list() {
        let config = SiteConfig::parse(CONFIG);
        let output = format_ticker_list("Stocks", &config.stocks);
        assert!(output.starts_with("Stocks:\n"));
        assert!(output.contains("x0.01"));
        assert!(output.contains("as BRKA"));
        assert_eq!(format_ticker_list("Funds", &[]), "Funds:\n  (none)\n");
    }

    #[test]
    fn test_options() {
        let output = format_options(&GlobalOptions::default());
        assert!(output.contains("Poll interval (days):     7"));
        assert!(output.contains("Quote currency:"));
    }
}
