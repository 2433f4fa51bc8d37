//! Rendering helpers for the statement protocol
//!
//! Version 1.x documents are SGML and leave leaf elements open
//! (`<TAG>value`); version 2.x documents close them (`<TAG>value</TAG>`).

use chrono::{Local, NaiveDateTime, Utc};

/// Standard SGML header block, followed by a blank line
pub const SGML_HEADER: &str = "OFXHEADER:100
DATA:OFXSGML
VERSION:102
SECURITY:TYPE1
ENCODING:USASCII
CHARSET:1252
COMPRESSION:NONE
OLDFILEUID:NONE
NEWFILEUID:NONE

";

/// Timestamp layout used throughout the protocol
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Render one leaf element; empty tag or value renders nothing
pub fn field(tag: &str, value: &str, version: &str) -> String {
    if tag.is_empty() || value.is_empty() {
        return String::new();
    }
    if version.starts_with('2') {
        format!("<{tag}>{value}</{tag}>")
    } else {
        format!("<{tag}>{value}")
    }
}

/// Wrap contents in an aggregate open/close tag pair, CRLF separated
pub fn aggregate<S: AsRef<str>>(tag: &str, contents: &[S]) -> String {
    let mut parts = Vec::with_capacity(contents.len() + 2);
    parts.push(format!("<{tag}>"));
    parts.extend(contents.iter().map(|c| c.as_ref().to_string()));
    parts.push(format!("</{tag}>"));
    parts.join("\r\n")
}

/// Format a timestamp as `YYYYMMDDHHMMSS`
pub fn format_timestamp(when: NaiveDateTime) -> String {
    when.format(TIMESTAMP_FORMAT).to_string()
}

/// Current time as a protocol timestamp
///
/// Local time unless `utc` is set; `tz` appends `[+0:UTC]` to UTC times.
pub fn date_time_str(utc: bool, tz: bool) -> String {
    if utc {
        let stamp = format_timestamp(Utc::now().naive_utc());
        if tz {
            format!("{stamp}[+0:UTC]")
        } else {
            stamp
        }
    } else {
        format_timestamp(Local::now().naive_local())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_field_by_version() {
        assert_eq!(field("ORG", "Citi", "102"), "<ORG>Citi");
        assert_eq!(field("ORG", "Citi", "220"), "<ORG>Citi</ORG>");
        assert_eq!(field("ORG", "", "102"), "");
        assert_eq!(field("", "x", "220"), "");
    }

    #[test]
    fn test_aggregate() {
        assert_eq!(
            aggregate("SONRS", &["<CODE>0", "<SEVERITY>INFO"]),
            "<SONRS>\r\n<CODE>0\r\n<SEVERITY>INFO\r\n</SONRS>"
        );
        assert_eq!(aggregate::<&str>("EMPTY", &[]), "<EMPTY>\r\n</EMPTY>");
    }

    #[test]
    fn test_format_timestamp() {
        let when = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 1)
            .unwrap();
        assert_eq!(format_timestamp(when), "20240309070501");
    }

    #[test]
    fn test_utc_marker() {
        let stamp = date_time_str(true, true);
        assert!(stamp.ends_with("[+0:UTC]"));
        assert_eq!(stamp.len(), 14 + "[+0:UTC]".len());
        assert_eq!(date_time_str(false, true).len(), 14);
    }
}
