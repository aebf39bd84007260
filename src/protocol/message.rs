//! Inbound line inspection and the synthesized timestamp tag
//!
//! Content lines arrive with an optional metadata prefix of the form
//! `@key=value;key2=value2 <rest of line>`. The tag block is the first
//! whitespace-delimited token and only exists when the line starts with `@`.
//! Stored records carry a synthesized `timestamp-utc` tag inserted ahead of
//! any original tags, so the query path can filter by arrival time without
//! caring what else the upstream attached.

use chrono::{DateTime, NaiveDateTime, Utc};

use super::constants::{TIMESTAMP_FORMAT, TIMESTAMP_TAG};

/// Split a raw line into its tag block (without the leading `@`) and the
/// untagged remainder.
///
/// Returns `(None, line)` when the line carries no tags.
pub fn split_tags(line: &str) -> (Option<&str>, &str) {
    match line.strip_prefix('@') {
        Some(tagged) => match tagged.split_once(' ') {
            Some((tags, rest)) => (Some(tags), rest),
            None => (Some(tagged), ""),
        },
        None => (None, line),
    }
}

/// Look up one tag value by key.
///
/// Valueless tags (no `=`) are skipped; an empty value is returned as `""`.
pub fn tag_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let (tags, _) = split_tags(line);
    tags?.split(';').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then_some(v)
    })
}

/// Build a stored record by inserting the `timestamp-utc` tag as the first
/// tag of the line.
///
/// A tagged line keeps its original tags after the inserted one; an untagged
/// line gains a fresh tag block.
pub fn prepend_timestamp_tag(line: &str, timestamp: DateTime<Utc>) -> String {
    let stamp = timestamp.format(TIMESTAMP_FORMAT);
    match line.strip_prefix('@') {
        Some(tagged) => format!("@{}={};{}", TIMESTAMP_TAG, stamp, tagged),
        None => format!("@{}={} {}", TIMESTAMP_TAG, stamp, line),
    }
}

/// Parse a `YYYYMMDD-HHMMSS` timestamp. Returns `None` on any mismatch.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).ok()
}

/// Extract the parsed `timestamp-utc` tag from a stored record.
pub fn record_timestamp(record: &str) -> Option<NaiveDateTime> {
    tag_value(record, TIMESTAMP_TAG).and_then(parse_timestamp)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_split_tags_tagged_line() {
        let line = "@badges=;color=#FF0000 :nick!user@host PRIVMSG #chan :hi";
        let (tags, rest) = split_tags(line);

        assert_eq!(tags, Some("badges=;color=#FF0000"));
        assert_eq!(rest, ":nick!user@host PRIVMSG #chan :hi");
    }

    #[test]
    fn test_split_tags_untagged_line() {
        let line = ":nick!user@host PRIVMSG #chan :hi";
        let (tags, rest) = split_tags(line);

        assert_eq!(tags, None);
        assert_eq!(rest, line);
    }

    #[test]
    fn test_split_tags_bare_tag_block() {
        let (tags, rest) = split_tags("@only=tags");

        assert_eq!(tags, Some("only=tags"));
        assert_eq!(rest, "");
    }

    #[test]
    fn test_tag_value_lookup() {
        let line = "@badges=;color=#FF0000;display-name=Someone :x PRIVMSG #c :hi";

        assert_eq!(tag_value(line, "color"), Some("#FF0000"));
        assert_eq!(tag_value(line, "display-name"), Some("Someone"));
        assert_eq!(tag_value(line, "badges"), Some(""));
        assert_eq!(tag_value(line, "missing"), None);
    }

    #[test]
    fn test_tag_value_untagged_line() {
        assert_eq!(tag_value(":x PRIVMSG #c :hi", "color"), None);
    }

    #[test]
    fn test_prepend_timestamp_tag_tagged() {
        let line = "@a=1;b=2 :nick PRIVMSG #chan :hello";
        let record = prepend_timestamp_tag(line, at(2024, 1, 31, 23, 59, 59));

        assert_eq!(
            record,
            "@timestamp-utc=20240131-235959;a=1;b=2 :nick PRIVMSG #chan :hello"
        );
    }

    #[test]
    fn test_prepend_timestamp_tag_untagged() {
        let line = ":nick PRIVMSG #chan :hello";
        let record = prepend_timestamp_tag(line, at(2024, 6, 1, 0, 0, 5));

        assert_eq!(record, "@timestamp-utc=20240601-000005 :nick PRIVMSG #chan :hello");
    }

    #[test]
    fn test_parse_timestamp_round_trip() {
        let when = at(2024, 12, 24, 18, 30, 0);
        let stamp = when.format(TIMESTAMP_FORMAT).to_string();

        assert_eq!(parse_timestamp(&stamp), Some(when.naive_utc()));
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("not-a-time"), None);
        assert_eq!(parse_timestamp("2024-01-31 23:59:59"), None);
        // Month 13 matches the pattern but not the calendar
        assert_eq!(parse_timestamp("20241331-000000"), None);
    }

    #[test]
    fn test_record_timestamp() {
        let record = prepend_timestamp_tag(
            "@a=1 :nick PRIVMSG #chan :hello",
            at(2024, 3, 15, 12, 0, 30),
        );

        assert_eq!(
            record_timestamp(&record),
            Some(at(2024, 3, 15, 12, 0, 30).naive_utc())
        );
        assert_eq!(record_timestamp(":no tags here"), None);
    }
}
