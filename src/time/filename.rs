//! Filename timestamp parsing
//!
//! Camera and messaging apps encode the capture time into filenames in a
//! handful of shapes. The stem is split into delimiter-separated tokens and
//! scanned left to right against an ordered table of grammars; the first
//! token position that parses wins.

use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;
use tracing::{trace, warn};

/// Delimiters that separate filename tokens
const DELIMITERS: [char; 4] = ['_', '.', '-', ' '];

/// WeChat saves exported media as `mmexport<epoch-millis>`
const WECHAT_EXPORT_PREFIX: &str = "mmexport";

/// Result of one grammar attempt at one token position
enum GrammarOutcome {
    /// Shape and value both matched
    Matched(NaiveDateTime),
    /// Token had the right shape but did not hold a valid timestamp
    Malformed(&'static str),
    /// Token shape does not fit this grammar
    NoMatch,
}

/// A grammar inspects the token at `index` and, for the multi-token
/// shapes, its immediate successors.
type Grammar = fn(&[&str], usize) -> GrammarOutcome;

/// Grammars in precedence order, most information-dense first
const GRAMMARS: &[(&str, Grammar)] = &[
    ("epoch-millis", match_epoch_millis),
    ("compact-datetime", match_compact_datetime),
    ("date-time-pair", match_date_time_pair),
    ("ymd-triple", match_ymd_triple),
];

/// Parse a capture timestamp out of a filename.
///
/// The extension is stripped and the stem split on `_`, `.`, `-`, and
/// space; empty fragments are dropped. Token positions are scanned left to
/// right so the earliest, most specific token wins over coincidental later
/// matches. A token that is shaped like a timestamp but fails to parse is
/// warned about and the scan continues; `None` means no token matched,
/// which is an expected outcome for hand-named files.
pub fn parse_filename_time(file_name: &str) -> Option<NaiveDateTime> {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    let tokens: Vec<&str> = stem.split(DELIMITERS).filter(|t| !t.is_empty()).collect();

    for index in 0..tokens.len() {
        for &(pattern, attempt) in GRAMMARS {
            match attempt(&tokens, index) {
                GrammarOutcome::Matched(timestamp) => {
                    trace!(file_name, pattern, %timestamp, "Matched filename pattern");
                    return Some(timestamp);
                }
                GrammarOutcome::Malformed(reason) => {
                    warn!(
                        file_name,
                        pattern,
                        reason,
                        token = tokens[index],
                        "Token is shaped like a timestamp but does not parse"
                    );
                }
                GrammarOutcome::NoMatch => {}
            }
        }
    }

    None
}

/// Millisecond epoch: a 13-digit token (`wx_camera_1689324886317`), or a
/// 21-byte token carrying the WeChat export prefix (`mmexport1622020005757`).
fn match_epoch_millis(tokens: &[&str], index: usize) -> GrammarOutcome {
    let token = tokens[index];
    let digits = if token.len() == 13 {
        token
    } else if token.len() == 21 && token.starts_with(WECHAT_EXPORT_PREFIX) {
        &token[WECHAT_EXPORT_PREFIX.len()..]
    } else {
        return GrammarOutcome::NoMatch;
    };

    let Ok(millis) = digits.parse::<i64>() else {
        return GrammarOutcome::Malformed("not a numeric timestamp");
    };
    match chrono::DateTime::from_timestamp(millis / 1000, 0) {
        Some(dt) => GrammarOutcome::Matched(dt.naive_utc()),
        None => GrammarOutcome::Malformed("timestamp out of range"),
    }
}

/// Compact datetime: a 14-digit `YYYYMMDDhhmmss` token, or the 17-digit
/// variant with a millisecond suffix (`20210526085304575`). Only the first
/// 14 characters are read either way.
fn match_compact_datetime(tokens: &[&str], index: usize) -> GrammarOutcome {
    let token = tokens[index];
    if token.len() != 17 && token.len() != 14 {
        return GrammarOutcome::NoMatch;
    }
    match build_datetime(
        sub(token, 0, 4),
        sub(token, 4, 6),
        sub(token, 6, 8),
        sub(token, 8, 10),
        sub(token, 10, 12),
        sub(token, 12, 14),
    ) {
        Some(dt) => GrammarOutcome::Matched(dt),
        None => GrammarOutcome::Malformed("not a valid YYYYMMDDhhmmss value"),
    }
}

/// Date+time pair: an 8-digit date token immediately followed by a 6-digit
/// time token (`Snapshot_20230626_113855_appname`).
fn match_date_time_pair(tokens: &[&str], index: usize) -> GrammarOutcome {
    let token = tokens[index];
    if token.len() != 8 {
        return GrammarOutcome::NoMatch;
    }
    let Some(time_token) = tokens.get(index + 1).filter(|t| t.len() == 6) else {
        return GrammarOutcome::NoMatch;
    };
    match build_datetime(
        sub(token, 0, 4),
        sub(token, 4, 6),
        sub(token, 6, 8),
        sub(time_token, 0, 2),
        sub(time_token, 2, 4),
        sub(time_token, 4, 6),
    ) {
        Some(dt) => GrammarOutcome::Matched(dt),
        None => GrammarOutcome::Malformed("not a valid YYYYMMDD hhmmss pair"),
    }
}

/// Year/month/day triple: a 4-digit year token followed by two 2-digit
/// tokens (`2021-06-26_11-38-55`). Only the three date tokens are
/// consumed; any trailing time tokens are not read and the time stays at
/// midnight.
fn match_ymd_triple(tokens: &[&str], index: usize) -> GrammarOutcome {
    let token = tokens[index];
    if token.len() != 4 {
        return GrammarOutcome::NoMatch;
    }
    let (Some(month), Some(day)) = (
        tokens.get(index + 1).filter(|t| t.len() == 2),
        tokens.get(index + 2).filter(|t| t.len() == 2),
    ) else {
        return GrammarOutcome::NoMatch;
    };
    match build_datetime(token, month, day, "00", "00", "00") {
        Some(dt) => GrammarOutcome::Matched(dt),
        None => GrammarOutcome::Malformed("not a valid YYYY-MM-DD triple"),
    }
}

/// Byte-range slice that refuses to split a multi-byte character; the empty
/// fallback fails the numeric parse downstream.
fn sub(token: &str, start: usize, end: usize) -> &str {
    token.get(start..end).unwrap_or("")
}

/// Build a timestamp from string fields, rejecting invalid calendar values
fn build_datetime(
    year: &str,
    month: &str,
    day: &str,
    hour: &str,
    minute: &str,
    second: &str,
) -> Option<NaiveDateTime> {
    let year: i32 = parse_digits(year)?;
    let month: u32 = parse_digits(month)?;
    let day: u32 = parse_digits(day)?;
    let hour: u32 = parse_digits(hour)?;
    let minute: u32 = parse_digits(minute)?;
    let second: u32 = parse_digits(second)?;

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}

/// Numeric parse that rejects the leading sign `str::parse` tolerates
fn parse_digits<T: std::str::FromStr>(field: &str) -> Option<T> {
    if !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}
