//! Permissive date parsing for the formats found in the wild.
//!
//! Feeds routinely ship dates that are only approximately RFC 822 or
//! ISO 8601. [`parse_date`] tries strict RFC 2822 first and then falls back
//! to lenient patterns. Anything it cannot read yields `None`; a bad date is
//! never an error.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use regex::Regex;

use crate::types::ParsedDate;

/// Lenient RFC 822: optional weekday, 2-4 digit year, optional seconds and zone.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static RFC822_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:[a-z]+\.?,?\s*)?(\d{1,2})[\s-]+([a-z]{3,})\.?,?[\s-]+(\d{2,4})(?:[\sT]+(\d{1,2}):(\d{1,2})(?::(\d{1,2})(?:\.\d+)?)?)?\s*([a-z]{1,5}|[+-]\d{1,2}:?\d{0,2})?\s*(?:\(.*\))?\s*$",
    )
    .expect("valid regex")
});

/// ISO 8601 / W3C-DTF, including compact and reduced-precision forms.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ISO8601_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(\d{4})(?:-?(\d{2})(?:-?(\d{2}))?)?(?:[T\s]+(\d{1,2})(?::?(\d{2})(?::?(\d{2})(?:[.,]\d+)?)?)?)?\s*(z|[+-]\d{2}(?::?\d{2})?)?\s*$",
    )
    .expect("valid regex")
});

/// `asctime` output, with an optional zone before the year.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ASCTIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*[a-z]{3},?\s+([a-z]{3})\s+(\d{1,2})\s+(\d{1,2}):(\d{2}):(\d{2})\s+(?:([a-z]{1,5}|[+-]\d{4})\s+)?(\d{4})\s*$",
    )
    .expect("valid regex")
});

/// Named zones and their offsets in hours.
const ZONE_OFFSETS: &[(&str, i32)] = &[
    ("ut", 0),
    ("utc", 0),
    ("gmt", 0),
    ("z", 0),
    ("est", -5),
    ("edt", -4),
    ("cst", -6),
    ("cdt", -5),
    ("mst", -7),
    ("mdt", -6),
    ("pst", -8),
    ("pdt", -7),
    ("et", -5),
    ("ct", -6),
    ("mt", -7),
    ("pt", -8),
    ("cet", 1),
    ("cest", 2),
    ("bst", 1),
];

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Parse a feed date into UTC.
///
/// # Examples
/// ```
/// use rapidfeed_parser::text::parse_date;
///
/// let dt = parse_date("Tue, 10 Jun 2003 04:00:00 GMT").unwrap();
/// assert_eq!(dt.to_rfc3339(), "2003-06-10T04:00:00+00:00");
///
/// let dt = parse_date("2003-12-13T18:30:02Z").unwrap();
/// assert_eq!(dt.to_rfc3339(), "2003-12-13T18:30:02+00:00");
///
/// assert!(parse_date("not a date").is_none());
/// ```
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    parse_rfc822_lenient(raw)
        .or_else(|| parse_iso8601(raw))
        .or_else(|| parse_asctime(raw))
}

/// Convert a parsed date to the requested output form.
#[must_use]
pub fn to_parsed_date(dt: DateTime<Utc>, unix_timestamps: bool) -> ParsedDate {
    if unix_timestamps {
        ParsedDate::Timestamp(dt.timestamp())
    } else {
        ParsedDate::Time(dt)
    }
}

fn parse_rfc822_lenient(raw: &str) -> Option<DateTime<Utc>> {
    let caps = RFC822_PATTERN.captures(raw)?;

    let day: u32 = caps.get(1)?.as_str().parse().ok()?;
    let month = month_number(caps.get(2)?.as_str())?;
    let year = expand_year(caps.get(3)?.as_str())?;
    let hour = capture_num(&caps, 4).unwrap_or(0);
    let minute = capture_num(&caps, 5).unwrap_or(0);
    let second = capture_num(&caps, 6).unwrap_or(0);
    let offset = match caps.get(7) {
        Some(zone) => zone_offset_seconds(zone.as_str())?,
        None => 0,
    };

    assemble(year, month, day, hour, minute, second, offset)
}

fn parse_iso8601(raw: &str) -> Option<DateTime<Utc>> {
    let caps = ISO8601_PATTERN.captures(raw)?;

    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month = capture_num(&caps, 2).unwrap_or(1);
    let day = capture_num(&caps, 3).unwrap_or(1);
    let hour = capture_num(&caps, 4).unwrap_or(0);
    let minute = capture_num(&caps, 5).unwrap_or(0);
    let second = capture_num(&caps, 6).unwrap_or(0);
    let offset = match caps.get(7) {
        Some(zone) => zone_offset_seconds(zone.as_str())?,
        None => 0,
    };

    assemble(year, month, day, hour, minute, second, offset)
}

fn parse_asctime(raw: &str) -> Option<DateTime<Utc>> {
    let caps = ASCTIME_PATTERN.captures(raw)?;

    let month = month_number(caps.get(1)?.as_str())?;
    let day = capture_num(&caps, 2)?;
    let hour = capture_num(&caps, 3)?;
    let minute = capture_num(&caps, 4)?;
    let second = capture_num(&caps, 5)?;
    let offset = match caps.get(6) {
        Some(zone) => zone_offset_seconds(zone.as_str())?,
        None => 0,
    };
    let year: i32 = caps.get(7)?.as_str().parse().ok()?;

    assemble(year, month, day, hour, minute, second, offset)
}

fn assemble(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    offset_seconds: i32,
) -> Option<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    // Leap seconds and "24:00" are clamped rather than rejected.
    let time = NaiveTime::from_hms_opt(hour.min(23), minute.min(59), second.min(59))?;
    let offset = FixedOffset::east_opt(offset_seconds)?;
    let local = NaiveDateTime::new(date, time);
    offset
        .from_local_datetime(&local)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

fn capture_num(caps: &regex::Captures<'_>, index: usize) -> Option<u32> {
    caps.get(index).and_then(|m| m.as_str().parse().ok())
}

fn month_number(name: &str) -> Option<u32> {
    let prefix = name.get(..3)?.to_ascii_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == prefix)
        .and_then(|idx| u32::try_from(idx + 1).ok())
}

/// Two-digit years follow RFC 2822: 00-49 is 20xx, 50-99 is 19xx.
fn expand_year(raw: &str) -> Option<i32> {
    let year: i32 = raw.parse().ok()?;
    Some(match raw.len() {
        2 if year < 50 => 2000 + year,
        2 => 1900 + year,
        3 => 1900 + year,
        _ => year,
    })
}

fn zone_offset_seconds(zone: &str) -> Option<i32> {
    let zone = zone.trim();
    if let Some(sign) = zone.chars().next().filter(|c| *c == '+' || *c == '-') {
        let digits: String = zone[1..].chars().filter(char::is_ascii_digit).collect();
        let (hours, minutes) = match digits.len() {
            1 | 2 => (digits.parse::<i32>().ok()?, 0),
            3 => (digits[..1].parse::<i32>().ok()?, digits[1..].parse::<i32>().ok()?),
            4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
            _ => return None,
        };
        let seconds = hours * 3600 + minutes * 60;
        return Some(if sign == '-' { -seconds } else { seconds });
    }

    let lower = zone.to_ascii_lowercase();
    let hours = ZONE_OFFSETS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, hours)| *hours)
        // Unknown zone names are read as UTC.
        .unwrap_or(0);
    Some(hours * 3600)
}
