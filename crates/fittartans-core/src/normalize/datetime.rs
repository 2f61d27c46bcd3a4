//! Timestamp parsing for the formats scraped sources and calendar exports use.
//!
//! Supported shapes:
//! - RFC 3339 / ISO 8601 instants, with or without an offset
//!   (naive values are read in the reference zone)
//! - ISO pairs joined by an arrow: `2025-10-04T18:00:00Z → 2025-10-04T20:00:00Z`
//! - listing prose: `Saturday, October 4 · 10:15 - 11:15am EDT`

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::error::ParseError;
use crate::zone;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A start instant and, when the text carried one, an end instant.
pub type ParsedRange = (DateTime<Utc>, Option<DateTime<Utc>>);

/// True for `YYYY-MM-DD` values with no time of day.
pub fn is_date_only(text: &str) -> bool {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").is_ok()
}

/// Parse a single instant. Offset-less values are local to `tz`.
pub fn parse_instant(text: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .and_then(|naive| zone::localize(tz, naive))
}

/// Parse a listing's free-form `date_time` field.
///
/// `year` fills in listings that omit it; without one such text is rejected.
pub fn parse_listing_range(text: &str, tz: Tz, year: Option<i32>) -> Result<ParsedRange, ParseError> {
    let invalid = || ParseError::InvalidTimestamp {
        field: "date_time",
        value: text.to_string(),
    };

    if let Some((start, end)) = text.split_once('→') {
        let start = parse_instant(start, tz).ok_or_else(invalid)?;
        let end = parse_instant(end, tz).ok_or_else(invalid)?;
        return Ok((start, Some(end)));
    }

    if text.contains('·') && text.contains('-') {
        return parse_prose_range(text, tz, year).ok_or_else(invalid);
    }

    parse_instant(text, tz).map(|start| (start, None)).ok_or_else(invalid)
}

/// `Saturday, October 4 · 10:15 - 11:15am EDT`
fn parse_prose_range(text: &str, tz: Tz, year: Option<i32>) -> Option<ParsedRange> {
    let (date_part, time_part) = text.split_once('·')?;
    let date = parse_prose_date(date_part, year)?;

    // Trailing zone abbreviations are ignored; the reference zone applies
    let time_part: String = time_part
        .split_whitespace()
        .filter(|word| !is_zone_abbreviation(word))
        .collect::<Vec<_>>()
        .join(" ");
    let (start_text, end_text) = time_part.split_once('-')?;

    let end_meridiem = meridiem(end_text);
    let end = parse_clock(end_text, None)?;
    let mut start = parse_clock(start_text, end_meridiem)?;

    // "11:30 - 1pm": an inherited meridiem that puts start after end was wrong
    if meridiem(start_text).is_none() && start >= end {
        if let Some(m) = end_meridiem {
            start = parse_clock(start_text, Some(m.flip()))?;
        }
    }

    let start = zone::localize(tz, date.and_time(start))?;
    let end = zone::localize(tz, date.and_time(end))?;
    Some((start, Some(end)))
}

fn parse_prose_date(text: &str, year: Option<i32>) -> Option<NaiveDate> {
    let text = text.trim();
    // Drop a leading "Saturday, "
    let text = match text.split_once(',') {
        Some((head, rest)) if head.chars().all(|c| c.is_ascii_alphabetic()) => rest.trim(),
        _ => text,
    };
    let text = text.replace(',', " ");
    let words: Vec<&str> = text.split_whitespace().collect();

    let has_year = words
        .last()
        .is_some_and(|w| w.len() == 4 && w.chars().all(|c| c.is_ascii_digit()));
    let candidate = if has_year {
        words.join(" ")
    } else {
        format!("{} {}", words.join(" "), year?)
    };
    NaiveDate::parse_from_str(&candidate, "%B %d %Y").ok()
}

fn is_zone_abbreviation(word: &str) -> bool {
    (3..=4).contains(&word.len()) && word.chars().all(|c| c.is_ascii_uppercase()) && word != "AM" && word != "PM"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    fn flip(self) -> Self {
        match self {
            Self::Am => Self::Pm,
            Self::Pm => Self::Am,
        }
    }
}

fn meridiem(text: &str) -> Option<Meridiem> {
    let lower = text.trim().to_ascii_lowercase();
    if lower.ends_with("am") || lower.ends_with("a.m.") {
        Some(Meridiem::Am)
    } else if lower.ends_with("pm") || lower.ends_with("p.m.") {
        Some(Meridiem::Pm)
    } else {
        None
    }
}

/// Parse a clock reading like `7pm`, `10:15am`, `7:00 AM` or `18:30`.
///
/// `fallback` applies when the text itself has no am/pm marker.
pub fn parse_clock(text: &str, fallback: Option<Meridiem>) -> Option<NaiveTime> {
    let compact: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .collect::<String>()
        .to_ascii_lowercase();
    let marker = meridiem(&compact).or(fallback);
    let digits = compact.trim_end_matches(|c: char| c.is_ascii_alphabetic());

    let (hour, minute) = match digits.split_once(':') {
        Some((h, m)) => (h.parse::<u32>().ok()?, m.get(..2)?.parse::<u32>().ok()?),
        None => (digits.parse::<u32>().ok()?, 0),
    };

    let hour = match marker {
        Some(_) if !(1..=12).contains(&hour) => return None,
        Some(Meridiem::Am) => hour % 12,
        Some(Meridiem::Pm) => hour % 12 + 12,
        None => hour,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}
