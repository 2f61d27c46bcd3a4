//! Wall-clock helpers for the reference timezone.
//!
//! Events are stored as UTC instants; every day, hour and weekday question is
//! answered in the configured reference zone.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serializer};

/// Default reference zone.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;

/// Interpret a naive wall-clock time in `tz`.
///
/// Ambiguous times (DST fall-back) resolve to the earliest instant. Times that
/// do not exist (DST spring-forward gap) yield `None`.
pub fn localize(tz: Tz, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Like [`localize`], but a time inside a DST gap moves forward by the gap.
pub fn localize_lenient(tz: Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    localize(tz, naive)
        .or_else(|| localize(tz, naive + Duration::hours(1)))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

pub fn local_date(tz: Tz, instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

pub fn local_hour(tz: Tz, instant: DateTime<Utc>) -> u32 {
    instant.with_timezone(&tz).hour()
}

pub fn local_weekday(tz: Tz, instant: DateTime<Utc>) -> Weekday {
    instant.with_timezone(&tz).weekday()
}

/// Parse "HH:MM" (or "HH:MM:SS").
pub fn parse_hhmm(text: &str) -> Result<NaiveTime, chrono::ParseError> {
    let text = text.trim();
    NaiveTime::parse_from_str(text, "%H:%M").or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
}

/// Serde adapter storing a `NaiveTime` as "HH:MM".
pub(crate) mod hhmm {
    use super::*;

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_hhmm(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localize_eastern() {
        let naive = NaiveDate::from_ymd_opt(2025, 10, 6)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap();
        let utc = localize(DEFAULT_TIMEZONE, naive).unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2025, 10, 6, 11, 0, 0).unwrap());
        assert_eq!(local_hour(DEFAULT_TIMEZONE, utc), 7);
        assert_eq!(local_weekday(DEFAULT_TIMEZONE, utc), Weekday::Mon);
    }

    #[test]
    fn test_spring_forward_gap() {
        let naive = NaiveDate::from_ymd_opt(2025, 3, 9)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        assert!(localize(DEFAULT_TIMEZONE, naive).is_none());
        let shifted = localize_lenient(DEFAULT_TIMEZONE, naive);
        assert_eq!(local_hour(DEFAULT_TIMEZONE, shifted), 3);
    }

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("06:00").unwrap(), NaiveTime::from_hms_opt(6, 0, 0).unwrap());
        assert_eq!(parse_hhmm(" 22:15:00 ").unwrap(), NaiveTime::from_hms_opt(22, 15, 0).unwrap());
        assert!(parse_hhmm("25:00").is_err());
    }
}
