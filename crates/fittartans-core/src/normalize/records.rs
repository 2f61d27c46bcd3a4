//! Raw record shapes delivered by the calendar and scraping collaborators.

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

use super::datetime::{self, parse_clock};
use super::{NormalizeContext, RawRecord};
use crate::error::{ParseError, ValidationError};
use crate::timeline::Event;
use crate::zone;

/// Length assumed for listings that only state a start time.
const DEFAULT_DURATION_MINUTES: i64 = 60;

/// Longest term a recurring class may span.
const MAX_TERM_DAYS: i64 = 366;

fn build_event(
    ctx: &NormalizeContext,
    title: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Event, ParseError> {
    Event::try_new(ctx.source, title, start, end).map_err(|err| match err {
        ValidationError::InvalidTimeRange { start, end } => ParseError::InvalidTimeRange { start, end },
        _ => ParseError::InvalidTimeRange { start, end },
    })
}

fn title_or(title: Option<&str>, fallback: &str) -> String {
    match title.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => fallback.to_string(),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// One entry exported from the user's calendar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarRecord {
    #[serde(default, alias = "Summary")]
    pub summary: Option<String>,
    #[serde(default, alias = "Start")]
    pub start: Option<String>,
    #[serde(default, alias = "End")]
    pub end: Option<String>,
    #[serde(default, alias = "Location")]
    pub location: Option<String>,
    #[serde(default, alias = "Description")]
    pub description: Option<String>,
    #[serde(default)]
    pub class_type: Option<String>,
}

impl RawRecord for CalendarRecord {
    fn to_events(&self, ctx: &NormalizeContext) -> Result<Vec<Event>, ParseError> {
        let start_text = non_empty(&self.start).ok_or(ParseError::MissingField("start"))?;
        if datetime::is_date_only(start_text) {
            return Err(ParseError::AllDay(start_text.to_string()));
        }
        let start = datetime::parse_instant(start_text, ctx.tz).ok_or_else(|| ParseError::InvalidTimestamp {
            field: "start",
            value: start_text.to_string(),
        })?;
        let end = match non_empty(&self.end) {
            Some(text) => datetime::parse_instant(text, ctx.tz).ok_or_else(|| ParseError::InvalidTimestamp {
                field: "end",
                value: text.to_string(),
            })?,
            None => start + Duration::minutes(DEFAULT_DURATION_MINUTES),
        };

        let event = build_event(ctx, &title_or(self.summary.as_deref(), "Untitled Event"), start, end)?
            .with_location(self.location.clone())
            .with_description(self.description.clone())
            .with_class_type(self.class_type.clone());
        Ok(vec![event])
    }
}

/// A one-off class scraped from an event listing page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date_time: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub class_type: Option<String>,
}

impl ListingRecord {
    fn location(&self) -> Option<String> {
        let parts: Vec<&str> = [non_empty(&self.venue), non_empty(&self.address)]
            .into_iter()
            .flatten()
            .collect();
        (!parts.is_empty()).then(|| parts.join("- "))
    }
}

impl RawRecord for ListingRecord {
    fn to_events(&self, ctx: &NormalizeContext) -> Result<Vec<Event>, ParseError> {
        let text = non_empty(&self.date_time).ok_or(ParseError::MissingField("date_time"))?;
        let year = ctx.now.map(|now| zone::local_date(ctx.tz, now).year());
        let (start, end) = datetime::parse_listing_range(text, ctx.tz, year)?;
        let end = end.unwrap_or(start + Duration::minutes(DEFAULT_DURATION_MINUTES));

        let event = build_event(ctx, &title_or(self.title.as_deref(), "Untitled Event"), start, end)?
            .with_location(self.location())
            .with_url(self.link.clone())
            .with_class_type(self.class_type.clone());
        Ok(vec![event])
    }
}

/// A weekly class offered on one weekday for the length of a term.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecurringClassRecord {
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub weekday: Option<String>,
    #[serde(default)]
    pub start_time_local: Option<String>,
    #[serde(default)]
    pub end_time_local: Option<String>,
    #[serde(default)]
    pub term_start_date: Option<String>,
    #[serde(default)]
    pub term_end_date: Option<String>,
    #[serde(default)]
    pub studio: Option<String>,
    #[serde(default)]
    pub campus_area: Option<String>,
    #[serde(default)]
    pub class_description: Option<String>,
    #[serde(default)]
    pub registration_url: Option<String>,
    #[serde(default)]
    pub class_type: Option<String>,
}

impl RecurringClassRecord {
    fn location(&self) -> String {
        let mut parts = Vec::new();
        if let Some(studio) = non_empty(&self.studio) {
            parts.push(studio.to_string());
        }
        if let Some(area) = non_empty(&self.campus_area) {
            parts.push(format!("({area})"));
        }
        if parts.is_empty() {
            "CMU Campus".to_string()
        } else {
            parts.join(" ")
        }
    }

    fn date_field(value: &Option<String>, field: &'static str) -> Result<NaiveDate, ParseError> {
        let text = non_empty(value).ok_or(ParseError::MissingField(field))?;
        NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| ParseError::InvalidTimestamp {
            field,
            value: text.to_string(),
        })
    }

    fn time_field(value: &Option<String>, field: &'static str) -> Result<chrono::NaiveTime, ParseError> {
        let text = non_empty(value).ok_or(ParseError::MissingField(field))?;
        parse_clock(text, None).ok_or_else(|| ParseError::InvalidTimestamp {
            field,
            value: text.to_string(),
        })
    }
}

impl RawRecord for RecurringClassRecord {
    fn to_events(&self, ctx: &NormalizeContext) -> Result<Vec<Event>, ParseError> {
        let weekday_text = non_empty(&self.weekday).ok_or(ParseError::MissingField("weekday"))?;
        let weekday: Weekday = weekday_text
            .parse()
            .map_err(|_| ParseError::UnknownWeekday(weekday_text.to_string()))?;
        let term_start = Self::date_field(&self.term_start_date, "term_start_date")?;
        let term_end = Self::date_field(&self.term_end_date, "term_end_date")?;
        let start_time = Self::time_field(&self.start_time_local, "start_time_local")?;
        let end_time = Self::time_field(&self.end_time_local, "end_time_local")?;
        if (term_end - term_start).num_days() > MAX_TERM_DAYS {
            return Err(ParseError::TermTooLong {
                start: term_start,
                end: term_end,
            });
        }

        let title = title_or(self.class_name.as_deref(), "Untitled Class");
        let description = self
            .class_description
            .clone()
            .filter(|d| !d.trim().is_empty())
            .or_else(|| self.registration_url.clone());
        let location = self.location();

        let offset = (7 + weekday.num_days_from_monday() - term_start.weekday().num_days_from_monday()) % 7;
        let mut next = term_start.checked_add_days(Days::new(u64::from(offset)));

        let mut events = Vec::new();
        while let Some(date) = next.filter(|d| *d <= term_end) {
            let start_naive = date.and_time(start_time);
            let end_naive = date.and_time(end_time);
            let start = zone::localize(ctx.tz, start_naive).ok_or(ParseError::NonexistentLocalTime(start_naive))?;
            let end = zone::localize(ctx.tz, end_naive).ok_or(ParseError::NonexistentLocalTime(end_naive))?;

            events.push(
                build_event(ctx, &title, start, end)?
                    .with_location(Some(location.clone()))
                    .with_description(description.clone())
                    .with_url(self.registration_url.clone())
                    .with_class_type(self.class_type.clone()),
            );
            next = date.checked_add_days(Days::new(7));
        }
        Ok(events)
    }
}
