//! Event normalization.
//!
//! Converts one source's raw records into canonical [`Event`]s:
//! - timestamps are parsed and expressed as UTC instants, naive values read
//!   in the reference zone
//! - `start < end` is verified for every event
//! - a record that fails validation is skipped and counted, never fatal
//!
//! The record shape is open: anything implementing [`RawRecord`] can be
//! normalized, and the caller's source tag is stamped on every event.

mod classify;
mod datetime;
mod records;

pub use classify::infer_class_type;
pub use datetime::{parse_clock, parse_instant, parse_listing_range, Meridiem};
pub use records::{CalendarRecord, ListingRecord, RecurringClassRecord};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ParseError;
use crate::timeline::{Event, EventSource};

/// Everything a record needs to know to produce events.
#[derive(Debug, Clone, Copy)]
pub struct NormalizeContext {
    pub source: EventSource,
    pub tz: Tz,
    /// Caller-supplied clock; supplies missing years in listing text
    pub now: Option<DateTime<Utc>>,
}

/// A raw record from an external collaborator.
pub trait RawRecord {
    /// Produce zero or more events, or the reason this record is unusable.
    fn to_events(&self, ctx: &NormalizeContext) -> Result<Vec<Event>, ParseError>;
}

/// A record that was skipped, by its position in the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub index: usize,
    pub error: String,
}

/// Result of normalizing one source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizeReport {
    /// Sorted by start
    pub events: Vec<Event>,
    /// Number of records skipped as unparsable
    pub skipped: usize,
    pub issues: Vec<SkippedRecord>,
    /// Events dropped because they start before the caller's `now`
    pub past: usize,
}

/// Normalizer for a single source.
#[derive(Debug, Clone)]
pub struct EventNormalizer {
    source: EventSource,
    tz: Tz,
    now: Option<DateTime<Utc>>,
    infer_class_types: bool,
}

impl EventNormalizer {
    pub fn new(source: EventSource, tz: Tz) -> Self {
        Self {
            source,
            tz,
            now: None,
            infer_class_types: false,
        }
    }

    /// Supply the clock: fills in missing listing years and drops past events.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Guess a class type from the title when a record has none.
    pub fn with_class_inference(mut self, enabled: bool) -> Self {
        self.infer_class_types = enabled;
        self
    }

    fn context(&self) -> NormalizeContext {
        NormalizeContext {
            source: self.source,
            tz: self.tz,
            now: self.now,
        }
    }

    pub fn normalize<R: RawRecord>(&self, records: &[R]) -> NormalizeReport {
        let ctx = self.context();
        let mut report = NormalizeReport::default();

        for (index, record) in records.iter().enumerate() {
            let events = match record.to_events(&ctx) {
                Ok(events) => events,
                Err(error) => {
                    warn!(source = %self.source, index, %error, "skipping unparsable record");
                    report.skipped += 1;
                    report.issues.push(SkippedRecord {
                        index,
                        error: error.to_string(),
                    });
                    continue;
                }
            };

            for mut event in events {
                if self.now.is_some_and(|now| event.start < now) {
                    report.past += 1;
                    continue;
                }
                if self.infer_class_types && event.class_type.is_none() {
                    event.class_type = infer_class_type(&event.title);
                }
                report.events.push(event);
            }
        }

        report.events.sort_by_key(|e| (e.start, e.end));
        debug!(
            source = %self.source,
            events = report.events.len(),
            skipped = report.skipped,
            past = report.past,
            "normalized source"
        );
        report
    }
}

/// Convenience function normalizing without a clock or class inference
pub fn normalize<R: RawRecord>(records: &[R], source: EventSource, tz: Tz) -> NormalizeReport {
    EventNormalizer::new(source, tz).normalize(records)
}
