//! Canonical event, interval and source-priority types.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Origin of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    /// The user's personal calendar
    Calendar,
    /// Scraped one-off class listings
    #[serde(rename = "eventbrite")]
    EventbriteClass,
    /// Scraped recurring GroupX classes
    #[serde(rename = "groupx")]
    GroupXClass,
}

impl EventSource {
    pub const ALL: [EventSource; 3] = [
        EventSource::Calendar,
        EventSource::EventbriteClass,
        EventSource::GroupXClass,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Calendar => "calendar",
            Self::EventbriteClass => "eventbrite",
            Self::GroupXClass => "groupx",
        }
    }

    /// True for the scraped class sources.
    pub fn is_class(&self) -> bool {
        !matches!(self, Self::Calendar)
    }
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit source-priority order, highest priority first.
///
/// Defaults to Calendar > EventbriteClass > GroupXClass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<EventSource>", into = "Vec<EventSource>")]
pub struct SourcePriority {
    order: [EventSource; 3],
}

impl SourcePriority {
    /// Build an order from a list that must name every source exactly once.
    pub fn new(order: Vec<EventSource>) -> Result<Self, ValidationError> {
        let complete = order.len() == EventSource::ALL.len()
            && EventSource::ALL.iter().all(|s| order.contains(s));
        if !complete {
            let names: Vec<_> = order.iter().map(EventSource::as_str).collect();
            return Err(ValidationError::InvalidPriorityOrder(names.join(", ")));
        }
        Ok(Self {
            order: [order[0], order[1], order[2]],
        })
    }

    /// Position in the order; 0 is the highest priority.
    pub fn rank(&self, source: EventSource) -> usize {
        self.order
            .iter()
            .position(|s| *s == source)
            .unwrap_or(self.order.len())
    }

    /// True when `a` has strictly higher priority than `b`.
    pub fn outranks(&self, a: EventSource, b: EventSource) -> bool {
        self.rank(a) < self.rank(b)
    }
}

impl Default for SourcePriority {
    fn default() -> Self {
        Self {
            order: EventSource::ALL,
        }
    }
}

impl TryFrom<Vec<EventSource>> for SourcePriority {
    type Error = ValidationError;

    fn try_from(order: Vec<EventSource>) -> Result<Self, Self::Error> {
        Self::new(order)
    }
}

impl From<SourcePriority> for Vec<EventSource> {
    fn from(priority: SourcePriority) -> Self {
        priority.order.to_vec()
    }
}

/// A half-open time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    /// Create a non-empty interval.
    ///
    /// # Errors
    /// Returns an error if `end <= start`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::InvalidTimeRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The overlapping part of two intervals, if any.
    pub fn intersect(&self, other: &Interval) -> Option<Interval> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(Interval { start, end })
    }
}

/// One scheduled occurrence from a single source.
///
/// `start < end` always holds for values built through [`Event::try_new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub source: EventSource,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Category tag such as "Yoga"; absent for plain calendar events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Event {
    /// Create a new event, returning a Result
    ///
    /// # Errors
    /// Returns an error if `end <= start`
    pub fn try_new(
        source: EventSource,
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::InvalidTimeRange { start, end });
        }
        Ok(Self {
            source,
            title: title.into(),
            start,
            end,
            class_type: None,
            location: None,
            description: None,
            url: None,
        })
    }

    pub fn interval(&self) -> Interval {
        Interval {
            start: self.start,
            end: self.end,
        }
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Check if this event overlaps with another
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn with_class_type(mut self, class_type: Option<String>) -> Self {
        self.class_type = class_type.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location.filter(|l| !l.trim().is_empty());
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.trim().is_empty());
        self
    }

    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.url = url.filter(|u| !u.trim().is_empty());
        self
    }
}
