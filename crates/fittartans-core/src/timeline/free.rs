//! Free time within a daily active window.
//!
//! For every day of a date range the merged timeline is clipped to the active
//! window and its complement is emitted as free intervals, so that free and
//! busy time together tile the window exactly.

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::event::{Event, Interval};
use crate::error::ValidationError;
use crate::zone::{self, hhmm};

/// Wall-clock hours in which the user can be scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveWindow {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl ActiveWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, ValidationError> {
        let window = Self { start, end };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.end <= self.start {
            return Err(ValidationError::InvalidWindow {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// The window on `date` as a UTC interval.
    pub fn on(&self, date: NaiveDate, tz: Tz) -> Interval {
        let start = zone::localize_lenient(tz, date.and_time(self.start));
        let end = zone::localize_lenient(tz, date.and_time(self.end));
        Interval {
            start,
            end: end.max(start),
        }
    }
}

impl Default for ActiveWindow {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(6, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl DateRange {
    pub fn new(first: NaiveDate, last: NaiveDate) -> Result<Self, ValidationError> {
        if last < first {
            return Err(ValidationError::InvalidDateRange { first, last });
        }
        Ok(Self { first, last })
    }

    pub fn single(date: NaiveDate) -> Self {
        Self {
            first: date,
            last: date,
        }
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.first.iter_days().take_while(move |d| *d <= self.last)
    }
}

/// Busy and free time for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub window: Interval,
    /// Window-clipped busy time, sorted and coalesced
    pub busy: Vec<Interval>,
    /// Sorted gaps between busy intervals
    pub free: Vec<Interval>,
}

impl DayAvailability {
    pub fn free_minutes(&self) -> i64 {
        self.free.iter().map(Interval::duration_minutes).sum()
    }

    pub fn busy_minutes(&self) -> i64 {
        self.busy.iter().map(Interval::duration_minutes).sum()
    }
}

/// Computes free intervals per day of a range.
#[derive(Debug, Clone)]
pub struct FreeTimeComputer {
    window: ActiveWindow,
    tz: Tz,
}

impl FreeTimeComputer {
    pub fn new(window: ActiveWindow, tz: Tz) -> Result<Self, ValidationError> {
        window.validate()?;
        Ok(Self { window, tz })
    }

    /// Busy and free time for every day in `range`.
    pub fn availability(&self, merged: &[Event], range: DateRange) -> Vec<DayAvailability> {
        range.days().map(|date| self.day(merged, date)).collect()
    }

    /// Free intervals keyed by day.
    pub fn free_time(&self, merged: &[Event], range: DateRange) -> BTreeMap<NaiveDate, Vec<Interval>> {
        self.availability(merged, range)
            .into_iter()
            .map(|day| (day.date, day.free))
            .collect()
    }

    fn day(&self, merged: &[Event], date: NaiveDate) -> DayAvailability {
        let window = self.window.on(date, self.tz);

        let mut clipped: Vec<Interval> = merged
            .iter()
            .filter_map(|e| e.interval().intersect(&window))
            .collect();
        clipped.sort_by_key(|i| (i.start, i.end));

        // Coalesce so callers passing an unresolved timeline still get a tiling
        let mut busy: Vec<Interval> = Vec::with_capacity(clipped.len());
        for interval in clipped {
            if let Some(last) = busy.last_mut() {
                if interval.start <= last.end {
                    last.end = last.end.max(interval.end);
                    continue;
                }
            }
            busy.push(interval);
        }

        let mut free = Vec::new();
        let mut cursor = window.start;
        for interval in &busy {
            if interval.start > cursor {
                free.push(Interval {
                    start: cursor,
                    end: interval.start,
                });
            }
            cursor = cursor.max(interval.end);
        }
        if cursor < window.end {
            free.push(Interval {
                start: cursor,
                end: window.end,
            });
        }

        DayAvailability {
            date,
            window,
            busy,
            free,
        }
    }
}

/// Per-day busy and free structures in one call
pub fn compute_availability(
    merged: &[Event],
    window: ActiveWindow,
    range: DateRange,
    tz: Tz,
) -> Result<Vec<DayAvailability>, ValidationError> {
    Ok(FreeTimeComputer::new(window, tz)?.availability(merged, range))
}

/// Convenience function computing free time in one call
pub fn compute_free_time(
    merged: &[Event],
    window: ActiveWindow,
    range: DateRange,
    tz: Tz,
) -> Result<BTreeMap<NaiveDate, Vec<Interval>>, ValidationError> {
    Ok(FreeTimeComputer::new(window, tz)?.free_time(merged, range))
}
