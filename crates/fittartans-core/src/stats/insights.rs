//! Descriptive statistics over the merged timeline.
//!
//! One pass collects per-weekday, per-hour, per-source, per-bucket and
//! per-class-type counts; the "busiest" answers break ties toward the
//! earliest weekday (Monday first), the earliest hour and the first class type
//! encountered.

use chrono::Weekday;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::recommend::TimeBucket;
use crate::timeline::{Event, EventSource};
use crate::zone;

/// Spread between the busiest and quietest weekday above which the week is unbalanced.
const BALANCE_THRESHOLD: usize = 3;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleBalance {
    Balanced,
    Unbalanced,
}

/// Aggregate counts over a timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsSummary {
    pub total_events: usize,
    /// Distinct reference-zone dates with at least one event
    pub active_days: usize,
    pub average_per_day: f64,
    pub busiest_day: Option<Weekday>,
    /// Hour of day (0-23) with the most event starts
    pub busiest_hour: Option<u32>,
    pub most_common_class_type: Option<String>,
    /// Monday first
    pub events_by_weekday: [usize; 7],
    pub events_by_source: BTreeMap<EventSource, usize>,
    pub events_by_time_bucket: BTreeMap<TimeBucket, usize>,
    pub balance: ScheduleBalance,
    pub hints: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct InsightsAggregator {
    tz: Tz,
}

impl InsightsAggregator {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn summarize(&self, merged: &[Event]) -> InsightsSummary {
        let mut by_weekday = [0usize; 7];
        let mut by_hour = [0usize; 24];
        let mut by_source = BTreeMap::new();
        let mut by_bucket = BTreeMap::new();
        let mut class_types: Vec<(String, usize)> = Vec::new();
        let mut dates = BTreeSet::new();

        for event in merged {
            let weekday = zone::local_weekday(self.tz, event.start);
            let hour = zone::local_hour(self.tz, event.start);

            by_weekday[weekday.num_days_from_monday() as usize] += 1;
            by_hour[hour as usize] += 1;
            *by_source.entry(event.source).or_insert(0) += 1;
            if let Some(bucket) = TimeBucket::from_hour(hour) {
                *by_bucket.entry(bucket).or_insert(0) += 1;
            }
            if let Some(class_type) = &event.class_type {
                match class_types.iter_mut().find(|(t, _)| t == class_type) {
                    Some((_, count)) => *count += 1,
                    None => class_types.push((class_type.clone(), 1)),
                }
            }
            dates.insert(zone::local_date(self.tz, event.start));
        }

        let busiest_day = first_max(&by_weekday).map(|i| WEEKDAYS[i]);
        let busiest_hour = first_max(&by_hour).map(|h| h as u32);
        let most_common_class_type = first_max(&class_types.iter().map(|(_, c)| *c).collect::<Vec<_>>())
            .map(|i| class_types[i].0.clone());

        let present: Vec<usize> = by_weekday.iter().copied().filter(|c| *c > 0).collect();
        let spread = match (present.iter().max(), present.iter().min()) {
            (Some(max), Some(min)) => max - min,
            _ => 0,
        };
        let balance = if spread > BALANCE_THRESHOLD {
            ScheduleBalance::Unbalanced
        } else {
            ScheduleBalance::Balanced
        };

        let total_events = merged.len();
        let average_per_day = if dates.is_empty() {
            0.0
        } else {
            total_events as f64 / dates.len() as f64
        };

        let mut summary = InsightsSummary {
            total_events,
            active_days: dates.len(),
            average_per_day,
            busiest_day,
            busiest_hour,
            most_common_class_type,
            events_by_weekday: by_weekday,
            events_by_source: by_source,
            events_by_time_bucket: by_bucket,
            balance,
            hints: Vec::new(),
        };
        summary.hints = hints(&summary);
        summary
    }
}

/// Index of the first maximal non-zero count.
fn first_max(counts: &[usize]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, count) in counts.iter().enumerate() {
        if *count > 0 && best.map_or(true, |b| *count > counts[b]) {
            best = Some(i);
        }
    }
    best
}

fn hints(summary: &InsightsSummary) -> Vec<String> {
    let mut hints = Vec::new();
    if summary.total_events == 0 {
        return hints;
    }

    if summary.balance == ScheduleBalance::Unbalanced {
        if let Some(day) = summary.busiest_day {
            hints.push(format!(
                "Your schedule is heavier on {}s. Consider spreading activities more evenly.",
                weekday_name(day)
            ));
        }
    }

    let count = |bucket| summary.events_by_time_bucket.get(&bucket).copied().unwrap_or(0);
    let (morning, afternoon, evening) = (
        count(TimeBucket::Morning),
        count(TimeBucket::Afternoon),
        count(TimeBucket::Evening),
    );
    if morning == 0 {
        hints.push("You have no morning activities. Morning workouts can boost energy for the day!".into());
    }
    if evening > morning + afternoon {
        hints.push("Most of your activities are in the evening. Consider adding some morning sessions.".into());
    }
    hints
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Convenience function summarizing a timeline
pub fn compute_insights(merged: &[Event], tz: Tz) -> InsightsSummary {
    InsightsAggregator::new(tz).summarize(merged)
}
