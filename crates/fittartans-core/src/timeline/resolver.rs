//! Conflict resolution across event sources.
//!
//! Merges the normalized events of every source into one timeline in which no
//! two retained events overlap. Overlaps are settled by the explicit
//! [`SourcePriority`] order; between equally ranked events the earlier start
//! wins.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

use super::event::{Event, SourcePriority};

/// Why an event was left out of the merged timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    /// Lost to an overlapping event from a higher-priority source
    LowerPriority,
    /// Overlapped an earlier event from an equally ranked source
    EqualPriorityLater,
}

/// An evicted or dropped event together with the event it lost to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemovedEvent {
    pub event: Event,
    pub reason: RemovalReason,
    pub kept: Event,
}

/// Merged timeline plus everything that was removed to get there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolveOutcome {
    /// Sorted by start, pairwise non-overlapping
    pub merged: Vec<Event>,
    /// Sorted by start
    pub removed: Vec<RemovedEvent>,
}

/// Merges per-source event lists into a single non-overlapping timeline.
#[derive(Debug, Clone, Default)]
pub struct ConflictResolver {
    priority: SourcePriority,
}

impl ConflictResolver {
    /// Create a resolver with the default priority order
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom priority order
    pub fn with_priority(mut self, priority: SourcePriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn priority(&self) -> &SourcePriority {
        &self.priority
    }

    /// Total order used before the scan: start, then source priority, then end.
    fn compare(&self, a: &Event, b: &Event) -> Ordering {
        a.start
            .cmp(&b.start)
            .then_with(|| self.priority.rank(a.source).cmp(&self.priority.rank(b.source)))
            .then_with(|| a.end.cmp(&b.end))
    }

    /// Resolve overlaps between all events of all sources.
    ///
    /// Each incoming event is compared only against the most recently retained
    /// one. Because the input is sorted by start and the retained set is
    /// already disjoint, that single comparison keeps the whole timeline
    /// disjoint.
    pub fn resolve(&self, sources: &[Vec<Event>]) -> ResolveOutcome {
        let mut all: Vec<Event> = sources.iter().flatten().cloned().collect();
        all.sort_by(|a, b| self.compare(a, b));

        let mut merged: Vec<Event> = Vec::with_capacity(all.len());
        let mut removed = Vec::new();

        for event in all {
            let Some(last) = merged.last_mut() else {
                merged.push(event);
                continue;
            };

            if event.start >= last.end {
                merged.push(event);
                continue;
            }

            if self.priority.outranks(event.source, last.source) {
                let evicted = std::mem::replace(last, event);
                debug!(
                    evicted = %evicted.title,
                    by = %last.title,
                    "evicted lower-priority event"
                );
                removed.push(RemovedEvent {
                    event: evicted,
                    reason: RemovalReason::LowerPriority,
                    kept: last.clone(),
                });
            } else {
                let reason = if self.priority.rank(event.source) == self.priority.rank(last.source)
                {
                    RemovalReason::EqualPriorityLater
                } else {
                    RemovalReason::LowerPriority
                };
                debug!(dropped = %event.title, kept = %last.title, ?reason, "dropped overlapping event");
                removed.push(RemovedEvent {
                    event,
                    reason,
                    kept: last.clone(),
                });
            }
        }

        removed.sort_by(|a, b| self.compare(&a.event, &b.event));
        debug!(merged = merged.len(), removed = removed.len(), "conflicts resolved");

        ResolveOutcome { merged, removed }
    }
}

/// Convenience function to resolve with the default priority order
pub fn resolve_conflicts(sources: &[Vec<Event>]) -> ResolveOutcome {
    ConflictResolver::new().resolve(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::EventSource;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 6, h, m, 0).unwrap()
    }

    fn ev(source: EventSource, title: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Event {
        Event::try_new(source, title, start, end).unwrap()
    }

    #[test]
    fn test_equal_priority_earliest_start_wins() {
        let first = ev(EventSource::Calendar, "standup", at(9, 0), at(10, 0));
        let second = ev(EventSource::Calendar, "review", at(9, 30), at(10, 30));

        let outcome = resolve_conflicts(&[vec![second.clone(), first.clone()]]);

        assert_eq!(outcome.merged, vec![first.clone()]);
        assert_eq!(outcome.removed.len(), 1);
        assert_eq!(outcome.removed[0].event, second);
        assert_eq!(outcome.removed[0].reason, RemovalReason::EqualPriorityLater);
        assert_eq!(outcome.removed[0].kept, first);
    }

    #[test]
    fn test_lower_priority_class_is_dropped() {
        let class = ev(EventSource::GroupXClass, "Spin", at(14, 0), at(15, 0));
        let meeting = ev(EventSource::Calendar, "meeting", at(14, 30), at(15, 30));

        let outcome = resolve_conflicts(&[vec![meeting.clone()], vec![], vec![class.clone()]]);

        assert_eq!(outcome.merged, vec![meeting]);
        assert_eq!(outcome.removed[0].event, class);
        assert_eq!(outcome.removed[0].reason, RemovalReason::LowerPriority);
    }

    #[test]
    fn test_later_lower_priority_event_is_dropped() {
        let meeting = ev(EventSource::Calendar, "meeting", at(14, 0), at(15, 0));
        let class = ev(EventSource::EventbriteClass, "Yoga", at(14, 30), at(15, 30));

        let outcome = resolve_conflicts(&[vec![meeting.clone()], vec![class.clone()]]);

        assert_eq!(outcome.merged, vec![meeting]);
        assert_eq!(outcome.removed[0].reason, RemovalReason::LowerPriority);
    }

    #[test]
    fn test_same_start_prefers_higher_priority() {
        let class = ev(EventSource::EventbriteClass, "Yoga", at(8, 0), at(9, 0));
        let meeting = ev(EventSource::Calendar, "1:1", at(8, 0), at(8, 30));

        let outcome = resolve_conflicts(&[vec![], vec![class.clone()], vec![]]);
        assert_eq!(outcome.merged, vec![class.clone()]);

        let outcome = resolve_conflicts(&[vec![meeting.clone()], vec![class.clone()]]);
        assert_eq!(outcome.merged, vec![meeting]);
        assert_eq!(outcome.removed[0].event, class);
    }

    #[test]
    fn test_touching_events_are_both_kept() {
        let a = ev(EventSource::Calendar, "a", at(9, 0), at(10, 0));
        let b = ev(EventSource::GroupXClass, "b", at(10, 0), at(11, 0));

        let outcome = resolve_conflicts(&[vec![a.clone()], vec![b.clone()]]);
        assert_eq!(outcome.merged, vec![a, b]);
        assert!(outcome.removed.is_empty());
    }

    #[test]
    fn test_custom_priority_flips_the_winner() {
        let priority = SourcePriority::new(vec![
            EventSource::GroupXClass,
            EventSource::EventbriteClass,
            EventSource::Calendar,
        ])
        .unwrap();
        let class = ev(EventSource::GroupXClass, "Spin", at(14, 0), at(15, 0));
        let meeting = ev(EventSource::Calendar, "meeting", at(14, 30), at(15, 30));

        let outcome = ConflictResolver::new()
            .with_priority(priority)
            .resolve(&[vec![meeting.clone()], vec![class.clone()]]);

        assert_eq!(outcome.merged, vec![class]);
        assert_eq!(outcome.removed[0].event, meeting);
    }

    #[test]
    fn test_resolving_merged_output_is_idempotent() {
        let events = vec![
            ev(EventSource::GroupXClass, "Spin", at(7, 0), at(8, 0)),
            ev(EventSource::Calendar, "standup", at(7, 30), at(9, 0)),
            ev(EventSource::EventbriteClass, "Yoga", at(8, 30), at(9, 30)),
            ev(EventSource::Calendar, "lunch", at(12, 0), at(13, 0)),
        ];
        let first = resolve_conflicts(&[events]);
        let second = resolve_conflicts(&[first.merged.clone()]);

        assert_eq!(second.merged, first.merged);
        assert!(second.removed.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let outcome = resolve_conflicts(&[vec![], vec![], vec![]]);
        assert!(outcome.merged.is_empty());
        assert!(outcome.removed.is_empty());
    }
}
