//! End-to-end combine pipeline.
//!
//! Raw per-source records → [`EventNormalizer`] (per source) →
//! [`ConflictResolver`] (all sources together). Every stage is a pure
//! function of its inputs, so re-running with the same inputs and the same
//! `now` gives the same result.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::normalize::{
    CalendarRecord, EventNormalizer, ListingRecord, NormalizeReport, RawRecord, RecurringClassRecord,
};
use crate::timeline::{ConflictResolver, Event, EventSource, RemovedEvent, SourcePriority};
use crate::zone::DEFAULT_TIMEZONE;

/// Raw records for every source, as handed over by the collaborators.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceInputs {
    #[serde(default)]
    pub calendar: Vec<CalendarRecord>,
    #[serde(default)]
    pub eventbrite: Vec<ListingRecord>,
    #[serde(default)]
    pub groupx: Vec<RecurringClassRecord>,
}

/// Knobs shared by every stage of the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub tz: Tz,
    pub now: Option<DateTime<Utc>>,
    pub infer_class_types: bool,
    pub priority: SourcePriority,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            tz: DEFAULT_TIMEZONE,
            now: None,
            infer_class_types: false,
            priority: SourcePriority::default(),
        }
    }
}

/// Non-fatal conditions noticed while combining.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "source", rename_all = "snake_case")]
pub enum CombineWarning {
    /// A source contributed no events; the others proceed without it
    EmptySource(EventSource),
}

/// Per-source normalization results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSources {
    pub calendar: NormalizeReport,
    pub eventbrite: NormalizeReport,
    pub groupx: NormalizeReport,
}

impl NormalizedSources {
    pub fn get(&self, source: EventSource) -> &NormalizeReport {
        match source {
            EventSource::Calendar => &self.calendar,
            EventSource::EventbriteClass => &self.eventbrite,
            EventSource::GroupXClass => &self.groupx,
        }
    }

    /// All class events from the scraped sources, sorted by start.
    pub fn class_events(&self) -> Vec<Event> {
        let mut events: Vec<Event> = self
            .eventbrite
            .events
            .iter()
            .chain(&self.groupx.events)
            .cloned()
            .collect();
        events.sort_by_key(|e| (e.start, e.end));
        events
    }
}

/// Output of a full combine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombineReport {
    pub merged: Vec<Event>,
    pub removed: Vec<RemovedEvent>,
    pub skipped: BTreeMap<EventSource, usize>,
    pub warnings: Vec<CombineWarning>,
}

/// The two halves a recommendation run needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationInputs {
    /// The user's own commitments, conflict-free
    pub timeline: Vec<Event>,
    /// Scraped classes not yet on the timeline
    pub candidates: Vec<Event>,
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    fn normalizer(&self, source: EventSource) -> EventNormalizer {
        let normalizer = EventNormalizer::new(source, self.options.tz)
            .with_class_inference(self.options.infer_class_types && source.is_class());
        match self.options.now {
            Some(now) => normalizer.with_now(now),
            None => normalizer,
        }
    }

    fn normalize_source<R: RawRecord>(&self, source: EventSource, records: &[R]) -> NormalizeReport {
        self.normalizer(source).normalize(records)
    }

    pub fn normalize_all(&self, inputs: &SourceInputs) -> NormalizedSources {
        NormalizedSources {
            calendar: self.normalize_source(EventSource::Calendar, &inputs.calendar),
            eventbrite: self.normalize_source(EventSource::EventbriteClass, &inputs.eventbrite),
            groupx: self.normalize_source(EventSource::GroupXClass, &inputs.groupx),
        }
    }

    fn resolver(&self) -> ConflictResolver {
        ConflictResolver::new().with_priority(self.options.priority.clone())
    }

    /// Normalize every source and merge them into one timeline.
    pub fn combine(&self, inputs: &SourceInputs) -> CombineReport {
        let normalized = self.normalize_all(inputs);
        self.combine_normalized(&normalized)
    }

    pub fn combine_normalized(&self, normalized: &NormalizedSources) -> CombineReport {
        let mut warnings = Vec::new();
        let mut skipped = BTreeMap::new();
        let mut lists = Vec::with_capacity(EventSource::ALL.len());

        for source in EventSource::ALL {
            let report = normalized.get(source);
            skipped.insert(source, report.skipped);
            if report.events.is_empty() {
                warn!(%source, "source contributed no events");
                warnings.push(CombineWarning::EmptySource(source));
            }
            lists.push(report.events.clone());
        }

        let outcome = self.resolver().resolve(&lists);
        info!(
            merged = outcome.merged.len(),
            removed = outcome.removed.len(),
            "combined timeline"
        );

        CombineReport {
            merged: outcome.merged,
            removed: outcome.removed,
            skipped,
            warnings,
        }
    }

    /// Split inputs into the commitment timeline and the class candidate pool.
    pub fn recommendation_inputs(&self, inputs: &SourceInputs) -> RecommendationInputs {
        let normalized = self.normalize_all(inputs);
        let timeline = self
            .resolver()
            .resolve(&[normalized.calendar.events.clone()])
            .merged;
        RecommendationInputs {
            timeline,
            candidates: normalized.class_events(),
        }
    }
}
