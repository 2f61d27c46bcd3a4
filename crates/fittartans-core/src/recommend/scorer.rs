//! Recommendation scoring.
//!
//! Ranks candidate classes against the merged timeline and a [`Preference`]
//! profile. Scoring is a weighted sum of three explainable sub-scores, each in
//! `[0, 1]`:
//!
//! | Component  | Value                                                   |
//! |------------|---------------------------------------------------------|
//! | time       | 1 if the start falls in a preferred bucket              |
//! | day        | 1 if the weekday satisfies the day preference           |
//! | class type | weight of the class type / highest weight in the profile |
//!
//! The sum is divided by the total weight and scaled to `[0, 100]`.
//! Candidates that overlap the timeline are never scored.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::preference::{Preference, TimeBucket};
use crate::error::ValidationError;
use crate::timeline::{Event, SourcePriority};
use crate::zone;

/// Default number of recommendations returned.
pub const DEFAULT_TOP_K: usize = 5;

/// Relative weight of each sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Weight for time-of-day match (default 0.4)
    pub time: f64,
    /// Weight for weekday match (default 0.3)
    pub day: f64,
    /// Weight for class type match (default 0.3)
    pub class_type: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            time: 0.4,
            day: 0.3,
            class_type: 0.3,
        }
    }
}

impl ScoringWeights {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [("time", self.time), ("day", self.day), ("class_type", self.class_type)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidValue {
                    field: format!("weights.{field}"),
                    message: format!("must be a non-negative number, got {value}"),
                });
            }
        }
        if self.total() <= 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "weights".into(),
                message: "at least one weight must be positive".into(),
            });
        }
        Ok(())
    }

    pub fn total(&self) -> f64 {
        self.time + self.day + self.class_type
    }
}

/// The sub-scores behind a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub time_bucket: f64,
    pub day: f64,
    pub class_type: f64,
}

/// A scored candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub event: Event,
    /// 0-100
    pub score: f64,
    pub components: ScoreComponents,
}

/// Scores and ranks candidate events.
#[derive(Debug, Clone)]
pub struct RecommendationScorer {
    preferences: Preference,
    weights: ScoringWeights,
    priority: SourcePriority,
    tz: Tz,
    top_k: usize,
}

impl RecommendationScorer {
    /// Create a scorer with default weights and top-K
    ///
    /// # Errors
    /// Returns an error if the preference profile is invalid
    pub fn new(preferences: Preference, tz: Tz) -> Result<Self, ValidationError> {
        preferences.validate()?;
        Ok(Self {
            preferences,
            weights: ScoringWeights::default(),
            priority: SourcePriority::default(),
            tz,
            top_k: DEFAULT_TOP_K,
        })
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Result<Self, ValidationError> {
        weights.validate()?;
        self.weights = weights;
        Ok(self)
    }

    pub fn with_priority(mut self, priority: SourcePriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn components(&self, event: &Event) -> ScoreComponents {
        let bucket = TimeBucket::from_hour(zone::local_hour(self.tz, event.start));
        let weekday = zone::local_weekday(self.tz, event.start);

        ScoreComponents {
            time_bucket: if self.preferences.wants_bucket(bucket) { 1.0 } else { 0.0 },
            day: if self.preferences.wants_day(weekday) { 1.0 } else { 0.0 },
            class_type: self.class_type_score(event),
        }
    }

    fn class_type_score(&self, event: &Event) -> f64 {
        let max = self.preferences.max_class_type_weight();
        if max <= 0.0 {
            return 0.0;
        }
        event
            .class_type
            .as_deref()
            .and_then(|t| self.preferences.class_type_weight(t))
            .map_or(0.0, |w| (w / max).clamp(0.0, 1.0))
    }

    /// Weighted aggregate in `[0, 100]`.
    pub fn aggregate(&self, components: &ScoreComponents) -> f64 {
        let w = &self.weights;
        let weighted = w.time * components.time_bucket + w.day * components.day + w.class_type * components.class_type;
        (100.0 * weighted / w.total()).clamp(0.0, 100.0)
    }

    /// Score every non-conflicting candidate, best first.
    pub fn score_all(&self, candidates: &[Event], merged: &[Event]) -> Vec<Recommendation> {
        let mut ranked: Vec<Recommendation> = candidates
            .iter()
            .filter(|c| !merged.iter().any(|m| m.overlaps(c)))
            .map(|event| {
                let components = self.components(event);
                Recommendation {
                    event: event.clone(),
                    score: self.aggregate(&components),
                    components,
                }
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.event.start.cmp(&b.event.start))
                .then_with(|| {
                    self.priority
                        .rank(a.event.source)
                        .cmp(&self.priority.rank(b.event.source))
                })
        });

        debug!(
            candidates = candidates.len(),
            eligible = ranked.len(),
            "scored recommendation candidates"
        );
        ranked
    }

    /// The top-K recommendations.
    pub fn recommend(&self, candidates: &[Event], merged: &[Event]) -> Vec<Recommendation> {
        let mut ranked = self.score_all(candidates, merged);
        ranked.truncate(self.top_k);
        ranked
    }
}

/// Convenience function scoring with default weights
pub fn score_recommendations(
    candidates: &[Event],
    merged: &[Event],
    preferences: &Preference,
    top_k: usize,
    tz: Tz,
) -> Result<Vec<Recommendation>, ValidationError> {
    Ok(RecommendationScorer::new(preferences.clone(), tz)?
        .with_top_k(top_k)
        .recommend(candidates, merged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::DaySelector;
    use crate::timeline::EventSource;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::collections::{BTreeMap, BTreeSet};

    const EASTERN: Tz = chrono_tz::America::New_York;

    /// Local Eastern wall-clock time during October 2025 (UTC-4).
    fn local(day: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, day, h, m, 0).unwrap() + Duration::hours(4)
    }

    fn class(source: EventSource, title: &str, class_type: Option<&str>, start: DateTime<Utc>) -> Event {
        Event::try_new(source, title, start, start + Duration::hours(1))
            .unwrap()
            .with_class_type(class_type.map(String::from))
    }

    fn morning_yoga_profile() -> Preference {
        Preference {
            preferred_time_buckets: BTreeSet::from([TimeBucket::Morning]),
            preferred_days: BTreeSet::from([DaySelector::Weekday]),
            preferred_class_types: BTreeMap::from([("Yoga".to_string(), 1.0)]),
            ..Default::default()
        }
    }

    #[test]
    fn test_perfect_match_scores_maximum() {
        // Monday 6 Oct 2025, 07:00 Eastern
        let yoga = class(EventSource::GroupXClass, "Yoga", Some("Yoga"), local(6, 7, 0));
        let recs = score_recommendations(&[yoga], &[], &morning_yoga_profile(), 5, EASTERN).unwrap();

        assert_eq!(recs.len(), 1);
        assert_eq!(
            recs[0].components,
            ScoreComponents {
                time_bucket: 1.0,
                day: 1.0,
                class_type: 1.0
            }
        );
        assert!((recs[0].score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_matches() {
        let scorer = RecommendationScorer::new(morning_yoga_profile(), EASTERN).unwrap();

        // Saturday evening spin: nothing matches
        let spin = class(EventSource::GroupXClass, "Spin", Some("Spin"), local(11, 18, 0));
        let c = scorer.components(&spin);
        assert_eq!((c.time_bucket, c.day, c.class_type), (0.0, 0.0, 0.0));
        assert_eq!(scorer.aggregate(&c), 0.0);

        // Tuesday afternoon yoga: day + type
        let yoga = class(EventSource::GroupXClass, "Yoga", Some("yoga"), local(7, 13, 0));
        let c = scorer.components(&yoga);
        assert!((scorer.aggregate(&c) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_class_type_weight_is_normalized() {
        let mut pref = morning_yoga_profile();
        pref.preferred_class_types.insert("Yoga".into(), 4.0);
        pref.preferred_class_types.insert("Pilates".into(), 1.0);
        let scorer = RecommendationScorer::new(pref, EASTERN).unwrap();

        let pilates = class(EventSource::EventbriteClass, "Mat", Some("Pilates"), local(6, 8, 0));
        assert!((scorer.components(&pilates).class_type - 0.25).abs() < 1e-9);

        let untyped = class(EventSource::EventbriteClass, "Mystery", None, local(6, 8, 0));
        assert_eq!(scorer.components(&untyped).class_type, 0.0);
    }

    #[test]
    fn test_empty_profile_scores_night_and_untyped_as_zero() {
        // Monday 6 Oct 2025, 23:00 Eastern
        let late = class(EventSource::GroupXClass, "Late Lift", None, local(6, 23, 0));
        let empty = Preference {
            preferred_time_buckets: BTreeSet::new(),
            preferred_days: BTreeSet::new(),
            ..Default::default()
        };

        let scorer = RecommendationScorer::new(empty, EASTERN).unwrap();
        let c = scorer.components(&late);
        assert_eq!(c.time_bucket, 0.0);
        assert_eq!(c.day, 1.0);
        assert_eq!(c.class_type, 0.0);
        assert!((scorer.aggregate(&c) - 30.0).abs() < 1e-9);

        let scorer = RecommendationScorer::new(Preference::default(), EASTERN).unwrap();
        let typed = class(EventSource::GroupXClass, "Yoga", Some("Yoga"), local(6, 7, 0));
        assert_eq!(scorer.components(&typed).class_type, 0.0);
        assert!((scorer.aggregate(&scorer.components(&typed)) - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_zero_type_weights_score_nothing() {
        let mut pref = morning_yoga_profile();
        pref.preferred_class_types = BTreeMap::from([("Yoga".to_string(), 0.0)]);
        let scorer = RecommendationScorer::new(pref, EASTERN).unwrap();

        let yoga = class(EventSource::GroupXClass, "Yoga", Some("Yoga"), local(6, 7, 0));
        let c = scorer.components(&yoga);
        assert_eq!(c.class_type, 0.0);
        assert!((scorer.aggregate(&c) - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_conflicting_candidates_are_excluded() {
        let meeting = Event::try_new(EventSource::Calendar, "meeting", local(6, 7, 30), local(6, 9, 0)).unwrap();
        let clash = class(EventSource::GroupXClass, "Yoga", Some("Yoga"), local(6, 7, 0));
        let fine = class(EventSource::GroupXClass, "Yoga", Some("Yoga"), local(6, 9, 0));

        let recs = score_recommendations(&[clash, fine.clone()], &[meeting.clone()], &morning_yoga_profile(), 5, EASTERN)
            .unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].event, fine);

        let only_clash = class(EventSource::GroupXClass, "Yoga", Some("Yoga"), local(6, 8, 0));
        let none = score_recommendations(&[only_clash], &[meeting], &morning_yoga_profile(), 5, EASTERN).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_empty_pool() {
        let recs = score_recommendations(&[], &[], &morning_yoga_profile(), 5, EASTERN).unwrap();
        assert!(recs.is_empty());
    }

    #[test]
    fn test_ties_break_by_start_then_priority() {
        let later = class(EventSource::EventbriteClass, "later", Some("Yoga"), local(7, 8, 0));
        let groupx = class(EventSource::GroupXClass, "groupx", Some("Yoga"), local(6, 8, 0));
        let eventbrite = class(EventSource::EventbriteClass, "eventbrite", Some("Yoga"), local(6, 8, 0));

        let recs = score_recommendations(&[later, groupx, eventbrite], &[], &morning_yoga_profile(), 5, EASTERN)
            .unwrap();
        let titles: Vec<_> = recs.iter().map(|r| r.event.title.as_str()).collect();
        assert_eq!(titles, vec!["eventbrite", "groupx", "later"]);
    }

    #[test]
    fn test_top_k_truncates_sorted_list() {
        let pool: Vec<Event> = (0..8)
            .map(|i| class(EventSource::GroupXClass, &format!("c{i}"), Some("Yoga"), local(6 + i, 7 + i, 0)))
            .collect();
        let scorer = RecommendationScorer::new(morning_yoga_profile(), EASTERN).unwrap();

        let all = scorer.score_all(&pool, &[]);
        assert_eq!(all.len(), 8);
        assert!(all.windows(2).all(|w| w[0].score >= w[1].score));

        let top = scorer.with_top_k(3).recommend(&pool, &[]);
        assert_eq!(top.len(), 3);
        assert_eq!(top, all[..3].to_vec());
    }

    #[test]
    fn test_custom_weights() {
        let weights = ScoringWeights {
            time: 0.0,
            day: 0.0,
            class_type: 2.0,
        };
        let scorer = RecommendationScorer::new(morning_yoga_profile(), EASTERN)
            .unwrap()
            .with_weights(weights)
            .unwrap();
        let evening_yoga = class(EventSource::GroupXClass, "Yoga", Some("Yoga"), local(11, 19, 0));
        let c = scorer.components(&evening_yoga);
        assert!((scorer.aggregate(&c) - 100.0).abs() < 1e-9);

        let zero = ScoringWeights {
            time: 0.0,
            day: 0.0,
            class_type: 0.0,
        };
        assert!(RecommendationScorer::new(Preference::default(), EASTERN)
            .unwrap()
            .with_weights(zero)
            .is_err());
    }
}
