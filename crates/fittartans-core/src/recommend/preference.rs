//! User preference profile.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use crate::error::ValidationError;

/// Part of the day a class starts in, by reference-zone hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBucket {
    Morning,   // 05-12
    Afternoon, // 12-17
    Evening,   // 17-22
}

impl TimeBucket {
    pub const ALL: [TimeBucket; 3] = [Self::Morning, Self::Afternoon, Self::Evening];

    pub fn hours(&self) -> Range<u32> {
        match self {
            Self::Morning => 5..12,
            Self::Afternoon => 12..17,
            Self::Evening => 17..22,
        }
    }

    /// Bucket containing `hour`; late night and early morning have none.
    pub fn from_hour(hour: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.hours().contains(&hour))
    }
}

/// A single weekday or one of the two weekday groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DaySelector {
    /// Monday through Friday
    Weekday,
    /// Saturday and Sunday
    Weekend,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DaySelector {
    pub fn matches(&self, day: Weekday) -> bool {
        let is_weekend = matches!(day, Weekday::Sat | Weekday::Sun);
        match self {
            Self::Weekday => !is_weekend,
            Self::Weekend => is_weekend,
            Self::Monday => day == Weekday::Mon,
            Self::Tuesday => day == Weekday::Tue,
            Self::Wednesday => day == Weekday::Wed,
            Self::Thursday => day == Weekday::Thu,
            Self::Friday => day == Weekday::Fri,
            Self::Saturday => day == Weekday::Sat,
            Self::Sunday => day == Weekday::Sun,
        }
    }
}

fn default_time_buckets() -> BTreeSet<TimeBucket> {
    TimeBucket::ALL.into_iter().collect()
}

fn default_days() -> BTreeSet<DaySelector> {
    BTreeSet::from([DaySelector::Weekday])
}

fn default_max_classes() -> u32 {
    5
}

fn default_min_gap() -> u32 {
    60
}

/// What the user wants from a class.
///
/// An empty time-bucket or day set falls back to the default selection, so a
/// start outside every bucket never matches. Class types missing from the
/// weight map, including when the map is empty, score 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preference {
    #[serde(default = "default_time_buckets")]
    pub preferred_time_buckets: BTreeSet<TimeBucket>,
    #[serde(default = "default_days")]
    pub preferred_days: BTreeSet<DaySelector>,
    /// Weekly cap used by the planner; the ranked list is never truncated by it
    #[serde(default = "default_max_classes")]
    pub max_classes_per_week: u32,
    /// Minimum spacing between planned classes
    #[serde(default = "default_min_gap")]
    pub min_gap_minutes: u32,
    /// Relative weight per class type; keys compare case-insensitively
    #[serde(default)]
    pub preferred_class_types: BTreeMap<String, f64>,
}

impl Default for Preference {
    fn default() -> Self {
        Self {
            preferred_time_buckets: default_time_buckets(),
            preferred_days: default_days(),
            max_classes_per_week: default_max_classes(),
            min_gap_minutes: default_min_gap(),
            preferred_class_types: BTreeMap::new(),
        }
    }
}

impl Preference {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (class_type, weight) in &self.preferred_class_types {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(ValidationError::NegativeWeight {
                    class_type: class_type.clone(),
                    weight: *weight,
                });
            }
        }
        if self.max_classes_per_week == 0 {
            return Err(ValidationError::InvalidValue {
                field: "max_classes_per_week".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    pub fn wants_bucket(&self, bucket: Option<TimeBucket>) -> bool {
        let Some(bucket) = bucket else {
            return false;
        };
        self.preferred_time_buckets.is_empty() || self.preferred_time_buckets.contains(&bucket)
    }

    pub fn wants_day(&self, day: Weekday) -> bool {
        if self.preferred_days.is_empty() {
            return default_days().iter().any(|s| s.matches(day));
        }
        self.preferred_days.iter().any(|s| s.matches(day))
    }

    pub fn class_type_weight(&self, class_type: &str) -> Option<f64> {
        let wanted = class_type.trim();
        self.preferred_class_types
            .iter()
            .find(|(name, _)| name.trim().eq_ignore_ascii_case(wanted))
            .map(|(_, weight)| *weight)
    }

    pub fn max_class_type_weight(&self) -> f64 {
        self.preferred_class_types.values().copied().fold(0.0, f64::max)
    }
}
