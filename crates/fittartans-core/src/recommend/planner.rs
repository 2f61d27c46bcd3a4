//! Greedy weekly plan built from a ranked recommendation list.
//!
//! Walks the ranking best-first and keeps a class unless its ISO week is
//! already full or it sits too close to a class kept earlier. The result is a
//! reasonable suggestion, not an optimal assignment.

use chrono::{Datelike, Duration};
use chrono_tz::Tz;
use std::collections::BTreeMap;
use tracing::debug;

use super::preference::Preference;
use super::scorer::Recommendation;

#[derive(Debug, Clone)]
pub struct WeeklyPlanner {
    max_per_week: u32,
    min_gap: Duration,
    tz: Tz,
}

impl WeeklyPlanner {
    pub fn new(max_per_week: u32, min_gap_minutes: u32, tz: Tz) -> Self {
        Self {
            max_per_week,
            min_gap: Duration::minutes(i64::from(min_gap_minutes)),
            tz,
        }
    }

    pub fn from_preference(preferences: &Preference, tz: Tz) -> Self {
        Self::new(preferences.max_classes_per_week, preferences.min_gap_minutes, tz)
    }

    /// ISO (year, week) of the class start in the reference zone.
    fn week_of(&self, rec: &Recommendation) -> (i32, u32) {
        let week = rec.event.start.with_timezone(&self.tz).iso_week();
        (week.year(), week.week())
    }

    fn too_close(&self, a: &Recommendation, b: &Recommendation) -> bool {
        a.event.start < b.event.end + self.min_gap && b.event.start < a.event.end + self.min_gap
    }

    /// Pick classes from `ranked` (best first); output is sorted by start.
    pub fn plan(&self, ranked: &[Recommendation]) -> Vec<Recommendation> {
        let mut per_week: BTreeMap<(i32, u32), u32> = BTreeMap::new();
        let mut picked: Vec<Recommendation> = Vec::new();

        for rec in ranked {
            let week = self.week_of(rec);
            let count = per_week.get(&week).copied().unwrap_or(0);
            if count >= self.max_per_week {
                continue;
            }
            if picked.iter().any(|p| self.too_close(p, rec)) {
                continue;
            }
            per_week.insert(week, count + 1);
            picked.push(rec.clone());
        }

        picked.sort_by_key(|r| r.event.start);
        debug!(ranked = ranked.len(), planned = picked.len(), "built weekly plan");
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::ScoreComponents;
    use crate::timeline::{Event, EventSource};
    use chrono::{DateTime, TimeZone, Utc};

    fn rec(title: &str, start: DateTime<Utc>, score: f64) -> Recommendation {
        Recommendation {
            event: Event::try_new(EventSource::GroupXClass, title, start, start + Duration::hours(1)).unwrap(),
            score,
            components: ScoreComponents {
                time_bucket: 1.0,
                day: 1.0,
                class_type: 1.0,
            },
        }
    }

    fn at(day: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, day, h, 0, 0).unwrap()
    }

    #[test]
    fn test_weekly_cap() {
        // Mon 6 .. Fri 10 Oct, then Mon 13 Oct
        let ranked: Vec<_> = [6, 7, 8, 9, 10, 13]
            .iter()
            .map(|d| rec(&format!("d{d}"), at(*d, 12), 90.0))
            .collect();
        let plan = WeeklyPlanner::new(2, 60, chrono_tz::UTC).plan(&ranked);

        let titles: Vec<_> = plan.iter().map(|r| r.event.title.as_str()).collect();
        assert_eq!(titles, vec!["d6", "d7", "d13"]);
    }

    #[test]
    fn test_min_gap_respected() {
        let ranked = vec![
            rec("best", at(6, 12), 95.0),
            rec("too close", at(6, 13), 90.0),
            rec("ok", at(6, 14), 80.0),
        ];
        let plan = WeeklyPlanner::new(5, 60, chrono_tz::UTC).plan(&ranked);
        let titles: Vec<_> = plan.iter().map(|r| r.event.title.as_str()).collect();
        assert_eq!(titles, vec!["best", "ok"]);
    }

    #[test]
    fn test_plan_from_preference_defaults() {
        let planner = WeeklyPlanner::from_preference(&Preference::default(), chrono_tz::UTC);
        assert!(planner.plan(&[]).is_empty());
    }
}
