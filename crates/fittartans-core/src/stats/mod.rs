//! Statistics module for Fit Tartans
//!
//! Descriptive insights over a merged timeline: weekday, hour and source
//! distributions, weekly balance and a few plain-language hints.

mod insights;

pub use insights::{compute_insights, InsightsAggregator, InsightsSummary, ScheduleBalance};
