//! Class recommendations.
//!
//! This module provides:
//! - The user preference profile
//! - Explainable scoring and ranking of candidate classes
//! - A greedy weekly plan on top of the ranking

mod planner;
mod preference;
mod scorer;

pub use planner::WeeklyPlanner;
pub use preference::{DaySelector, Preference, TimeBucket};
pub use scorer::{
    score_recommendations, Recommendation, RecommendationScorer, ScoreComponents, ScoringWeights,
    DEFAULT_TOP_K,
};
