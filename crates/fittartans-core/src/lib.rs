//! # Fit Tartans Core Library
//!
//! This library provides the scheduling engine behind the Fit Tartans
//! fitness planner. A student's calendar and two scraped class listings are
//! turned into one conflict-free timeline, which then drives free-time
//! computation, class recommendations and weekly insights. The `fittartans`
//! CLI is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Normalize**: per-source raw records to canonical UTC [`Event`]s
//! - **Timeline**: priority-based conflict resolution and free-time windows
//! - **Recommend**: preference scoring, top-K ranking and a weekly plan
//! - **Stats**: descriptive insights over the merged timeline
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Pipeline`]: normalize and combine every source in one call
//! - [`ConflictResolver`]: merge events under a [`SourcePriority`]
//! - [`RecommendationScorer`]: explainable 0-100 class scores
//! - [`Config`]: Application configuration management

pub mod error;
pub mod export;
pub mod normalize;
pub mod pipeline;
pub mod recommend;
pub mod stats;
pub mod storage;
pub mod timeline;
pub mod zone;

pub use error::{ConfigError, CoreError, ParseError, ValidationError};
pub use export::to_ical;
pub use normalize::{normalize, EventNormalizer, NormalizeReport, RawRecord};
pub use pipeline::{CombineReport, CombineWarning, Pipeline, PipelineOptions, SourceInputs};
pub use recommend::{
    score_recommendations, Preference, Recommendation, RecommendationScorer, WeeklyPlanner,
};
pub use stats::{compute_insights, InsightsSummary};
pub use storage::Config;
pub use timeline::{
    compute_free_time, resolve_conflicts, ActiveWindow, ConflictResolver, DateRange, Event,
    EventSource, Interval, SourcePriority,
};
