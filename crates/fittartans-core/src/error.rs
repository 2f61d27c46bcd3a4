//! Core error types for fittartans-core.
//!
//! Nothing in the reconciliation or scoring pipeline is fatal: record-level
//! failures are absorbed by the normalizer as [`ParseError`]s and reported as
//! counts. The remaining variants cover configuration and caller-supplied
//! parameters that fail validation before any work is done.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for fittartans-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Home/data directory could not be resolved
    #[error("Could not determine data directory")]
    NoDataDir,
}

/// Validation errors for caller-supplied parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Invalid time range
    #[error("Invalid time range: end ({end}) must be greater than start ({start})")]
    InvalidTimeRange {
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },

    /// Active window whose end is not after its start
    #[error("Invalid active window: {start} - {end}")]
    InvalidWindow {
        start: chrono::NaiveTime,
        end: chrono::NaiveTime,
    },

    /// Date range whose last day precedes its first
    #[error("Invalid date range: {first} .. {last}")]
    InvalidDateRange {
        first: chrono::NaiveDate,
        last: chrono::NaiveDate,
    },

    #[error("Class type weight for '{class_type}' must be a non-negative number, got {weight}")]
    NegativeWeight { class_type: String, weight: f64 },

    /// Source priority order is missing a source or repeats one
    #[error("Source priority must list every source exactly once: {0}")]
    InvalidPriorityOrder(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Reason a single raw record was skipped during normalization.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("unparsable timestamp in '{field}': {value:?}")]
    InvalidTimestamp { field: &'static str, value: String },

    /// Date-only entries carry no time of day
    #[error("all-day entry {0:?} has no time of day")]
    AllDay(String),

    #[error("local time {0} does not exist in the reference timezone")]
    NonexistentLocalTime(chrono::NaiveDateTime),

    #[error("unknown weekday {0:?}")]
    UnknownWeekday(String),

    /// Terms longer than a year are treated as corrupt
    #[error("term {start} to {end} is longer than a year")]
    TermTooLong {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("end ({end}) is not after start ({start})")]
    InvalidTimeRange {
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
