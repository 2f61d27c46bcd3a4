//! TOML-based application configuration.
//!
//! Stores:
//! - Reference timezone and the daily active window
//! - Source priority order
//! - Scoring weights, top-K and the preference profile
//!
//! Configuration is stored at `~/.config/fittartans/config.toml`.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result, ValidationError};
use crate::pipeline::PipelineOptions;
use crate::recommend::{Preference, RecommendationScorer, ScoringWeights, DEFAULT_TOP_K};
use crate::timeline::{ActiveWindow, FreeTimeComputer, SourcePriority};
use crate::zone::DEFAULT_TIMEZONE;

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/fittartans/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Guess class types from titles for listings that carry none
    #[serde(default = "default_true")]
    pub infer_class_types: bool,
    #[serde(default)]
    pub source_priority: SourcePriority,
    #[serde(default)]
    pub active_window: ActiveWindow,
    #[serde(default)]
    pub weights: ScoringWeights,
    #[serde(default)]
    pub preferences: Preference,
}

// Default functions
fn default_timezone() -> Tz {
    DEFAULT_TIMEZONE
}
fn default_top_k() -> usize {
    DEFAULT_TOP_K
}
fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            top_k: default_top_k(),
            infer_class_types: true,
            source_priority: SourcePriority::default(),
            active_window: ActiveWindow::default(),
            weights: ScoringWeights::default(),
            preferences: Preference::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(root: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(root: &mut serde_json::Value, key: &str, value: &str) -> Result<()> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown().into());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else {
                            value
                                .parse::<f64>()
                                .ok()
                                .and_then(serde_json::Number::from_f64)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown().into())
    }

    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing the default there if it is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check every section for values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.top_k == 0 {
            return Err(ValidationError::InvalidValue {
                field: "top_k".into(),
                message: "must be at least 1".into(),
            });
        }
        self.active_window.validate()?;
        self.weights.validate()?;
        self.preferences.validate()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting config fails validation.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and persist it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_value(key, value)?;
        self.save()
    }

    pub fn pipeline_options(&self, now: Option<DateTime<Utc>>) -> PipelineOptions {
        PipelineOptions {
            tz: self.timezone,
            now,
            infer_class_types: self.infer_class_types,
            priority: self.source_priority.clone(),
        }
    }

    pub fn scorer(&self) -> Result<RecommendationScorer> {
        Ok(RecommendationScorer::new(self.preferences.clone(), self.timezone)?
            .with_weights(self.weights)?
            .with_priority(self.source_priority.clone())
            .with_top_k(self.top_k))
    }

    pub fn free_time_computer(&self) -> Result<FreeTimeComputer> {
        Ok(FreeTimeComputer::new(self.active_window, self.timezone)?)
    }
}
