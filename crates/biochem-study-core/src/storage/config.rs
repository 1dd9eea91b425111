//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Planner defaults (topic limit, learner confidence, batch size)
//! - Session timer duration, tick interval and drift threshold
//! - An optional question bank file replacing the built-in one
//!
//! Configuration is stored at `~/.config/biochem-study/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data_dir;
use crate::bank::QuestionBank;
use crate::error::{BankError, ConfigError};
use crate::planner::{DEFAULT_CONFIDENCE, DEFAULT_TOPIC_LIMIT};
use crate::timer::{TimerOptions, DEFAULT_DRIFT_THRESHOLD_SECS};

/// Quiz planner defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default = "default_topic_limit")]
    pub topic_limit: usize,
    #[serde(default = "default_confidence")]
    pub default_confidence: f64,
    #[serde(default = "default_batch_size")]
    pub default_batch_size: i64,
}

/// Session timer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_duration_seconds")]
    pub duration_seconds: u64,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_drift_threshold")]
    pub drift_threshold_seconds: f64,
}

/// Question bank source. An empty path means the built-in bank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankConfig {
    #[serde(default)]
    pub path: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/biochem-study/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub bank: BankConfig,
}

// Default functions
fn default_topic_limit() -> usize {
    DEFAULT_TOPIC_LIMIT
}
fn default_confidence() -> f64 {
    DEFAULT_CONFIDENCE
}
fn default_batch_size() -> i64 {
    1
}
fn default_duration_seconds() -> u64 {
    25 * 60
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_drift_threshold() -> f64 {
    DEFAULT_DRIFT_THRESHOLD_SECS
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            topic_limit: default_topic_limit(),
            default_confidence: default_confidence(),
            default_batch_size: default_batch_size(),
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            duration_seconds: default_duration_seconds(),
            tick_interval_ms: default_tick_interval_ms(),
            drift_threshold_seconds: default_drift_threshold(),
        }
    }
}

impl TimerConfig {
    /// Timer options for `session_id` using these settings.
    pub fn options(&self, session_id: impl Into<String>) -> TimerOptions {
        TimerOptions::new(session_id, self.duration_seconds)
            .tick_interval(Duration::from_millis(self.tick_interval_ms))
            .drift_threshold(self.drift_threshold_seconds)
    }
}

impl BankConfig {
    pub fn load(&self) -> Result<QuestionBank, BankError> {
        if self.path.trim().is_empty() {
            QuestionBank::builtin()
        } else {
            QuestionBank::from_path(Path::new(self.path.trim()))
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let unknown = || ConfigError::UnknownKey(key.to_string());

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| {
                                    invalid(format!("cannot parse '{value}' as number"))
                                })?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) => return Err(unknown()),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location, `<data_dir>/config.toml`.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed,
    /// or if the default config cannot be written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a leaf value by dot-separated key, coercing `value` to the type
    /// already stored there. Does not persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}
