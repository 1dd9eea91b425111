//! Core error types for biochem-study-core.
//!
//! Planning arithmetic never fails; the only planning error is an exhausted
//! pool. Everything else here is about loading content and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for biochem-study-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// No question matched the request, even after every fallback.
    #[error("No questions available for this criteria")]
    NoQuestionsAvailable,

    /// Question bank could not be loaded
    #[error("Question bank error: {0}")]
    Bank(#[from] BankError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Question bank loading errors.
#[derive(Error, Debug)]
pub enum BankError {
    #[error("Failed to read question bank at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Home/config directory could not be prepared
    #[error("Failed to prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}
