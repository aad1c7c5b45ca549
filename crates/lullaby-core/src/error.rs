//! Core error types for lullaby-core.
//!
//! Sparse or missing history is never an error here: analyzers fall back to
//! age-based defaults. These types cover malformed input and the
//! configuration layer.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for lullaby-core.
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
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(#[from] toml::de::Error),

    /// Could not resolve the configuration directory
    #[error("Could not resolve configuration directory: {0}")]
    NoDataDir(String),
}

/// Validation errors for caller-supplied sleep data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Session ends before it starts
    #[error("Invalid time range for sleep '{id}': end_time ({end}) is before start_time ({start})")]
    InvalidTimeRange {
        id: String,
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },

    /// A skipped sleep must carry an end time
    #[error("Skipped sleep '{id}' has no end_time")]
    SkippedWithoutEnd { id: String },

    /// Negative recorded duration
    #[error("Sleep '{id}' has a negative duration ({minutes} min)")]
    NegativeDuration { id: String, minutes: i64 },

    /// Birth date lies after the reference instant
    #[error("Birth date {birth_date} is after the reference time {now}")]
    BirthDateInFuture {
        birth_date: chrono::DateTime<chrono::Utc>,
        now: chrono::DateTime<chrono::Utc>,
    },

    /// Date arithmetic produced a non-finite or out-of-range instant
    #[error("Time arithmetic overflowed while computing {0}")]
    TimeOverflow(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
