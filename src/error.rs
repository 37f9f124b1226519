//! Error types for session validation and configuration loading.

use std::path::PathBuf;
use thiserror::Error;

/// Rejections raised by the editing surface before data reaches the engines.
#[derive(Debug, Error, PartialEq)]
pub enum LabError {
    #[error("unknown segment '{0}'")]
    UnknownSegment(String),

    #[error("{field} must be between 1 and 5 (got {value})")]
    RatingOutOfRange { field: &'static str, value: u8 },

    #[error("TAM must be a non-negative number (got {0})")]
    InvalidTam(f64),

    #[error("weight '{name}' must be a non-negative number (got {value})")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("{what} index {index} out of range (len {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("unknown column '{0}'")]
    UnknownColumn(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("configuration error: {0}")]
    Figment(#[from] figment::Error),

    #[error("config file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
