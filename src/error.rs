//! Error handling for export normalization.
//!
//! Provides error types with context for file access, file moves,
//! configuration, and input discovery failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NormalizerError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Fallback move to failed folder did not complete for {path}: {source}")]
    FallbackMove {
        path: PathBuf,
        #[source]
        source: Box<NormalizerError>,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Logging setup failed: {message}")]
    Logging { message: String },

    #[error("Invalid run date '{value}': expected YYYY-MM-DD")]
    InvalidRunDate { value: String },

    #[error("Invalid file pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Input discovery failed: {source}")]
    Discovery {
        #[from]
        source: glob::GlobError,
    },

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl NormalizerError {
    /// Create an I/O error tied to the path being accessed
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a move error
    pub fn move_failed(
        from: impl Into<PathBuf>,
        to: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Move {
            from: from.into(),
            to: to.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NormalizerError>;
